//! Browser host: binds a [`Game`] to the page.
//!
//! All state lives in one thread-local slot. Every DOM event and interval
//! callback borrows it once, forwards to the game, then pumps the game's
//! effects (timers, audio, alerts) and re-renders.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlAudioElement, HtmlButtonElement, HtmlElement, HtmlImageElement, MouseEvent,
    Window, window,
};

use crate::error::DomError;
use crate::game::{Effect, Game, View};
use crate::schedule::{Scheduler, Task, route_effects};
use crate::tuning::{EXPLODE_SOUND, ElementIds, HIGH_STRESS_CLASS, SPIN_SOUND, SPIN_VOLUME};

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

struct App {
    game: Game,
    page: Page,
    sounds: Sounds,
    timers: WebScheduler,
    last_sample_ms: f64,
}

impl App {
    /// Time since the previous sampler tick, from `performance.now()`.
    fn sample_elapsed(&mut self) -> Duration {
        let now = crate::performance_now();
        let elapsed = (now - self.last_sample_ms) / 1000.0;
        self.last_sample_ms = now;
        Duration::try_from_secs_f64(elapsed).unwrap_or_default()
    }

    fn pump(&mut self) {
        let effects = self.game.drain_effects();
        let rest = route_effects(&mut self.timers, effects);
        self.page.render(&self.game.view());
        for effect in rest {
            match effect {
                Effect::PlaySpin => self.sounds.play_spin(),
                Effect::StopSpin => self.sounds.stop_spin(),
                Effect::PlayExplosion => self.sounds.play_explosion(),
                Effect::Notify(notice) => {
                    if let Err(e) = self.timers.window.alert_with_message(notice.message()) {
                        log::warn!("alert failed: {e:?}");
                    }
                }
                Effect::StartTimer(_) | Effect::CancelTimer(_) => {}
            }
        }
    }
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
            app.pump();
        }
    });
}

/// Rendered snapshot of the running game, if one is running.
#[cfg(feature = "serde_json")]
pub fn current_view() -> Option<View> {
    APP.with(|cell| cell.borrow().as_ref().map(|app| app.game.view()))
}

// --- Page elements --------------------------------------------------------------

struct Page {
    image: HtmlImageElement,
    score: HtmlElement,
    velocity: HtmlElement,
    level: HtmlElement,
    score_needed: HtmlElement,
    upgrade: HtmlButtonElement,
    stress: HtmlElement,
    warning: HtmlElement,
}

fn element<T: JsCast>(
    doc: &Document,
    id: &'static str,
    expected: &'static str,
) -> Result<T, DomError> {
    doc.get_element_by_id(id)
        .ok_or(DomError::MissingElement(id))?
        .dyn_into::<T>()
        .map_err(|_| DomError::WrongElementType { id, expected })
}

impl Page {
    fn bind(doc: &Document, ids: &ElementIds) -> Result<Self, DomError> {
        Ok(Self {
            image: element(doc, ids.image, "img")?,
            score: element(doc, ids.score, "html element")?,
            velocity: element(doc, ids.velocity, "html element")?,
            level: element(doc, ids.level, "html element")?,
            score_needed: element(doc, ids.score_needed, "html element")?,
            upgrade: element(doc, ids.upgrade, "button")?,
            stress: element(doc, ids.stress, "html element")?,
            warning: element(doc, ids.warning, "html element")?,
        })
    }

    fn render(&self, view: &View) {
        self.score.set_inner_text(&view.score_text);
        self.velocity.set_inner_text(&view.velocity_text);
        self.level.set_inner_text(&view.level_text);
        self.score_needed.set_inner_text(&view.score_needed_text);
        self.stress.set_inner_text(&view.stress_text);
        self.stress
            .class_list()
            .toggle_with_force(HIGH_STRESS_CLASS, view.high_stress)
            .ok();

        self.warning.set_inner_text(&view.warning_text);
        let display = if view.warning_visible { "block" } else { "none" };
        self.warning.style().set_property("display", display).ok();

        self.upgrade.set_disabled(!view.upgrade_enabled);

        if self.image.get_attribute("src").as_deref() != Some(view.image_src.as_str()) {
            self.image.set_src(&view.image_src);
        }
        let style = self.image.style();
        style.set_property("transform", &view.transform).ok();
        style.set_property("width", &view.image.width_css()).ok();
        style.set_property("filter", &view.image.filter_css()).ok();
    }
}

// --- Audio ----------------------------------------------------------------------

struct Sounds {
    spin: HtmlAudioElement,
    explode: HtmlAudioElement,
}

impl Sounds {
    fn load() -> Result<Self, DomError> {
        let spin = HtmlAudioElement::new_with_src(SPIN_SOUND)?;
        spin.set_volume(SPIN_VOLUME);
        spin.set_loop(true);
        let explode = HtmlAudioElement::new_with_src(EXPLODE_SOUND)?;
        Ok(Self { spin, explode })
    }

    fn play_spin(&self) {
        // play() rejects until the page has had a user gesture; nothing to do about it
        if let Err(e) = self.spin.play() {
            log::warn!("spin cue: {e:?}");
        }
    }

    fn stop_spin(&self) {
        if let Err(e) = self.spin.pause() {
            log::warn!("spin cue pause: {e:?}");
        }
        self.spin.set_current_time(0.0);
    }

    fn play_explosion(&self) {
        if let Err(e) = self.explode.play() {
            log::warn!("explosion cue: {e:?}");
        }
    }
}

// --- Timers ---------------------------------------------------------------------

/// `setInterval`-backed scheduler. One callback per task is created up front
/// and reused, so clearing an interval never drops a closure mid-call.
struct WebScheduler {
    window: Window,
    callbacks: HashMap<Task, Closure<dyn FnMut()>>,
    handles: HashMap<Task, i32>,
}

impl WebScheduler {
    fn new(window: Window) -> Self {
        let callbacks = Task::ALL
            .iter()
            .map(|&task| {
                let cb = Closure::wrap(Box::new(move || on_timer(task)) as Box<dyn FnMut()>);
                (task, cb)
            })
            .collect();
        Self { window, callbacks, handles: HashMap::new() }
    }
}

impl Scheduler for WebScheduler {
    fn start(&mut self, task: Task) {
        self.cancel(task);
        let Some(cb) = self.callbacks.get(&task) else { return };
        let period_ms = task.period().as_millis() as i32;
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), period_ms)
        {
            Ok(handle) => {
                self.handles.insert(task, handle);
            }
            Err(e) => log::warn!("could not start {task:?}: {e:?}"),
        }
    }

    fn cancel(&mut self, task: Task) {
        if let Some(handle) = self.handles.remove(&task) {
            self.window.clear_interval_with_handle(handle);
        }
    }
}

fn on_timer(task: Task) {
    with_app(|app| {
        let elapsed = match task {
            Task::Sampler => app.sample_elapsed(),
            _ => task.period(),
        };
        app.game.on_timer(task, elapsed);
    });
}

// --- Entry ----------------------------------------------------------------------

pub fn start(ids: &ElementIds) -> Result<(), DomError> {
    if APP.with(|cell| cell.borrow().is_some()) {
        log::warn!("game already running; ignoring second start");
        return Ok(());
    }
    let win = window().ok_or(DomError::NoWindow)?;
    let doc = win.document().ok_or(DomError::NoDocument)?;
    let page = Page::bind(&doc, ids)?;
    let sounds = Sounds::load()?;

    // Drag starts on the image; move/up are watched on the whole document so
    // the gesture survives the pointer leaving the image.
    {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            evt.prevent_default();
            with_app(|app| app.game.pointer_down(f64::from(evt.client_x())));
        }) as Box<dyn FnMut(_)>);
        page.image
            .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            with_app(|app| app.game.pointer_move(f64::from(evt.client_x())));
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            with_app(|app| app.game.pointer_up());
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            with_app(|app| {
                app.game.upgrade();
            });
        }) as Box<dyn FnMut(_)>);
        page.upgrade
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let app = App {
        game: Game::new(),
        page,
        sounds,
        timers: WebScheduler::new(win),
        last_sample_ms: crate::performance_now(),
    };
    APP.with(|cell| cell.replace(Some(app)));
    // first pump starts the sampler and paints the initial state
    with_app(|_| {});
    log::info!("spin stress started");
    Ok(())
}
