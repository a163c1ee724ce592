//! The spin/stress state machine.
//!
//! `Game` is pure: it owns score, stage, rotation and stress plus the
//! bookkeeping of which timer tasks are alive, and reports everything the
//! host has to do (timers, audio, blocking messages) as [`Effect`]s queued
//! on an outbox. What the page should show is [`Game::view`].
//!
//! Behaviour notes:
//! - A drag's `deltaX` is measured from the gesture origin on every move,
//!   never from the previous move. Score and rotation therefore grow with the
//!   absolute offset.
//! - Only one decay timer (fast or slow) exists at a time, and at most one
//!   countdown.

use std::time::Duration;

use crate::schedule::{Decay, Task};
use crate::tuning::{
    COUNTDOWN_START, DECAY_STEP, HIGH_STRESS, ROTATION_PER_PX, SCORE_PER_PX, STRESS_MAX,
    STRESS_SENSITIVITY,
};

mod levels;
mod style;

pub use levels::{MAX_LEVEL, Stage};
pub use style::ImageStyle;

/// Blocking acknowledgements surfaced to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Self-destruct fired.
    Mess,
    /// Upgraded past the last level.
    Victory,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::Mess => "Look at the mess you've made :-[",
            Notice::Victory => "You won the game!",
        }
    }
}

/// Work the host performs on the game's behalf, in the order queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    StartTimer(Task),
    CancelTimer(Task),
    /// Start the looping spin cue.
    PlaySpin,
    /// Pause the spin cue and rewind it.
    StopSpin,
    PlayExplosion,
    Notify(Notice),
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    origin_x: f64,
}

/// Everything the page displays, rendered from current state.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub score_text: String,
    pub velocity_text: String,
    pub level_text: String,
    pub score_needed_text: String,
    pub stress_text: String,
    pub high_stress: bool,
    pub warning_visible: bool,
    pub warning_text: String,
    pub upgrade_enabled: bool,
    pub image_src: String,
    pub transform: String,
    pub image: ImageStyle,
}

pub fn countdown_message(remaining: u8) -> String {
    format!("Stress level too high! Self-destruction in {remaining} seconds...")
}

pub struct Game {
    score: f64,
    stage: Stage,
    rotation: f64,
    stress: f64,
    velocity: f64,
    last_score: f64,
    spinning: bool,
    gesture: Option<Gesture>,
    decay: Option<Decay>,
    countdown: Option<u8>,
    high_stress: bool,
    warning_visible: bool,
    warning_text: String,
    upgrade_enabled: bool,
    effects: Vec<Effect>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Fresh game with the sampler already requested.
    pub fn new() -> Self {
        Self {
            score: 0.0,
            stage: Stage::FIRST,
            rotation: 0.0,
            stress: 0.0,
            velocity: 0.0,
            last_score: 0.0,
            spinning: false,
            gesture: None,
            decay: None,
            countdown: None,
            high_stress: false,
            warning_visible: false,
            warning_text: String::new(),
            upgrade_enabled: false,
            effects: vec![Effect::StartTimer(Task::Sampler)],
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }
    pub fn stage(&self) -> Stage {
        self.stage
    }
    pub fn rotation(&self) -> f64 {
        self.rotation
    }
    pub fn stress(&self) -> f64 {
        self.stress
    }
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
    pub fn is_spinning(&self) -> bool {
        self.spinning
    }
    pub fn active_decay(&self) -> Option<Decay> {
        self.decay
    }
    pub fn countdown_remaining(&self) -> Option<u8> {
        self.countdown
    }
    pub fn upgrade_enabled(&self) -> bool {
        self.upgrade_enabled
    }

    /// Takes the queued effects, leaving the outbox empty.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    // --- Drag gesture ---------------------------------------------------------

    pub fn pointer_down(&mut self, x: f64) {
        log::debug!("gesture start at x={x}");
        self.gesture = Some(Gesture { origin_x: x });
        if self.decay == Some(Decay::Slow) {
            self.cancel_decay();
        }
    }

    /// Ignored unless a gesture is in progress.
    pub fn pointer_move(&mut self, x: f64) {
        let Some(gesture) = self.gesture else { return };
        let delta_x = x - gesture.origin_x;
        self.rotation += delta_x * ROTATION_PER_PX;
        self.score += (delta_x * SCORE_PER_PX).abs();

        if self.stage.threshold().is_some_and(|t| self.score >= t) {
            self.upgrade_enabled = true;
        }
        if !self.spinning {
            self.spinning = true;
            self.emit(Effect::PlaySpin);
        }
        self.cancel_decay();
    }

    pub fn pointer_up(&mut self) {
        if self.gesture.take().is_none() {
            return;
        }
        log::debug!("gesture end, score={:.2}", self.score);
        if self.spinning {
            self.spinning = false;
            self.emit(Effect::StopSpin);
        }
        if self.decay != Some(Decay::Fast) {
            self.start_decay(Decay::Fast);
        }
    }

    // --- Timers ---------------------------------------------------------------

    pub fn on_timer(&mut self, task: Task, elapsed: Duration) {
        match task {
            Task::Sampler => self.sample(elapsed),
            Task::Decay(kind) => self.decay_tick(kind),
            Task::Countdown => self.countdown_tick(),
        }
    }

    /// One sampler tick; `elapsed` is the time since the previous one.
    pub fn sample(&mut self, elapsed: Duration) {
        let secs = elapsed.as_secs_f64();
        let velocity = if secs > 0.0 { (self.score - self.last_score) / secs } else { 0.0 };
        self.velocity = if velocity.is_finite() { velocity } else { 0.0 };
        self.last_score = self.score;

        self.stress = clamp_stress(self.stress + self.velocity * STRESS_SENSITIVITY / 100.0);

        if self.decay == Some(Decay::Slow) {
            self.cancel_decay();
        }
        if !self.spinning && self.stress > 0.0 && self.decay.is_none() {
            self.start_decay(Decay::Slow);
        }

        if self.stress >= HIGH_STRESS {
            self.high_stress = true;
            self.warning_visible = true;
            if self.countdown.is_none() {
                self.start_countdown();
            }
        } else if self.countdown.is_some() {
            self.cancel_countdown();
        }
    }

    /// Stale ticks from a decay timer that is no longer current are dropped.
    pub fn decay_tick(&mut self, kind: Decay) {
        if self.decay != Some(kind) {
            return;
        }
        self.stress -= DECAY_STEP;
        if self.stress <= 0.0 {
            self.stress = 0.0;
            self.cancel_decay();
            self.high_stress = false;
        }
    }

    pub fn countdown_tick(&mut self) {
        let Some(remaining) = self.countdown else { return };
        if remaining > 0 {
            let remaining = remaining - 1;
            self.countdown = Some(remaining);
            self.warning_text = countdown_message(remaining);
            return;
        }

        log::warn!("self-destruct at score {:.0}", self.score);
        self.countdown = None;
        self.emit(Effect::CancelTimer(Task::Countdown));
        self.warning_visible = false;
        self.emit(Effect::PlayExplosion);
        self.emit(Effect::Notify(Notice::Mess));
        self.reset();
    }

    fn start_decay(&mut self, kind: Decay) {
        self.cancel_decay();
        self.decay = Some(kind);
        self.emit(Effect::StartTimer(Task::Decay(kind)));
    }

    fn cancel_decay(&mut self) {
        if let Some(kind) = self.decay.take() {
            self.emit(Effect::CancelTimer(Task::Decay(kind)));
        }
    }

    fn start_countdown(&mut self) {
        log::warn!("stress {:.2} critical, countdown started", self.stress);
        self.countdown = Some(COUNTDOWN_START);
        self.warning_text = countdown_message(COUNTDOWN_START);
        self.emit(Effect::StartTimer(Task::Countdown));
    }

    fn cancel_countdown(&mut self) {
        if let Some(remaining) = self.countdown.take() {
            log::info!("countdown cancelled with {remaining}s left");
            self.emit(Effect::CancelTimer(Task::Countdown));
            self.warning_visible = false;
        }
    }

    // --- Progression ----------------------------------------------------------

    /// Back to level 1 with nothing scored. Running timers are left alone;
    /// with stress at zero they wind down on their own.
    pub fn reset(&mut self) {
        log::info!("game reset");
        self.score = 0.0;
        self.stage = Stage::FIRST;
        self.rotation = 0.0;
        self.stress = 0.0;
        self.upgrade_enabled = false;
    }

    /// Player asked to level up. Returns whether the stage advanced.
    pub fn upgrade(&mut self) -> bool {
        let Some(threshold) = self.stage.threshold() else { return false };
        if self.score < threshold {
            return false;
        }
        self.stage = self.stage.next();
        self.upgrade_enabled = false;
        match self.stage {
            Stage::Level(n) => log::info!("advanced to level {n}"),
            Stage::Won => {
                log::info!("game won with score {:.0}", self.score);
                self.emit(Effect::Notify(Notice::Victory));
            }
        }
        true
    }

    pub fn view(&self) -> View {
        View {
            score_text: format!("Score: {}", self.score.floor()),
            velocity_text: format!("Score per second: {:.2}", self.velocity),
            level_text: self.stage.level_label(),
            score_needed_text: self.stage.score_needed_label(),
            stress_text: format!("Stress Level: {}", self.stress.round()),
            high_stress: self.high_stress,
            warning_visible: self.warning_visible,
            warning_text: self.warning_text.clone(),
            upgrade_enabled: self.upgrade_enabled,
            image_src: self.stage.image_src(),
            transform: format!("rotate({}deg)", self.rotation),
            image: ImageStyle::for_stress(self.stress),
        }
    }
}

fn clamp_stress(stress: f64) -> f64 {
    stress.clamp(0.0, STRESS_MAX)
}
