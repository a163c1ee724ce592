//! Spin Stress core crate.
//!
//! Drag the image to spin it and rack up score. Spinning too fast raises a
//! stress gauge; leave it at 7 or above for five seconds and the game blows
//! up and starts over. The pure state machine lives in [`game`], timer tasks
//! in [`schedule`], and the browser binding in `dom` behind `start_game()`.

use wasm_bindgen::prelude::*;

mod dom;
pub mod error;
pub mod game;
pub mod schedule;
pub mod tuning;

pub use error::DomError;
pub use game::{Effect, Game, Notice, Stage, View};
pub use schedule::{Decay, Scheduler, Task, VirtualClock};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    {
        // a second init (e.g. hot reload) only fails because a logger is already set
        let _ = console_log::init_with_level(log::Level::Info);
    }
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Binds the game to the page's default element ids and starts the sampler.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    dom::start(&tuning::ElementIds::default()).map_err(JsValue::from)
}

/// Current display state as JSON, or `None` before `start_game()`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn snapshot_json() -> Option<String> {
    let view = dom::current_view()?;
    serde_json::to_string(&view)
        .inspect_err(|e| log::warn!("snapshot: {e}"))
        .ok()
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
