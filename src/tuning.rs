//! Gameplay constants and host wiring.
//!
//! Difficulty is fixed; nothing here is read at runtime from outside the crate.

use std::time::Duration;

// --- Drag gesture -----------------------------------------------------------

/// Degrees of rotation per pixel of (cumulative) horizontal drag.
pub const ROTATION_PER_PX: f64 = 0.05;
/// Score per pixel of (cumulative) horizontal drag.
pub const SCORE_PER_PX: f64 = 0.01;

// --- Progression ------------------------------------------------------------

/// Score required to leave level N (index N-1).
///
/// Index 5 is lower than index 4; the sequence is kept as shipped.
pub const SCORE_THRESHOLDS: [f64; 7] = [
    2000.0, 6000.0, 12000.0, 20000.0, 50000.0, 10000.0, 200000.0,
];

// --- Stress -----------------------------------------------------------------

pub const STRESS_MAX: f64 = 10.0;
pub const STRESS_SENSITIVITY: f64 = 0.05;
/// Stress removed by one decay tick (fast or slow).
pub const DECAY_STEP: f64 = 1.0;
/// At or above this the countdown runs.
pub const HIGH_STRESS: f64 = 7.0;
/// At or above this the image grows and turns red.
pub const STYLE_STRESS: f64 = 3.0;

pub const COUNTDOWN_START: u8 = 5;

// --- Timer periods ----------------------------------------------------------

pub const SAMPLER_PERIOD: Duration = Duration::from_millis(200);
pub const FAST_DECAY_PERIOD: Duration = Duration::from_millis(100);
pub const SLOW_DECAY_PERIOD: Duration = Duration::from_millis(1500);
pub const COUNTDOWN_PERIOD: Duration = Duration::from_millis(1000);

// --- Image style --------------------------------------------------------------

pub const BASE_IMAGE_SIZE: f64 = 200.0;
pub const MAX_SIZE_INCREASE: f64 = 10000.0;
pub const BASE_HUE_DEG: f64 = 60.0;
pub const HUE_PER_STRESS_DEG: f64 = 10.0;
pub const MAX_HUE_DEG: f64 = 120.0;

// --- Assets -----------------------------------------------------------------

pub const SPIN_SOUND: &str = "spin.mp3";
pub const EXPLODE_SOUND: &str = "explotano.mp3";
pub const SPIN_VOLUME: f64 = 0.5;
pub const FINAL_IMAGE: &str = "images/final.png";

/// CSS class toggled on the stress readout while stress is critical.
pub const HIGH_STRESS_CLASS: &str = "high-stress";

/// DOM ids the host page must provide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementIds {
    pub image: &'static str,
    pub score: &'static str,
    pub velocity: &'static str,
    pub level: &'static str,
    pub score_needed: &'static str,
    pub upgrade: &'static str,
    pub stress: &'static str,
    pub warning: &'static str,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            image: "rotate-image",
            score: "score-counter",
            velocity: "score-per-second",
            level: "current-level",
            score_needed: "score-needed",
            upgrade: "upgrade-button",
            stress: "stress-level",
            warning: "warning-message",
        }
    }
}
