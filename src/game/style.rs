use crate::tuning::{
    BASE_HUE_DEG, BASE_IMAGE_SIZE, HUE_PER_STRESS_DEG, MAX_HUE_DEG, MAX_SIZE_INCREASE, STYLE_STRESS,
};

/// Visual treatment of the spinning image, derived from stress alone.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageStyle {
    pub width_px: f64,
    /// Hue rotation in degrees; `None` means no filter at all.
    pub hue_rotate_deg: Option<f64>,
}

impl ImageStyle {
    pub fn for_stress(stress: f64) -> Self {
        if stress < STYLE_STRESS {
            return Self { width_px: BASE_IMAGE_SIZE, hue_rotate_deg: None };
        }
        let hue = (BASE_HUE_DEG + (stress - STYLE_STRESS) * HUE_PER_STRESS_DEG).min(MAX_HUE_DEG);
        Self {
            width_px: BASE_IMAGE_SIZE + stress * (MAX_SIZE_INCREASE / 500.0),
            hue_rotate_deg: Some(hue),
        }
    }

    pub fn width_css(&self) -> String {
        format!("{}px", self.width_px)
    }

    pub fn filter_css(&self) -> String {
        match self.hue_rotate_deg {
            Some(h) => format!("brightness(100%) hue-rotate({h}deg)"),
            None => "none".to_string(),
        }
    }
}
