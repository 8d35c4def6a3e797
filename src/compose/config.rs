//! Composition options with documented defaults.
//!
//! Validated once at the pipeline boundary; nothing downstream re-applies
//! defaults.

use crate::background::BackgroundSpec;
use crate::color::Rgb;
use crate::error::ComposeError;
use serde::{Deserialize, Serialize};

/// Window chrome palette.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChromeTheme {
    #[default]
    Dark,
    Light,
}

impl ChromeTheme {
    pub fn panel(self) -> Rgb {
        match self {
            ChromeTheme::Dark => Rgb::new(0x1e, 0x1e, 0x1e),
            ChromeTheme::Light => Rgb::new(0xf6, 0xf6, 0xf6),
        }
    }

    pub fn title_bar(self) -> Rgb {
        match self {
            ChromeTheme::Dark => Rgb::new(0x32, 0x32, 0x32),
            ChromeTheme::Light => Rgb::new(0xe4, 0xe4, 0xe4),
        }
    }
}

impl std::str::FromStr for ChromeTheme {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ChromeTheme::Dark),
            "light" => Ok(ChromeTheme::Light),
            other => Err(ComposeError::InvalidConfig(format!(
                "unknown theme '{}' — expected dark or light",
                other
            ))),
        }
    }
}

/// Every knob of one composition. Sizes are pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositionConfig {
    /// Space between the frame and the canvas edge (before shadow margin).
    pub padding: i32,
    pub corner_radius: i32,
    pub title_bar_height: i32,
    pub shadow_enabled: bool,
    pub shadow_blur: i32,
    pub shadow_offset_x: i32,
    pub shadow_offset_y: i32,
    /// 0.0 (invisible) to 1.0 (solid).
    pub shadow_opacity: f64,
    pub shadow_color: Rgb,
    pub theme: ChromeTheme,
    pub background: BackgroundSpec,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            padding: 80,
            corner_radius: 10,
            title_bar_height: 32,
            shadow_enabled: true,
            shadow_blur: 30,
            shadow_offset_x: 0,
            shadow_offset_y: 20,
            shadow_opacity: 0.5,
            shadow_color: Rgb::new(0, 0, 0),
            theme: ChromeTheme::Dark,
            background: BackgroundSpec::Default,
        }
    }
}

impl CompositionConfig {
    /// Rejects out-of-range options before any layer work begins.
    pub fn validate(&self) -> Result<(), ComposeError> {
        let sizes = [
            ("padding", self.padding),
            ("cornerRadius", self.corner_radius),
            ("titleBarHeight", self.title_bar_height),
            ("shadowBlur", self.shadow_blur),
        ];
        for (name, value) in sizes {
            if value < 0 {
                return Err(ComposeError::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        if !self.shadow_opacity.is_finite() || !(0.0..=1.0).contains(&self.shadow_opacity) {
            return Err(ComposeError::InvalidConfig(format!(
                "shadowOpacity must be within [0, 1], got {}",
                self.shadow_opacity
            )));
        }

        self.background.validate()
    }

    /// Shadow opacity as an 8-bit alpha.
    pub(crate) fn shadow_alpha(&self) -> u8 {
        (self.shadow_opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}
