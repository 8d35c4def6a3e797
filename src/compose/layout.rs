//! Layout engine — derives every layer's size and position.
//!
//! Pure arithmetic on the source dimensions and the config. Offsets stay
//! fractional here and are rounded only when a layer is stacked.

use super::config::CompositionConfig;
use crate::error::ComposeError;

/// Positive pixel dimensions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A placement offset in canvas pixels, possibly fractional.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    /// Nearest whole pixel, for the moment a layer is placed.
    pub fn rounded(self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

/// All geometry for one composition.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutPlan {
    pub source: Dimensions,
    /// Screenshot plus title bar.
    pub frame: Dimensions,
    pub canvas: Dimensions,
    /// Extra margin reserved so a blurred shadow is never clipped.
    pub shadow_padding: u32,
    pub frame_offset: Offset,
    pub shadow_offset: Offset,
    pub screenshot_offset: Offset,
}

impl LayoutPlan {
    /// Computes the plan. `config` must already be validated.
    ///
    /// Shadow margin is reserved whether or not a shadow is drawn, so the
    /// offsets are the same in both cases. Fails only when the canvas would
    /// not fit in `u32` pixels.
    pub fn compute(source: Dimensions, config: &CompositionConfig) -> Result<Self, ComposeError> {
        let padding = non_negative(config.padding);
        let title_bar = non_negative(config.title_bar_height);
        let blur = non_negative(config.shadow_blur);

        // Widened so extreme options cannot wrap.
        let frame_height = u64::from(source.height) + u64::from(title_bar);
        let shadow_padding = 2 * u64::from(blur) + u64::from(config.shadow_offset_y.unsigned_abs());
        let margin = 2 * u64::from(padding) + shadow_padding;

        let fits = |v: u64, axis: &str| {
            u32::try_from(v).map_err(|_| {
                ComposeError::InvalidConfig(format!(
                    "layout {} of {} px for a {}x{} source exceeds the pixel limit",
                    axis, v, source.width, source.height
                ))
            })
        };
        let frame = Dimensions::new(source.width, fits(frame_height, "frame height")?);
        let canvas = Dimensions::new(
            fits(u64::from(source.width) + margin, "canvas width")?,
            fits(frame_height + margin, "canvas height")?,
        );
        let shadow_padding = fits(shadow_padding, "shadow margin")?;

        let inset = f64::from(padding) + f64::from(shadow_padding) / 2.0;
        let frame_offset = Offset { x: inset, y: inset };

        let half_blur = f64::from(blur) / 2.0;
        let shadow_offset = Offset {
            x: frame_offset.x + f64::from(config.shadow_offset_x) - half_blur,
            y: frame_offset.y + f64::from(config.shadow_offset_y) - half_blur,
        };

        let screenshot_offset = Offset {
            x: frame_offset.x,
            y: frame_offset.y + f64::from(title_bar),
        };

        Ok(Self {
            source,
            frame,
            canvas,
            shadow_padding,
            frame_offset,
            shadow_offset,
            screenshot_offset,
        })
    }
}

fn non_negative(v: i32) -> u32 {
    v.max(0) as u32
}
