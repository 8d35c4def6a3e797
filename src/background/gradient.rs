//! Linear gradients — color list + angle, rasterized to an exact size.

use crate::color::Rgb;
use crate::error::ComposeError;
use crate::raster::{Canvas, Fill, Shape};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// An ordered list of colors spread evenly along an angled axis.
///
/// The angle is in degrees, 0° pointing along +x and increasing
/// clockwise in image space (so 90° runs top to bottom).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub colors: Vec<Rgb>,
    pub angle: f64,
}

/// Gradient axis endpoints as percentages of the output box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientAxis {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl GradientAxis {
    /// Axis through the box centre for `angle` degrees.
    pub fn from_angle(angle: f64) -> Self {
        let rad = angle.rem_euclid(360.0).to_radians();
        let (sin, cos) = rad.sin_cos();
        Self {
            x1: 50.0 - cos * 50.0,
            y1: 50.0 - sin * 50.0,
            x2: 50.0 + cos * 50.0,
            y2: 50.0 + sin * 50.0,
        }
    }

    /// Endpoints in pixels for a `width`×`height` box.
    pub fn to_pixels(self, width: u32, height: u32) -> ((f32, f32), (f32, f32)) {
        let px = |pct: f64, extent: u32| (pct / 100.0 * f64::from(extent)) as f32;
        (
            (px(self.x1, width), px(self.y1, height)),
            (px(self.x2, width), px(self.y2, height)),
        )
    }
}

impl GradientSpec {
    pub fn new(colors: Vec<Rgb>, angle: f64) -> Self {
        Self { colors, angle }
    }

    pub fn axis(&self) -> GradientAxis {
        GradientAxis::from_angle(self.angle)
    }

    /// Stop `i` of `n` sits at `i / (n - 1)`.
    pub fn stops(&self) -> Vec<(f32, Rgb)> {
        let n = self.colors.len();
        if n == 1 {
            return vec![(0.0, self.colors[0])];
        }
        let last = (n - 1) as f32;
        self.colors
            .iter()
            .enumerate()
            .map(|(i, c)| (i as f32 / last, *c))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ComposeError> {
        if self.colors.is_empty() {
            return Err(ComposeError::InvalidConfig(
                "gradient needs at least one color".into(),
            ));
        }
        if !self.angle.is_finite() {
            return Err(ComposeError::InvalidConfig(format!(
                "gradient angle must be finite, got {}",
                self.angle
            )));
        }
        Ok(())
    }

    /// Rasterizes the gradient to exactly `width`×`height` pixels.
    ///
    /// A single color produces a solid fill.
    pub fn render(&self, width: u32, height: u32) -> Result<RgbaImage, ComposeError> {
        self.validate()?;

        let mut canvas = Canvas::new(width, height)?;
        let full = Shape::rect(0.0, 0.0, width as f32, height as f32);

        let fill = if self.colors.len() == 1 {
            Fill::solid(self.colors[0], 255)
        } else {
            let (start, end) = self.axis().to_pixels(width, height);
            Fill::LinearGradient {
                start,
                end,
                stops: self.stops(),
            }
        };
        canvas.fill(&full, &fill);

        Ok(canvas.into_rgba_image())
    }
}
