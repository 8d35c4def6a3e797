//! CPU canvas backed by a tiny-skia pixmap.

use super::shape::{Fill, Shape};
use crate::error::ComposeError;
use image::{GrayImage, Luma, Rgba, RgbaImage};
use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, Pixmap, Point, SpreadMode, Transform,
};

/// A transparent RGBA surface that shapes are filled onto.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Creates a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, ComposeError> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            ComposeError::invalid_image(format!("cannot allocate {}x{} canvas", width, height))
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fills `shape` with `fill`, anti-aliased, source-over.
    ///
    /// Degenerate geometry or an unusable gradient is skipped.
    pub fn fill(&mut self, shape: &Shape, fill: &Fill) {
        let Some(path) = shape.to_path() else {
            log::trace!("[RASTER] Skipping degenerate shape {:?}", shape);
            return;
        };
        let Some(paint) = build_paint(fill) else {
            log::trace!("[RASTER] Skipping unusable fill {:?}", fill);
            return;
        };
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Converts to a straight-alpha RGBA image.
    pub fn into_rgba_image(self) -> RgbaImage {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let mut out = RgbaImage::new(w, h);
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// Keeps only the coverage (alpha) channel, for use as a stencil.
    pub fn into_alpha_mask(self) -> GrayImage {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let mut out = GrayImage::new(w, h);
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            *dst = Luma([src.alpha()]);
        }
        out
    }
}

fn build_paint(fill: &Fill) -> Option<Paint<'static>> {
    let mut paint = Paint::default();
    paint.anti_alias = true;

    match fill {
        Fill::Solid(c) => paint.set_color_rgba8(c[0], c[1], c[2], c[3]),
        Fill::LinearGradient { start, end, stops } => {
            let stops = stops
                .iter()
                .map(|(t, c)| GradientStop::new(*t, Color::from_rgba8(c.r, c.g, c.b, 255)))
                .collect();
            paint.shader = LinearGradient::new(
                Point::from_xy(start.0, start.1),
                Point::from_xy(end.0, end.1),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )?;
        }
    }

    Some(paint)
}
