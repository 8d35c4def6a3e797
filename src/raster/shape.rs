//! Shape and paint descriptions handed to the rasterizer.
//!
//! The compositor never builds paths itself; it describes rectangles,
//! rounded rectangles and circles here and lets [`Canvas`](super::Canvas)
//! turn them into pixels.

use crate::color::Rgb;
use image::Rgba;
use tiny_skia::{Path, PathBuilder, Rect};

/// Cubic Bézier handle length for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

/// Per-corner radii for a rounded rectangle (pixels).
///
/// Corners follow CSS order: top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    #[inline]
    pub const fn all(r: f32) -> Self {
        Self { top_left: r, top_right: r, bottom_right: r, bottom_left: r }
    }

    /// Rounded on top, square on the bottom (title bars).
    #[inline]
    pub const fn top(r: f32) -> Self {
        Self { top_left: r, top_right: r, bottom_right: 0.0, bottom_left: 0.0 }
    }

    /// Clamps every radius so opposite arcs can never overlap.
    fn fitted(self, w: f32, h: f32) -> Self {
        let max = (w / 2.0).min(h / 2.0).max(0.0);
        let fit = |r: f32| r.clamp(0.0, max);
        Self {
            top_left: fit(self.top_left),
            top_right: fit(self.top_right),
            bottom_right: fit(self.bottom_right),
            bottom_left: fit(self.bottom_left),
        }
    }
}

/// Geometry to fill.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { x: f32, y: f32, w: f32, h: f32 },
    RoundedRect { x: f32, y: f32, w: f32, h: f32, radii: CornerRadii },
    Circle { cx: f32, cy: f32, r: f32 },
}

/// Paint source for a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Rgba<u8>),
    /// Linear gradient between two points in canvas pixels. Stops are
    /// `(offset in [0, 1], color)` in axis order.
    LinearGradient {
        start: (f32, f32),
        end: (f32, f32),
        stops: Vec<(f32, Rgb)>,
    },
}

impl Fill {
    #[inline]
    pub fn solid(c: Rgb, alpha: u8) -> Self {
        Fill::Solid(Rgba([c.r, c.g, c.b, alpha]))
    }

    /// Fully opaque white — the "keep" value of a stencil mask.
    #[inline]
    pub fn opaque() -> Self {
        Fill::Solid(Rgba([255, 255, 255, 255]))
    }
}

impl Shape {
    #[inline]
    pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Self {
        Shape::Rect { x, y, w, h }
    }

    #[inline]
    pub fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radii: CornerRadii) -> Self {
        Shape::RoundedRect { x, y, w, h, radii }
    }

    #[inline]
    pub fn circle(cx: f32, cy: f32, r: f32) -> Self {
        Shape::Circle { cx, cy, r }
    }

    /// Builds the tiny-skia path. `None` for degenerate geometry.
    pub(crate) fn to_path(&self) -> Option<Path> {
        match *self {
            Shape::Rect { x, y, w, h } => Rect::from_xywh(x, y, w, h).map(PathBuilder::from_rect),
            Shape::RoundedRect { x, y, w, h, radii } => rounded_rect_path(x, y, w, h, radii),
            Shape::Circle { cx, cy, r } => PathBuilder::from_circle(cx, cy, r),
        }
    }
}

fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, radii: CornerRadii) -> Option<Path> {
    if !(w > 0.0 && h > 0.0) {
        return None;
    }
    let CornerRadii { top_left: tl, top_right: tr, bottom_right: br, bottom_left: bl } =
        radii.fitted(w, h);
    let (right, bottom) = (x + w, y + h);

    let mut pb = PathBuilder::new();
    pb.move_to(x + tl, y);

    // Top edge, top-right corner
    pb.line_to(right - tr, y);
    if tr > 0.0 {
        pb.cubic_to(right - tr + tr * KAPPA, y, right, y + tr - tr * KAPPA, right, y + tr);
    }

    // Right edge, bottom-right corner
    pb.line_to(right, bottom - br);
    if br > 0.0 {
        pb.cubic_to(
            right,
            bottom - br + br * KAPPA,
            right - br + br * KAPPA,
            bottom,
            right - br,
            bottom,
        );
    }

    // Bottom edge, bottom-left corner
    pb.line_to(x + bl, bottom);
    if bl > 0.0 {
        pb.cubic_to(x + bl - bl * KAPPA, bottom, x, bottom - bl + bl * KAPPA, x, bottom - bl);
    }

    // Left edge, top-left corner
    pb.line_to(x, y + tl);
    if tl > 0.0 {
        pb.cubic_to(x, y + tl - tl * KAPPA, x + tl - tl * KAPPA, y, x + tl, y);
    }

    pb.close();
    pb.finish()
}
