//! Corner-rounding stencils and destination-in masking.
//!
//! A mask is a single-channel image the same size as the thing it masks:
//! 255 keeps a pixel, 0 clears it, anything between scales its alpha.

use crate::error::ComposeError;
use crate::raster::{Canvas, CornerRadii, Fill, Shape};
use image::{GrayImage, RgbaImage};

/// Rounded rectangle with all four corners rounded.
pub fn full_rounded_mask(width: u32, height: u32, radius: f32) -> Result<GrayImage, ComposeError> {
    let mut canvas = Canvas::new(width, height)?;
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    canvas.fill(
        &Shape::rounded_rect(0.0, 0.0, w, h, CornerRadii::all(radius)),
        &Fill::opaque(),
    );
    Ok(canvas.into_alpha_mask())
}

/// Rounded only at the bottom: the screenshot sits under a title bar
/// with a square bottom edge, so its top corners must stay square.
///
/// Drawn as a fully rounded rectangle with the two top corner squares
/// filled back in. The squares use the same fitted radius as the arcs, so
/// on a short image they never reach into the bottom corners.
pub fn bottom_rounded_mask(
    width: u32,
    height: u32,
    radius: f32,
) -> Result<GrayImage, ComposeError> {
    let mut canvas = Canvas::new(width, height)?;
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);

    canvas.fill(
        &Shape::rounded_rect(0.0, 0.0, w, h, CornerRadii::all(radius)),
        &Fill::opaque(),
    );

    let square = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    if square > 0.0 {
        canvas.fill(&Shape::rect(0.0, 0.0, square, square), &Fill::opaque());
        canvas.fill(&Shape::rect(w - square, 0.0, square, square), &Fill::opaque());
    }

    Ok(canvas.into_alpha_mask())
}

/// Keeps `image` only where `mask` is opaque (alpha AND mask).
pub fn apply_mask(image: &mut RgbaImage, mask: &GrayImage) -> Result<(), ComposeError> {
    if image.dimensions() != mask.dimensions() {
        return Err(ComposeError::invalid_image(format!(
            "mask is {}x{} but image is {}x{}",
            mask.width(),
            mask.height(),
            image.width(),
            image.height()
        )));
    }

    for (px, m) in image.pixels_mut().zip(mask.pixels()) {
        let alpha = (u16::from(px[3]) * u16::from(m[0]) + 127) / 255;
        px[3] = alpha as u8;
    }
    Ok(())
}
