//! Composition pipeline — public API.
//!
//! One call turns a decoded screenshot into a framed image:
//! layout → background → shadow → frame → masked screenshot → stack.
//! Every stage is sequential and deterministic; there is no shared state
//! between compositions.

mod chrome;
mod config;
mod layout;
mod mask;
mod output;

pub use chrome::{render_frame, render_shadow};
pub use config::{ChromeTheme, CompositionConfig};
pub use layout::{Dimensions, LayoutPlan, Offset};
pub use mask::{apply_mask, bottom_rounded_mask, full_rounded_mask};
pub use output::{
    default_output_path, encode_png, load_source, to_base64_png, write_atomically,
    DEFAULT_OUTPUT_SUFFIX,
};

use crate::background::render_background;
use crate::error::ComposeError;
use image::{imageops, DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A rasterized layer and where it goes on the canvas.
#[derive(Debug, Clone)]
pub struct Layer {
    pub image: RgbaImage,
    pub offset: Offset,
}

impl Layer {
    pub fn new(image: RgbaImage, offset: Offset) -> Self {
        Self { image, offset }
    }

    /// Alpha-composites this layer over `canvas`, rounding the offset now.
    fn stack_onto(&self, canvas: &mut RgbaImage) {
        let (x, y) = self.offset.rounded();
        imageops::overlay(canvas, &self.image, x, y);
    }
}

/// Composes `source` into a framed image using `config`.
pub fn compose(source: &DynamicImage, config: &CompositionConfig) -> Result<RgbaImage, ComposeError> {
    config.validate()?;

    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return Err(ComposeError::invalid_image(format!(
            "source has zero dimension ({}x{})",
            width, height
        )));
    }

    let start = Instant::now();
    let plan = LayoutPlan::compute(Dimensions::new(width, height), config)?;
    log::debug!(
        "[COMPOSE] Layout: source {}x{}, frame {}x{}, canvas {}x{}",
        width,
        height,
        plan.frame.width,
        plan.frame.height,
        plan.canvas.width,
        plan.canvas.height
    );

    let mut canvas = render_background(&config.background, source, plan.canvas.width, plan.canvas.height)?;
    let background_ms = start.elapsed().as_millis();

    let mut layers = Vec::with_capacity(3);
    if config.shadow_enabled && config.shadow_opacity > 0.0 {
        layers.push(Layer::new(render_shadow(plan.frame, config)?, plan.shadow_offset));
    }
    layers.push(Layer::new(render_frame(plan.frame, config)?, plan.frame_offset));

    let mut screenshot = source.to_rgba8();
    let mask = bottom_rounded_mask(width, height, config.corner_radius as f32)?;
    apply_mask(&mut screenshot, &mask)?;
    layers.push(Layer::new(screenshot, plan.screenshot_offset));
    let layers_ms = start.elapsed().as_millis() - background_ms;

    for layer in &layers {
        layer.stack_onto(&mut canvas);
    }

    log::info!(
        "[COMPOSE] Composed {}x{} → {}x{} in {}ms (background {}ms, layers {}ms)",
        width,
        height,
        plan.canvas.width,
        plan.canvas.height,
        start.elapsed().as_millis(),
        background_ms,
        layers_ms
    );

    Ok(canvas)
}

/// Composes and PNG-encodes in memory.
pub fn compose_to_png_bytes(
    source: &DynamicImage,
    config: &CompositionConfig,
) -> Result<Vec<u8>, ComposeError> {
    let composed = compose(source, config)?;
    let start = Instant::now();
    let bytes = encode_png(&composed)?;
    log::debug!(
        "[COMPOSE] PNG encoded in {}ms ({} bytes)",
        start.elapsed().as_millis(),
        bytes.len()
    );
    Ok(bytes)
}

/// Reads `input`, composes it, and writes a PNG to `output`.
///
/// Nothing is written unless every stage succeeds. Returns `output`.
pub fn compose_file(
    input: &Path,
    output: &Path,
    config: &CompositionConfig,
) -> Result<PathBuf, ComposeError> {
    config.validate()?;
    let source = load_source(input)?;
    let bytes = compose_to_png_bytes(&source, config)?;
    write_atomically(&bytes, output)?;
    log::info!("[COMPOSE] Wrote {} ({} bytes)", output.display(), bytes.len());
    Ok(output.to_path_buf())
}
