//! Color domain — RGB/HSL math and dominant-color analysis.
//!
//! Everything here is pure: pixels in, numbers out. The background
//! module turns the results into rasterized gradients.

mod dominant;
mod hsl;

pub use dominant::{extract_auto_gradient, DominantColor, AUTO_GRADIENT_ANGLE, SAMPLE_GRID};
pub use hsl::{ColorParseError, Hsl, Rgb, QUANT_BUCKET};
