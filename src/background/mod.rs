//! Background domain — everything drawn behind the framed screenshot.
//!
//! A background is one of: a supplied image (cover-fit), a named preset,
//! an explicit gradient, or `auto` (derived from the screenshot).

mod gradient;
mod presets;

pub use gradient::{GradientAxis, GradientSpec};
pub use presets::{
    available_presets, find_preset, preset_names, resolve_preset, Preset, AUTO_PRESET,
    DEFAULT_GRADIENT,
};

use crate::color::{self, Rgb};
use crate::error::ComposeError;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Angle used for `#a,#b` gradients given without an explicit `@angle`.
pub const DEFAULT_GRADIENT_ANGLE: f64 = 135.0;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tif", "tiff"];

/// What to paint behind the frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BackgroundSpec {
    /// The built-in two-stop gradient.
    #[default]
    Default,
    /// An image file, resized to cover the canvas.
    Image { path: PathBuf },
    /// A named entry from the preset catalog.
    Preset { name: String },
    /// Explicit colors and angle.
    Gradient { colors: Vec<Rgb>, angle: f64 },
    /// Gradient derived from the screenshot's dominant color.
    Auto,
}

impl BackgroundSpec {
    /// Checks everything that can be checked without touching the disk.
    pub fn validate(&self) -> Result<(), ComposeError> {
        match self {
            BackgroundSpec::Preset { name } if !name.eq_ignore_ascii_case(AUTO_PRESET) => {
                resolve_preset(name).map(|_| ())
            }
            BackgroundSpec::Gradient { colors, angle } => {
                GradientSpec::new(colors.clone(), *angle).validate()
            }
            BackgroundSpec::Image { path } if path.as_os_str().is_empty() => Err(
                ComposeError::InvalidConfig("background image path is empty".into()),
            ),
            _ => Ok(()),
        }
    }
}

impl FromStr for BackgroundSpec {
    type Err = ComposeError;

    /// Accepts `auto`, `default`, `#rrggbb,#rrggbb[,...][@angle]`, an
    /// image path, or a preset name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("default") {
            return Ok(BackgroundSpec::Default);
        }
        if s.eq_ignore_ascii_case(AUTO_PRESET) {
            return Ok(BackgroundSpec::Auto);
        }
        if s.starts_with('#') {
            return parse_gradient(s);
        }
        if looks_like_image_path(s) {
            return Ok(BackgroundSpec::Image { path: PathBuf::from(s) });
        }
        Ok(BackgroundSpec::Preset { name: s.to_string() })
    }
}

fn parse_gradient(s: &str) -> Result<BackgroundSpec, ComposeError> {
    let (colors_part, angle) = match s.rsplit_once('@') {
        Some((c, a)) => {
            let angle = a.trim().parse::<f64>().map_err(|_| {
                ComposeError::InvalidConfig(format!("invalid gradient angle '{}'", a))
            })?;
            (c, angle)
        }
        None => (s, DEFAULT_GRADIENT_ANGLE),
    };

    let colors = colors_part
        .split(',')
        .map(|c| Rgb::from_hex(c).map_err(|e| ComposeError::InvalidConfig(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    let spec = BackgroundSpec::Gradient { colors, angle };
    spec.validate()?;
    Ok(spec)
}

fn looks_like_image_path(s: &str) -> bool {
    let path = std::path::Path::new(s);
    let has_image_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false);
    has_image_ext || s.contains('/') || s.contains('\\')
}

/// Produces the canvas-sized background layer.
///
/// `source` is the screenshot being framed; it is only read for `auto`.
pub fn render_background(
    spec: &BackgroundSpec,
    source: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<RgbaImage, ComposeError> {
    match spec {
        BackgroundSpec::Default => DEFAULT_GRADIENT.to_spec().render(width, height),
        BackgroundSpec::Image { path } => {
            let img = image::open(path).map_err(|e| match e {
                image::ImageError::IoError(io) => ComposeError::io(path, io),
                other => ComposeError::Decode {
                    path: path.clone(),
                    source: other,
                },
            })?;
            log::debug!(
                "[BACKGROUND] Cover-fitting {} ({}x{}) to {}x{}",
                path.display(),
                img.width(),
                img.height(),
                width,
                height
            );
            Ok(img.resize_to_fill(width, height, FilterType::Lanczos3).to_rgba8())
        }
        BackgroundSpec::Preset { name } if name.eq_ignore_ascii_case(AUTO_PRESET) => {
            color::extract_auto_gradient(source).render(width, height)
        }
        BackgroundSpec::Preset { name } => resolve_preset(name)?.render(width, height),
        BackgroundSpec::Gradient { colors, angle } => {
            GradientSpec::new(colors.clone(), *angle).render(width, height)
        }
        BackgroundSpec::Auto => color::extract_auto_gradient(source).render(width, height),
    }
}
