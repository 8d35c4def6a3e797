//! Snapframe — frames raw screenshots in window chrome.
//!
//! This is the library behind the `snapframe` binary. It wires together:
//! - Color analysis (color/)
//! - Background rendering: presets, gradients, images (background/)
//! - Shape rasterization (raster/)
//! - The composition pipeline and file output (compose/)
//! - Persistent settings (settings.rs)
//! - Folder watching and the worker pool (watch/)

pub mod background;
pub mod color;
pub mod compose;
pub mod error;
pub mod raster;
pub mod settings;
pub mod watch;

pub use background::{available_presets, preset_names, resolve_preset, BackgroundSpec};
pub use compose::{
    compose, compose_file, compose_to_png_bytes, default_output_path, to_base64_png, ChromeTheme,
    CompositionConfig, LayoutPlan,
};
pub use error::ComposeError;
pub use settings::Settings;
