//! Application settings — watch/output folders, post actions, and the
//! composition defaults, persisted as JSON.
//!
//! Stored in the platform-appropriate config directory:
//!   macOS:   ~/Library/Application Support/snapframe/settings.json
//!   Linux:   ~/.config/snapframe/settings.json
//!   Windows: %APPDATA%/snapframe/settings.json

use crate::compose::{CompositionConfig, DEFAULT_OUTPUT_SUFFIX};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides the watched folder.
pub const ENV_WATCH_DIR: &str = "SNAPFRAME_WATCH_DIR";
/// Overrides the output folder.
pub const ENV_OUTPUT_DIR: &str = "SNAPFRAME_OUTPUT_DIR";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write settings {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Folder scanned for new screenshots. `None` means the desktop.
    pub watch_dir: Option<PathBuf>,
    /// Where framed images go. `None` writes next to the source.
    pub output_dir: Option<PathBuf>,
    pub output_suffix: String,
    pub delete_original: bool,
    pub copy_to_clipboard: bool,
    /// Concurrent compositions in watch mode.
    pub workers: usize,
    /// Quiet period a new file must survive before it is read.
    pub stability_ms: u64,
    pub composition: CompositionConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            watch_dir: None,
            output_dir: None,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            delete_original: false,
            copy_to_clipboard: false,
            workers: 2,
            stability_ms: 500,
            composition: CompositionConfig::default(),
        }
    }
}

/// Base directory for snapframe's own files.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapframe")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

impl Settings {
    /// Loads from the default location, then applies `.env` and
    /// environment overrides.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("[SETTINGS] Loaded {}", path.display());
        }
        let mut settings = Self::load_from(&settings_path())?;
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// A missing file yields defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("[SETTINGS] No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&text).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, json).map_err(|e| SettingsError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("[SETTINGS] Saved {}", path.display());
        Ok(())
    }

    /// Applies `SNAPFRAME_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(dir) = non_empty(ENV_WATCH_DIR) {
            log::debug!("[SETTINGS] {} = {}", ENV_WATCH_DIR, dir);
            self.watch_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = non_empty(ENV_OUTPUT_DIR) {
            log::debug!("[SETTINGS] {} = {}", ENV_OUTPUT_DIR, dir);
            self.output_dir = Some(PathBuf::from(dir));
        }
    }

    /// The watched folder, falling back to the desktop, then the
    /// current directory.
    pub fn resolved_watch_dir(&self) -> PathBuf {
        self.watch_dir
            .clone()
            .or_else(dirs::desktop_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
