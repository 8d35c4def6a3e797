//! Error taxonomy for a single composition.

use std::path::PathBuf;

/// Everything that can abort one composition.
///
/// A failure never leaves a partial output file behind; in batch and
/// watch mode it is reported for that file only.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("Invalid source image: {reason}")]
    InvalidImage { reason: String },

    #[error("Unknown background preset '{name}' — available presets: {}", .available.join(", "))]
    UnknownPreset {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("PNG encoding failed: {0}")]
    Encode(#[source] image::ImageError),
}

impl ComposeError {
    pub(crate) fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// I/O-family failures that may succeed on a later attempt, e.g. a
    /// screenshot that is still locked by the program writing it.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io { .. } => true,
            Self::Decode { source, .. } => matches!(source, image::ImageError::IoError(_)),
            _ => false,
        }
    }
}
