//! Optional follow-ups once a framed image is on disk.
//!
//! These run only after the output is written. A failure here is logged
//! and never turns a successful composition into a failed one.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PostActionError {
    #[error("Clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("Failed to reload {} for the clipboard: {source}", .path.display())]
    Reload {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to delete {}: {source}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to delete {}: it is also the output", .0.display())]
    SameFile(PathBuf),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostActions {
    pub copy_to_clipboard: bool,
    pub delete_original: bool,
}

impl PostActions {
    pub fn is_empty(&self) -> bool {
        !self.copy_to_clipboard && !self.delete_original
    }

    /// Runs every enabled action, logging failures. Returns how many failed.
    pub fn run(&self, input: &Path, output: &Path) -> usize {
        let mut failures = 0;
        if self.copy_to_clipboard {
            match copy_image_to_clipboard(output) {
                Ok(()) => log::info!("[POST] Copied {} to clipboard", output.display()),
                Err(e) => {
                    log::warn!("[POST] {}", e);
                    failures += 1;
                }
            }
        }
        if self.delete_original {
            match delete_original(input, output) {
                Ok(()) => log::info!("[POST] Deleted original {}", input.display()),
                Err(e) => {
                    log::warn!("[POST] {}", e);
                    failures += 1;
                }
            }
        }
        failures
    }
}

/// Puts the image at `path` on the system clipboard as RGBA pixels.
pub fn copy_image_to_clipboard(path: &Path) -> Result<(), PostActionError> {
    let rgba = image::open(path)
        .map_err(|e| PostActionError::Reload {
            path: path.to_path_buf(),
            source: e,
        })?
        .to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_image(arboard::ImageData {
        width: width as usize,
        height: height as usize,
        bytes: Cow::Owned(rgba.into_raw()),
    })?;
    Ok(())
}

/// Removes the source screenshot, unless it is the output itself.
pub fn delete_original(input: &Path, output: &Path) -> Result<(), PostActionError> {
    if input == output {
        return Err(PostActionError::SameFile(input.to_path_buf()));
    }
    std::fs::remove_file(input).map_err(|e| PostActionError::Delete {
        path: input.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_does_nothing() {
        let actions = PostActions::default();
        assert!(actions.is_empty());
        assert_eq!(actions.run(Path::new("/no/in.png"), Path::new("/no/out.png")), 0);
    }

    #[test]
    fn delete_removes_only_the_input() {
        let dir = std::env::temp_dir().join(format!("snapframe-post-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("shot.png");
        let output = dir.join("shot-framed.png");
        std::fs::write(&input, b"in").unwrap();
        std::fs::write(&output, b"out").unwrap();

        let actions = PostActions { delete_original: true, ..Default::default() };
        assert_eq!(actions.run(&input, &output), 0);
        assert!(!input.exists());
        assert!(output.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn delete_failure_is_counted_not_raised() {
        let actions = PostActions { delete_original: true, ..Default::default() };
        assert_eq!(actions.run(Path::new("/no/such/in.png"), Path::new("/no/out.png")), 1);
    }

    #[test]
    fn never_deletes_the_output() {
        let p = Path::new("/tmp/same.png");
        assert!(matches!(delete_original(p, p), Err(PostActionError::SameFile(_))));
    }
}
