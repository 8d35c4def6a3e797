//! Source decoding and lossless output — the file-system edge of a
//! composition.
//!
//! Output is always PNG. Files are written to `<dest>.partial` first and
//! renamed into place, so a failed composition never leaves a truncated
//! image at the destination.

use crate::error::ComposeError;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Suffix appended to the input's stem when no output path is given.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "-framed";

/// Decodes a screenshot from disk and checks its dimensions.
///
/// A file still held open by its writer surfaces as a recoverable
/// [`ComposeError::Io`].
pub fn load_source(path: &Path) -> Result<DynamicImage, ComposeError> {
    let bytes = std::fs::read(path).map_err(|e| ComposeError::io(path, e))?;
    let image = image::load_from_memory(&bytes).map_err(|e| ComposeError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ComposeError::invalid_image(format!(
            "{} has zero width or height",
            path.display()
        )));
    }
    Ok(image)
}

/// PNG-encodes a composed image in memory.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ComposeError> {
    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(ComposeError::Encode)?;
    Ok(png_bytes)
}

/// Base64 text of encoded bytes, for callers that need a text payload.
pub fn to_base64_png(png_bytes: &[u8]) -> String {
    STANDARD.encode(png_bytes)
}

/// Writes `bytes` to `dest` via a `.partial` sibling and a rename.
pub fn write_atomically(bytes: &[u8], dest: &Path) -> Result<(), ComposeError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ComposeError::io(parent, e))?;
    }

    let partial = partial_path(dest);
    if let Err(e) = std::fs::write(&partial, bytes) {
        let _ = std::fs::remove_file(&partial);
        return Err(ComposeError::io(&partial, e));
    }
    std::fs::rename(&partial, dest).map_err(|e| {
        let _ = std::fs::remove_file(&partial);
        ComposeError::io(dest, e)
    })
}

/// `<output_dir or input dir>/<stem><suffix>.png`.
pub fn default_output_path(input: &Path, output_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "screenshot".to_string());
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{}{}.png", stem, suffix))
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("snapframe-output-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn encode_produces_png_magic() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 255]));
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn base64_round_trips_magic() {
        let b64 = to_base64_png(&[0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(b64, "iVBORw==");
    }

    #[test]
    fn default_output_sits_next_to_input() {
        let out = default_output_path(Path::new("/shots/Screen Shot.png"), None, DEFAULT_OUTPUT_SUFFIX);
        assert_eq!(out, PathBuf::from("/shots/Screen Shot-framed.png"));
    }

    #[test]
    fn default_output_honours_output_dir_and_png_extension() {
        let out = default_output_path(Path::new("/shots/a.jpg"), Some(Path::new("/out")), "-x");
        assert_eq!(out, PathBuf::from("/out/a-x.png"));
    }

    #[test]
    fn atomic_write_leaves_no_partial() {
        let dir = scratch_dir("atomic");
        let dest = dir.join("nested").join("out.png");
        write_atomically(b"data", &dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"data");
        assert!(!partial_path(&dest).exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_source_is_recoverable_io() {
        let err = load_source(Path::new("/no/such/shot.png")).unwrap_err();
        assert!(matches!(err, ComposeError::Io { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn garbage_source_is_decode_error() {
        let dir = scratch_dir("garbage");
        let path = dir.join("bad.png");
        std::fs::write(&path, b"not an image").unwrap();
        let err = load_source(&path).unwrap_err();
        assert!(matches!(err, ComposeError::Decode { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
