//! PNG encoding and artifact persistence.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use uuid::Uuid;

use crate::error::Result;

/// File extension of persisted artifacts.
pub const ARTIFACT_EXTENSION: &str = "png";

/// Encode as PNG with the strongest lossless compression.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}

/// A fresh `<uuid>.png` path inside `dir`.
pub fn unique_artifact_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.{}", Uuid::new_v4(), ARTIFACT_EXTENSION))
}

/// Write encoded PNG bytes to a new, uniquely named file under `dir`.
///
/// The directory is created if needed. The file is opened with `create_new`,
/// so an existing artifact is never overwritten; if writing fails the
/// partial file is removed before the error is returned.
pub fn write_artifact(dir: &Path, png: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = unique_artifact_path(dir);
    let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;

    let written = file.write_all(png).and_then(|_| file.sync_all());
    if let Err(e) = written {
        drop(file);
        if let Err(cleanup) = std::fs::remove_file(&path) {
            log::warn!(
                "Failed to remove partial artifact {}: {}",
                path.display(),
                cleanup
            );
        }
        return Err(e.into());
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_encode_png_round_trips_pixels() {
        let mut image = RgbImage::from_pixel(5, 4, Rgb([255, 255, 255]));
        image.put_pixel(2, 1, Rgb([200, 10, 30]));

        let bytes = encode_png(&image).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_unique_paths_differ() {
        let dir = Path::new("/tmp/artifacts");
        let a = unique_artifact_path(dir);
        let b = unique_artifact_path(dir);
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(dir));
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("png"));
    }

    #[test]
    fn test_write_artifact_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("media").join("tattoos");

        let path = write_artifact(&dir, b"png bytes").unwrap();
        assert!(path.starts_with(&dir));
        assert_eq!(std::fs::read(&path).unwrap(), b"png bytes");

        let second = write_artifact(&dir, b"png bytes").unwrap();
        assert_ne!(path, second);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 2);
    }

    #[test]
    fn test_write_artifact_fails_when_dir_is_a_file() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("tattoos");
        std::fs::write(&blocker, b"").unwrap();

        assert!(write_artifact(&blocker, b"png bytes").is_err());
    }
}
