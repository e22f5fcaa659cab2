//! Resolution verifier.
//!
//! Reads a written file back and extracts the declared horizontal
//! resolution. Formats that never carry one are reported as not applicable
//! without opening the file.

use crate::codec;
use crate::format::ExportFormat;
use crate::result::{FigportError, FigportResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Outcome of reading a file's resolution tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verification {
    /// The format has no resolution metadata
    NotApplicable,
    /// Declared horizontal resolution in dots per inch
    Resolved(f64),
    /// The file decodes but declares no resolution
    Missing(String),
}

impl Verification {
    /// Resolution if one was found
    pub const fn dpi(&self) -> Option<f64> {
        match self {
            Self::Resolved(dpi) => Some(*dpi),
            _ => None,
        }
    }
}

/// Read the resolution of `path`, written as `format`.
///
/// # Errors
///
/// Returns [`FigportError::MetadataRead`] when the file cannot be read or
/// decoded.
pub fn verify(path: &Path, format: ExportFormat) -> FigportResult<Verification> {
    if !format.supports_resolution_metadata() {
        return Ok(Verification::NotApplicable);
    }

    let bytes = std::fs::read(path).map_err(|e| {
        FigportError::metadata_read(format!("Cannot read {}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), %format, size = bytes.len(), "Reading resolution");

    let (found, tag) = match format {
        ExportFormat::Png => (codec::read_png_dpi(&bytes)?, "pHYs chunk"),
        ExportFormat::Jpeg | ExportFormat::Jpg => (codec::read_jfif_dpi(&bytes)?, "JFIF density"),
        ExportFormat::Tif | ExportFormat::Tiff => {
            (codec::read_tiff_dpi(&bytes)?, "XResolution tag")
        }
        ExportFormat::Bmp => (codec::read_bmp_dpi(&bytes)?, "pixels-per-metre field"),
        other => {
            return Err(FigportError::metadata_read(format!(
                "No resolution reader for {other}"
            )))
        }
    };

    Ok(match found {
        Some(dpi) => Verification::Resolved(dpi),
        None => Verification::Missing(format!("{format} file has no {tag} with an absolute unit")),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codec::{encode_png, encode_tiff, EncodeOptions};
    use image::{DynamicImage, RgbaImage};
    use tempfile::TempDir;

    fn image() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::new(4, 4))
    }

    #[test]
    fn test_not_applicable_never_opens_file() {
        let missing = Path::new("/nonexistent/figure.svg");
        for format in [ExportFormat::Svg, ExportFormat::Pdf, ExportFormat::Webp, ExportFormat::Raw] {
            assert_eq!(verify(missing, format).unwrap(), Verification::NotApplicable);
        }
    }

    #[test]
    fn test_resolved_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.png");
        let bytes = encode_png(&image(), &EncodeOptions::default().with_dpi(300.0)).unwrap();
        std::fs::write(&path, bytes).unwrap();

        let dpi = verify(&path, ExportFormat::Png).unwrap().dpi().unwrap();
        assert!((dpi - 300.0).abs() < 0.01);
    }

    #[test]
    fn test_missing_tag_is_distinct_from_not_applicable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.tif");
        let bytes = encode_tiff(&image(), &EncodeOptions::default()).unwrap();
        std::fs::write(&path, bytes).unwrap();

        let result = verify(&path, ExportFormat::Tif).unwrap();
        assert!(matches!(result, Verification::Missing(ref note) if note.contains("tif")));
    }

    #[test]
    fn test_unreadable_file_is_metadata_error() {
        let dir = TempDir::new().unwrap();
        let result = verify(&dir.path().join("absent.png"), ExportFormat::Png);
        assert!(matches!(result, Err(FigportError::MetadataRead { .. })));
    }

    #[test]
    fn test_corrupt_file_is_metadata_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();
        assert!(matches!(
            verify(&path, ExportFormat::Jpg),
            Err(FigportError::MetadataRead { .. })
        ));
    }
}
