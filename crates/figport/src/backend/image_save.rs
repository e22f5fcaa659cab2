//! Raster backend dispatching on the file extension through the image crate.

use super::{image_format, raster_formats, ExportBackend};
use crate::config::ExportConfig;
use crate::format::ExportFormat;
use crate::result::{FigportError, FigportResult};
use image::DynamicImage;
use std::path::Path;

/// `DynamicImage::save_with_format`; the image crate's encoders store no
/// resolution, so read-back reports the tag as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSaveBackend;

impl ExportBackend for ImageSaveBackend {
    fn name(&self) -> &'static str {
        "image"
    }

    fn supports_vector(&self) -> bool {
        false
    }

    fn supports_alpha(&self) -> bool {
        true
    }

    fn default_formats(&self) -> Vec<ExportFormat> {
        raster_formats(&[
            ExportFormat::Bmp,
            ExportFormat::Gif,
            ExportFormat::Ppm,
            ExportFormat::Pgm,
        ])
    }

    fn write_raster(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: ExportFormat,
        _dpi: f64,
        _config: &ExportConfig,
    ) -> FigportResult<()> {
        let container = image_format(format).ok_or_else(|| self.unsupported(format))?;
        image
            .save_with_format(path, container)
            .map_err(|e| FigportError::write(format.extension(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::verify::{verify, Verification};
    use image::{GrayImage, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_png_has_no_resolution_tag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.png");
        let img = DynamicImage::ImageRgba8(RgbaImage::new(3, 3));
        ImageSaveBackend
            .write_raster(&img, &path, ExportFormat::Png, 300.0, &ExportConfig::default())
            .unwrap();
        assert!(matches!(
            verify(&path, ExportFormat::Png).unwrap(),
            Verification::Missing(_)
        ));
    }

    #[test]
    fn test_pgm_from_gray() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.pgm");
        let img = DynamicImage::ImageLuma8(GrayImage::new(3, 2));
        ImageSaveBackend
            .write_raster(&img, &path, ExportFormat::Pgm, 300.0, &ExportConfig::default())
            .unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.color().channel_count(), 1);
    }

    #[test]
    fn test_raw_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let img = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        let err = ImageSaveBackend
            .write_raster(
                &img,
                &dir.path().join("a.raw"),
                ExportFormat::Raw,
                300.0,
                &ExportConfig::default(),
            )
            .unwrap_err();
        assert!(matches!(err, FigportError::UnsupportedFormat { .. }));
    }
}
