//! Raster backend that encodes into memory and writes the file in one call.

use super::{encode_with_image_crate, image_format, raster_formats, write_file, ExportBackend};
use crate::codec;
use crate::config::ExportConfig;
use crate::format::ExportFormat;
use crate::result::FigportResult;
use image::DynamicImage;
use std::path::Path;
use tracing::debug;

/// `DynamicImage::write_to` into a buffer, then a single `fs::write`.
/// Has no alpha support, so every buffer reaches it as RGB or gray.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedBackend;

impl ExportBackend for BufferedBackend {
    fn name(&self) -> &'static str {
        "buffered"
    }

    fn supports_vector(&self) -> bool {
        false
    }

    fn supports_alpha(&self) -> bool {
        false
    }

    fn default_formats(&self) -> Vec<ExportFormat> {
        raster_formats(&[ExportFormat::Bmp, ExportFormat::Ppm])
    }

    fn write_raster(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: ExportFormat,
        _dpi: f64,
        config: &ExportConfig,
    ) -> FigportResult<()> {
        let bytes = match format {
            ExportFormat::Ppm | ExportFormat::Pgm => codec::encode_pnm(image)?,
            _ if image_format(format).is_none() => return Err(self.unsupported(format)),
            _ => encode_with_image_crate(image, format, config)?,
        };
        debug!(format = %format, size = bytes.len(), "Encoded in memory");
        write_file(path, &bytes, format)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{RgbImage, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_writes_rgb_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.png");
        let img = DynamicImage::ImageRgb8(RgbImage::new(5, 5));
        BufferedBackend
            .write_raster(&img, &path, ExportFormat::Png, 300.0, &ExportConfig::default())
            .unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.color().channel_count(), 3);
    }

    #[test]
    fn test_failed_encode_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.raw");
        let img = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        assert!(BufferedBackend
            .write_raster(&img, &path, ExportFormat::Raw, 300.0, &ExportConfig::default())
            .is_err());
        assert!(!path.exists());
    }
}
