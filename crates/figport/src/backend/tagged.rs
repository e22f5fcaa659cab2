//! Raster backend whose encoders all embed the requested resolution.

use super::{encode_tagged, raster_formats, write_file, ExportBackend};
use crate::config::ExportConfig;
use crate::format::ExportFormat;
use crate::result::FigportResult;
use image::DynamicImage;
use std::path::Path;

/// PNG `pHYs`, JFIF density, TIFF resolution tags and BMP pixels per metre.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggedBackend;

impl ExportBackend for TaggedBackend {
    fn name(&self) -> &'static str {
        "tagged"
    }

    fn supports_vector(&self) -> bool {
        false
    }

    fn supports_alpha(&self) -> bool {
        true
    }

    fn default_formats(&self) -> Vec<ExportFormat> {
        raster_formats(&[ExportFormat::Bmp])
    }

    fn write_raster(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: ExportFormat,
        dpi: f64,
        config: &ExportConfig,
    ) -> FigportResult<()> {
        if format.supports_vector_output() {
            return Err(self.unsupported(format));
        }
        let bytes = encode_tagged(image, format, dpi, config)?;
        write_file(path, &bytes, format)
    }
}
