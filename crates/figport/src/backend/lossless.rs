//! Raster backend built directly on the png and gif crates.

use super::{raster_formats, write_file, ExportBackend};
use crate::codec::{self, EncodeOptions};
use crate::config::ExportConfig;
use crate::format::ExportFormat;
use crate::result::FigportResult;
use image::DynamicImage;
use std::path::Path;

/// Only lossless palette/deflate encoders. Lossy and container formats
/// in its list are attempted and reported as failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct LosslessBackend;

impl ExportBackend for LosslessBackend {
    fn name(&self) -> &'static str {
        "lossless"
    }

    fn supports_vector(&self) -> bool {
        false
    }

    fn supports_alpha(&self) -> bool {
        true
    }

    fn default_formats(&self) -> Vec<ExportFormat> {
        raster_formats(&[ExportFormat::Gif])
    }

    fn write_raster(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: ExportFormat,
        dpi: f64,
        config: &ExportConfig,
    ) -> FigportResult<()> {
        let bytes = match format {
            ExportFormat::Png => {
                let options = EncodeOptions {
                    dpi: Some(dpi),
                    png_compression: config.png_compression,
                    ..EncodeOptions::default()
                };
                codec::encode_png(image, &options)?
            }
            ExportFormat::Gif => codec::encode_gif(image)?,
            other => return Err(self.unsupported(other)),
        };
        write_file(path, &bytes, format)
    }
}
