//! Vector-capable backend: every format is produced from the vector form.

use super::{encode_tagged, write_file, ExportBackend};
use crate::config::ExportConfig;
use crate::figure::Scene;
use crate::format::{ExportFormat, VECTOR_BACKEND_FORMATS};
use crate::raster;
use crate::render::{PdfWriter, PgfWriter, PostScriptFlavor, PostScriptWriter, SvgWriter};
use crate::result::FigportResult;
use image::DynamicImage;
use std::path::Path;
use tracing::debug;

/// Writes vector formats with the in-crate writers and raster formats by
/// rendering the scene at the requested resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorBackend;

impl ExportBackend for VectorBackend {
    fn name(&self) -> &'static str {
        "vector"
    }

    fn supports_vector(&self) -> bool {
        true
    }

    fn supports_alpha(&self) -> bool {
        true
    }

    fn default_formats(&self) -> Vec<ExportFormat> {
        VECTOR_BACKEND_FORMATS.to_vec()
    }

    fn write_vector(
        &self,
        scene: &Scene,
        path: &Path,
        format: ExportFormat,
        dpi: f64,
        config: &ExportConfig,
    ) -> FigportResult<()> {
        let bytes = match format {
            ExportFormat::Svg => SvgWriter::new()
                .with_compression(config.svg_compression)
                .write(scene)?
                .into_bytes(),
            ExportFormat::Svgz => SvgWriter::new()
                .with_compression(config.svg_compression)
                .write_compressed(scene)?,
            ExportFormat::Eps => PostScriptWriter::new(PostScriptFlavor::Encapsulated)
                .write(scene)?
                .into_bytes(),
            ExportFormat::Ps => PostScriptWriter::new(PostScriptFlavor::Page)
                .write(scene)?
                .into_bytes(),
            ExportFormat::Pdf => PdfWriter::new().write(scene)?,
            ExportFormat::Pgf => PgfWriter::new().write(scene)?.into_bytes(),
            raster_format => {
                debug!(format = %raster_format, dpi, "Rendering raster from vector form");
                let pixels = raster::rasterize(scene, dpi)?;
                let image = raster::convert_layout(
                    DynamicImage::ImageRgba8(pixels),
                    raster_format.layout(),
                );
                encode_tagged(&image, raster_format, dpi, config)?
            }
        };
        write_file(path, &bytes, format)
    }

    fn write_raster(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: ExportFormat,
        dpi: f64,
        config: &ExportConfig,
    ) -> FigportResult<()> {
        let bytes = encode_tagged(image, format, dpi, config)?;
        write_file(path, &bytes, format)
    }
}
