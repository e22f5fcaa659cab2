//! Encoding backends.
//!
//! A backend is a value implementing [`ExportBackend`]: a write capability
//! for the vector form and/or a raster buffer, a read-back capability and
//! two flags. The dispatcher in [`crate::export`] is the same for all of
//! them; only the encoding library behind each backend differs.

mod buffered;
mod image_save;
mod lossless;
mod tagged;
mod vector;

pub use buffered::BufferedBackend;
pub use image_save::ImageSaveBackend;
pub use lossless::LosslessBackend;
pub use tagged::TaggedBackend;
pub use vector::VectorBackend;

use crate::codec::{self, EncodeOptions};
use crate::config::ExportConfig;
use crate::figure::Scene;
use crate::format::{ExportFormat, RASTER_BASE_FORMATS};
use crate::raster::ChannelLayout;
use crate::result::{FigportError, FigportResult};
use crate::verify::{self, Verification};
use image::codecs::png::{FilterType as PngFilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};
use std::fmt::Debug;
use std::io::Cursor;
use std::path::Path;

/// Capability record of one encoding backend.
pub trait ExportBackend: Debug {
    /// Short name, used for output folders and status lines
    fn name(&self) -> &'static str;

    /// Consumes the vector form directly
    fn supports_vector(&self) -> bool;

    /// Can encode an alpha channel
    fn supports_alpha(&self) -> bool;

    /// Formats exported when none are requested explicitly
    fn default_formats(&self) -> Vec<ExportFormat>;

    /// Write the vector form of a figure.
    ///
    /// `dpi` is a metadata hint for vector formats and the render
    /// resolution for raster ones.
    fn write_vector(
        &self,
        scene: &Scene,
        path: &Path,
        format: ExportFormat,
        dpi: f64,
        config: &ExportConfig,
    ) -> FigportResult<()> {
        let _ = (scene, path, dpi, config);
        Err(self.unsupported(format))
    }

    /// Write a raster buffer that already has its final size and layout.
    fn write_raster(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: ExportFormat,
        dpi: f64,
        config: &ExportConfig,
    ) -> FigportResult<()>;

    /// Read back the resolution of a file this backend wrote.
    fn read_resolution(&self, path: &Path, format: ExportFormat) -> FigportResult<Verification> {
        verify::verify(path, format)
    }

    /// Channel layout handed to [`ExportBackend::write_raster`] for `format`.
    fn layout_for(&self, format: ExportFormat) -> ChannelLayout {
        match format.layout() {
            ChannelLayout::Rgba if !self.supports_alpha() => ChannelLayout::Rgb,
            layout => layout,
        }
    }

    /// Error for a format this backend has no encoder for.
    fn unsupported(&self, format: ExportFormat) -> FigportError {
        FigportError::UnsupportedFormat {
            backend: self.name().to_string(),
            format: format.to_string(),
        }
    }
}

/// Every backend, in run order.
pub fn all() -> Vec<Box<dyn ExportBackend>> {
    vec![
        Box::new(VectorBackend),
        Box::new(ImageSaveBackend),
        Box::new(BufferedBackend),
        Box::new(LosslessBackend),
        Box::new(TaggedBackend),
    ]
}

/// Look a backend up by name (case-insensitive).
pub fn by_name(name: &str) -> FigportResult<Box<dyn ExportBackend>> {
    all()
        .into_iter()
        .find(|b| b.name().eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| FigportError::UnknownBackend(name.to_string()))
}

/// The raster base list followed by `extra`.
fn raster_formats(extra: &[ExportFormat]) -> Vec<ExportFormat> {
    RASTER_BASE_FORMATS.iter().chain(extra).copied().collect()
}

/// Write `bytes` to `path`, reporting failures as write errors of `format`.
fn write_file(path: &Path, bytes: &[u8], format: ExportFormat) -> FigportResult<()> {
    std::fs::write(path, bytes).map_err(|e| {
        FigportError::write(
            format.extension(),
            format!("Cannot write {}: {e}", path.display()),
        )
    })
}

/// The image crate's container for `format`, if it has one.
fn image_format(format: ExportFormat) -> Option<ImageFormat> {
    ImageFormat::from_extension(format.extension())
}

/// Encode through the image crate into memory. PNG honours the configured
/// compression level.
fn encode_with_image_crate(
    image: &DynamicImage,
    format: ExportFormat,
    config: &ExportConfig,
) -> FigportResult<Vec<u8>> {
    let container = image_format(format).ok_or_else(|| {
        FigportError::write(format.extension(), "no image crate encoder for this format")
    })?;
    let mut cursor = Cursor::new(Vec::new());
    let result = if container == ImageFormat::Png {
        let encoder = PngEncoder::new_with_quality(
            &mut cursor,
            config.png_compression.to_image_compression(),
            PngFilterType::Adaptive,
        );
        image.write_with_encoder(encoder)
    } else {
        image.write_to(&mut cursor, container)
    };
    result.map_err(|e| FigportError::write(format.extension(), e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Encode with the resolution-aware codecs, falling back to the image crate
/// for containers without a resolution tag.
fn encode_tagged(
    image: &DynamicImage,
    format: ExportFormat,
    dpi: f64,
    config: &ExportConfig,
) -> FigportResult<Vec<u8>> {
    let options = EncodeOptions {
        dpi: Some(dpi),
        jpeg_quality: config.jpeg_quality,
        png_compression: config.png_compression,
    };
    match format {
        ExportFormat::Png => codec::encode_png(image, &options),
        ExportFormat::Jpeg | ExportFormat::Jpg => codec::encode_jpeg(image, &options),
        ExportFormat::Tif | ExportFormat::Tiff => codec::encode_tiff(image, &options),
        ExportFormat::Bmp => codec::encode_bmp(image, &options),
        ExportFormat::Gif => codec::encode_gif(image),
        ExportFormat::Raw | ExportFormat::Rgba => Ok(codec::encode_raw(image)),
        ExportFormat::Ppm | ExportFormat::Pgm => codec::encode_pnm(image),
        ExportFormat::Webp => encode_with_image_crate(image, format, config),
        ExportFormat::Eps
        | ExportFormat::Pdf
        | ExportFormat::Pgf
        | ExportFormat::Ps
        | ExportFormat::Svg
        | ExportFormat::Svgz => Err(FigportError::write(
            format.extension(),
            "vector format cannot be encoded from pixels",
        )),
    }
}
