//! Metadata-aware encoders and resolution decoders.
//!
//! Encoders turn a pixel buffer into file bytes, embedding a resolution tag
//! where the container has one. Decoders read that tag back from bytes.
//! Neither side touches the filesystem.

mod density;
mod encode;

pub use density::{read_bmp_dpi, read_jfif_dpi, read_png_dpi, read_tiff_dpi};
pub use encode::{
    encode_bmp, encode_gif, encode_jpeg, encode_png, encode_pnm, encode_raw, encode_tiff,
};

use crate::config::CompressionLevel;

/// Metres per inch.
pub const METERS_PER_INCH: f64 = 0.0254;

/// Centimetres per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Settings shared by the encoders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeOptions {
    /// Resolution to embed, if the container stores one
    pub dpi: Option<f64>,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// PNG compression level
    pub png_compression: CompressionLevel,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            dpi: None,
            jpeg_quality: 95,
            png_compression: CompressionLevel::Default,
        }
    }
}

impl EncodeOptions {
    #[must_use]
    pub const fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = Some(dpi);
        self
    }
}

/// Dots per inch to dots per metre, rounded.
pub fn dpi_to_ppm(dpi: f64) -> u32 {
    (dpi / METERS_PER_INCH).round().max(0.0) as u32
}

/// Dots per metre to dots per inch.
pub fn ppm_to_dpi(ppm: u32) -> f64 {
    f64::from(ppm) * METERS_PER_INCH
}
