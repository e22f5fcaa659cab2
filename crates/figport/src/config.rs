//! Export configuration.
//!
//! Everything is an in-process parameter; there is no configuration file.

use crate::render::SvgCompression;
use crate::result::{FigportError, FigportResult};
use serde::{Deserialize, Serialize};

/// Default output resolution
pub const DEFAULT_TARGET_DPI: f64 = 300.0;

/// Resolution the raster-only backends treat as the natural size
pub const DEFAULT_BASELINE_DPI: f64 = 100.0;

/// Default file stem of every written file
pub const DEFAULT_BASE_FILENAME: &str = "sample_image";

/// Padding around the content for [`BoundingBox::Tight`]
pub const DEFAULT_TIGHT_PAD_INCHES: f64 = 0.1;

/// PNG compression level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompressionLevel {
    /// Fast compression, larger files
    Fast,
    /// Default compression
    #[default]
    Default,
    /// Best compression (slowest, smallest files)
    Best,
}

impl CompressionLevel {
    /// Convert to png crate compression level
    pub(crate) const fn to_png_compression(self) -> png::Compression {
        match self {
            Self::Fast => png::Compression::Fast,
            Self::Default => png::Compression::Default,
            Self::Best => png::Compression::Best,
        }
    }

    /// Equivalent setting of the image crate's PNG encoder
    pub(crate) const fn to_image_compression(self) -> image::codecs::png::CompressionType {
        match self {
            Self::Fast => image::codecs::png::CompressionType::Fast,
            Self::Default => image::codecs::png::CompressionType::Default,
            Self::Best => image::codecs::png::CompressionType::Best,
        }
    }
}

/// Region of the figure that is exported
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum BoundingBox {
    /// The whole page
    #[default]
    Full,
    /// The drawn content plus padding
    Tight {
        /// Padding on every side, in inches
        pad_inches: f64,
    },
}

impl BoundingBox {
    /// Tight box with the default padding
    #[must_use]
    pub const fn tight() -> Self {
        Self::Tight {
            pad_inches: DEFAULT_TIGHT_PAD_INCHES,
        }
    }
}

/// Configuration for an [`crate::Exporter`]
///
/// ## Example
///
/// ```ignore
/// let config = ExportConfig::new()
///     .with_target_dpi(150.0)
///     .with_bbox(BoundingBox::tight());
/// config.validate()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Requested output resolution
    pub target_dpi: f64,
    /// Resolution of the natural raster size
    pub baseline_dpi: f64,
    /// File stem; the extension is appended per format
    pub base_filename: String,
    /// Exported region
    pub bbox: BoundingBox,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// PNG compression
    pub png_compression: CompressionLevel,
    /// SVG whitespace handling
    pub svg_compression: SvgCompression,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            target_dpi: DEFAULT_TARGET_DPI,
            baseline_dpi: DEFAULT_BASELINE_DPI,
            base_filename: DEFAULT_BASE_FILENAME.to_string(),
            bbox: BoundingBox::Full,
            jpeg_quality: 95,
            png_compression: CompressionLevel::Default,
            svg_compression: SvgCompression::None,
        }
    }
}

impl ExportConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested output resolution
    #[must_use]
    pub const fn with_target_dpi(mut self, dpi: f64) -> Self {
        self.target_dpi = dpi;
        self
    }

    /// Set the resolution that maps to the natural raster size
    #[must_use]
    pub const fn with_baseline_dpi(mut self, dpi: f64) -> Self {
        self.baseline_dpi = dpi;
        self
    }

    /// Set the file stem
    #[must_use]
    pub fn with_base_filename(mut self, name: impl Into<String>) -> Self {
        self.base_filename = name.into();
        self
    }

    /// Set the exported region
    #[must_use]
    pub const fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Set the JPEG quality, clamped to 1-100
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Set the PNG compression level
    #[must_use]
    pub const fn with_png_compression(mut self, compression: CompressionLevel) -> Self {
        self.png_compression = compression;
        self
    }

    /// Set SVG whitespace handling
    #[must_use]
    pub const fn with_svg_compression(mut self, compression: SvgCompression) -> Self {
        self.svg_compression = compression;
        self
    }

    /// Check that the configuration can drive an export
    ///
    /// # Errors
    ///
    /// Returns [`FigportError::Config`] for a non-finite or non-positive
    /// resolution, an empty or path-like base filename, a negative padding
    /// or a JPEG quality outside 1-100.
    pub fn validate(&self) -> FigportResult<()> {
        check_dpi("target_dpi", self.target_dpi)?;
        check_dpi("baseline_dpi", self.baseline_dpi)?;
        if self.base_filename.trim().is_empty() {
            return Err(FigportError::config("base_filename must not be empty"));
        }
        if self.base_filename.contains(['/', '\\']) {
            return Err(FigportError::config(format!(
                "base_filename must not contain a path separator: {}",
                self.base_filename
            )));
        }
        if let BoundingBox::Tight { pad_inches } = self.bbox {
            if !pad_inches.is_finite() || pad_inches < 0.0 {
                return Err(FigportError::config(format!(
                    "pad_inches must be a non-negative number, got {pad_inches}"
                )));
            }
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(FigportError::config(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

fn check_dpi(name: &str, value: f64) -> FigportResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FigportError::config(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.target_dpi, 300.0);
        assert_eq!(config.baseline_dpi, 100.0);
        assert_eq!(config.base_filename, "sample_image");
        assert_eq!(config.bbox, BoundingBox::Full);
        assert_eq!(config.jpeg_quality, 95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ExportConfig::new()
            .with_target_dpi(150.0)
            .with_baseline_dpi(72.0)
            .with_base_filename("plot")
            .with_bbox(BoundingBox::tight())
            .with_png_compression(CompressionLevel::Best)
            .with_svg_compression(SvgCompression::Minified);
        assert_eq!(config.target_dpi, 150.0);
        assert_eq!(config.baseline_dpi, 72.0);
        assert_eq!(config.base_filename, "plot");
        assert_eq!(config.bbox, BoundingBox::Tight { pad_inches: 0.1 });
        assert_eq!(config.png_compression, CompressionLevel::Best);
    }

    #[test]
    fn test_jpeg_quality_clamped() {
        assert_eq!(ExportConfig::new().with_jpeg_quality(0).jpeg_quality, 1);
        assert_eq!(ExportConfig::new().with_jpeg_quality(200).jpeg_quality, 100);
    }

    mod validate_tests {
        use super::*;

        fn is_config_error(config: &ExportConfig) -> bool {
            matches!(config.validate(), Err(FigportError::Config { .. }))
        }

        #[test]
        fn test_rejects_bad_dpi() {
            assert!(is_config_error(&ExportConfig::new().with_target_dpi(0.0)));
            assert!(is_config_error(&ExportConfig::new().with_target_dpi(-5.0)));
            assert!(is_config_error(&ExportConfig::new().with_target_dpi(f64::NAN)));
            assert!(is_config_error(&ExportConfig::new().with_baseline_dpi(f64::INFINITY)));
        }

        #[test]
        fn test_rejects_bad_filename() {
            assert!(is_config_error(&ExportConfig::new().with_base_filename("  ")));
            assert!(is_config_error(&ExportConfig::new().with_base_filename("a/b")));
        }

        #[test]
        fn test_rejects_negative_pad() {
            let config = ExportConfig::new().with_bbox(BoundingBox::Tight { pad_inches: -1.0 });
            assert!(is_config_error(&config));
        }

        #[test]
        fn test_rejects_zero_quality_set_directly() {
            let mut config = ExportConfig::new();
            config.jpeg_quality = 0;
            assert!(is_config_error(&config));
        }
    }
}
