//! Target file formats and their fixed capability flags.
//!
//! Capabilities belong to the format, never to the backend writing it: a
//! backend decides *how* to encode, the format decides whether a vector form
//! can be consumed, whether a resolution tag is stored and which channel
//! layout the encoded pixels have.

use crate::raster::ChannelLayout;
use crate::result::FigportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A target file format, identified by its extension token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Eps,
    Jpeg,
    Jpg,
    Pdf,
    Pgf,
    Png,
    Ps,
    Raw,
    Rgba,
    Svg,
    Svgz,
    Tif,
    Tiff,
    Webp,
    Bmp,
    Gif,
    Ppm,
    Pgm,
}

/// Formats exported by the vector-capable backend, in order.
pub const VECTOR_BACKEND_FORMATS: [ExportFormat; 14] = [
    ExportFormat::Eps,
    ExportFormat::Jpeg,
    ExportFormat::Jpg,
    ExportFormat::Pdf,
    ExportFormat::Pgf,
    ExportFormat::Png,
    ExportFormat::Ps,
    ExportFormat::Raw,
    ExportFormat::Rgba,
    ExportFormat::Svg,
    ExportFormat::Svgz,
    ExportFormat::Tif,
    ExportFormat::Tiff,
    ExportFormat::Webp,
];

/// Formats every raster-only backend starts from.
pub const RASTER_BASE_FORMATS: [ExportFormat; 6] = [
    ExportFormat::Jpeg,
    ExportFormat::Jpg,
    ExportFormat::Png,
    ExportFormat::Tif,
    ExportFormat::Tiff,
    ExportFormat::Webp,
];

impl ExportFormat {
    /// Every known format
    pub const ALL: [Self; 18] = [
        Self::Eps,
        Self::Jpeg,
        Self::Jpg,
        Self::Pdf,
        Self::Pgf,
        Self::Png,
        Self::Ps,
        Self::Raw,
        Self::Rgba,
        Self::Svg,
        Self::Svgz,
        Self::Tif,
        Self::Tiff,
        Self::Webp,
        Self::Bmp,
        Self::Gif,
        Self::Ppm,
        Self::Pgm,
    ];

    /// Extension token, also used as the file extension
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Eps => "eps",
            Self::Jpeg => "jpeg",
            Self::Jpg => "jpg",
            Self::Pdf => "pdf",
            Self::Pgf => "pgf",
            Self::Png => "png",
            Self::Ps => "ps",
            Self::Raw => "raw",
            Self::Rgba => "rgba",
            Self::Svg => "svg",
            Self::Svgz => "svgz",
            Self::Tif => "tif",
            Self::Tiff => "tiff",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Ppm => "ppm",
            Self::Pgm => "pgm",
        }
    }

    /// Can be written straight from the vector form
    pub const fn supports_vector_output(self) -> bool {
        matches!(
            self,
            Self::Eps | Self::Pdf | Self::Pgf | Self::Ps | Self::Svg | Self::Svgz
        )
    }

    /// The written file embeds a resolution tag that can be read back
    pub const fn supports_resolution_metadata(self) -> bool {
        matches!(
            self,
            Self::Png | Self::Jpeg | Self::Jpg | Self::Tif | Self::Tiff | Self::Bmp
        )
    }

    /// Honours a requested dpi when rendered from the vector form.
    /// Other raster formats are rendered at the figure's native dpi.
    pub const fn accepts_dpi_hint(self) -> bool {
        matches!(
            self,
            Self::Png | Self::Jpeg | Self::Jpg | Self::Tif | Self::Tiff
        )
    }

    /// Channel layout of encoded pixels
    pub const fn layout(self) -> ChannelLayout {
        match self {
            Self::Jpeg | Self::Jpg | Self::Ppm => ChannelLayout::Rgb,
            Self::Pgm => ChannelLayout::Gray,
            _ => ChannelLayout::Rgba,
        }
    }

    /// Encoded pixels carry an alpha channel
    pub const fn has_alpha(self) -> bool {
        self.layout().has_alpha()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = FigportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.extension() == token)
            .ok_or_else(|| FigportError::UnknownFormat(s.to_string()))
    }
}
