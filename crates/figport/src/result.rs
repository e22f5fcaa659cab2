//! Result and error types for figport.

use thiserror::Error;

/// Result type for figport operations
pub type FigportResult<T> = Result<T, FigportError>;

/// Errors that can occur while rendering, encoding or verifying an export
#[derive(Debug, Error)]
pub enum FigportError {
    /// Backend could not encode or write the file
    #[error("Write failed for {format}: {message}")]
    Write {
        /// Extension token of the target format
        format: String,
        /// Error message
        message: String,
    },

    /// File was written but its resolution tag could not be read
    #[error("Metadata read failed: {message}")]
    MetadataRead {
        /// Error message
        message: String,
    },

    /// Backend has no encoder for the requested format
    #[error("Backend '{backend}' cannot write {format}")]
    UnsupportedFormat {
        /// Backend name
        backend: String,
        /// Extension token
        format: String,
    },

    /// Extension token is not a known format
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Backend name is not registered
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    /// Invalid export configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Vector writer failed to produce output
    #[error("Render failed: {message}")]
    Render {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the image crate
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FigportError {
    /// Create a write error for a format token
    #[must_use]
    pub fn write(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create a metadata read error
    #[must_use]
    pub fn metadata_read(message: impl Into<String>) -> Self {
        Self::MetadataRead {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a render error
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

impl From<std::fmt::Error> for FigportError {
    fn from(e: std::fmt::Error) -> Self {
        Self::render(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_display() {
        let err = FigportError::write("jpeg", "unsupported color type");
        assert_eq!(
            err.to_string(),
            "Write failed for jpeg: unsupported color type"
        );
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = FigportError::UnsupportedFormat {
            backend: "lossless".to_string(),
            format: "jpeg".to_string(),
        };
        assert!(err.to_string().contains("lossless"));
        assert!(err.to_string().contains("jpeg"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FigportError = io.into();
        assert!(matches!(err, FigportError::Io(_)));
    }

    #[test]
    fn test_fmt_error_becomes_render() {
        let err: FigportError = std::fmt::Error.into();
        assert!(matches!(err, FigportError::Render { .. }));
    }
}
