//! Figport: export one figure to many image formats
//!
//! A [`Figure`] is laid out once as a resolution independent [`Scene`] and
//! then written through interchangeable [`ExportBackend`]s. Each write is
//! verified by reading the declared resolution back from the file.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      FIGPORT Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Figure     │    │ Exporter   │    │ Backend    │            │
//! │   │ (scene)    │───►│ (per       │───►│ (vector /  │──► file    │
//! │   │            │    │  format)   │    │  raster)   │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │                           ▲                                      │
//! │                           └──────── verify (read-back dpi) ◄─────┤
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use figport::{backend, ExportConfig, Exporter, Figure};
//!
//! let exporter = Exporter::new(ExportConfig::default());
//! let runs = exporter.run_all(&Figure::sine_demo(), &backend::all(), "figures".as_ref());
//! for run in &runs {
//!     for attempt in &run.attempts {
//!         println!("{attempt}");
//!     }
//! }
//! ```

// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod backend;
pub mod codec;
pub mod figure;
pub mod raster;
pub mod render;

mod config;
mod export;
mod format;
mod result;
mod verify;

pub use backend::{
    BufferedBackend, ExportBackend, ImageSaveBackend, LosslessBackend, TaggedBackend,
    VectorBackend,
};
pub use config::{
    BoundingBox, CompressionLevel, ExportConfig, DEFAULT_BASELINE_DPI, DEFAULT_BASE_FILENAME,
    DEFAULT_TARGET_DPI, DEFAULT_TIGHT_PAD_INCHES,
};
pub use export::{BackendRun, ExportAttempt, ExportOutcome, ExportSummary, Exporter};
pub use figure::{Figure, Scene};
pub use format::{ExportFormat, RASTER_BASE_FORMATS, VECTOR_BACKEND_FORMATS};
pub use raster::ChannelLayout;
pub use render::SvgCompression;
pub use result::{FigportError, FigportResult};
pub use verify::{verify, Verification};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::backend::{self, ExportBackend};
    pub use super::{
        BoundingBox, ExportAttempt, ExportConfig, ExportFormat, ExportOutcome, Exporter, Figure,
        FigportError, FigportResult, Verification,
    };
}
