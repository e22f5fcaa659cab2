//! Export dispatcher.
//!
//! Writes one figure in many formats through one backend and records an
//! [`ExportAttempt`] per requested format. A failing format never stops the
//! run; the error becomes that attempt's outcome.
//!
//! ```text
//! format ──► path ──► ensure dir ──┬─ vector backend ──► write_vector
//!                                  └─ raster backend ──► rasterize (once)
//!                                                        resize to target
//!                                                        drop alpha?
//!                                                        write_raster
//!          ──► resolution metadata? ── no ──► SuccessNotApplicable
//!                                    └ yes ─► read back ──► Success
//! ```

use crate::backend::ExportBackend;
use crate::config::{BoundingBox, ExportConfig};
use crate::figure::{Figure, Scene, POINTS_PER_INCH};
use crate::format::ExportFormat;
use crate::raster;
use crate::result::{FigportError, FigportResult};
use crate::verify::Verification;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of one format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// Written; `resolution` is the read-back dpi, `note` explains a
    /// missing one
    Success {
        resolution: Option<f64>,
        note: Option<String>,
    },
    /// Written; the format carries no resolution metadata
    SuccessNotApplicable,
    /// Not written
    Failure { reason: String },
}

impl ExportOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !self.is_failure()
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Read-back resolution, if one was found
    #[must_use]
    pub const fn resolution(&self) -> Option<f64> {
        match self {
            Self::Success { resolution, .. } => *resolution,
            _ => None,
        }
    }

    fn from_verification(verification: Verification) -> Self {
        match verification {
            Verification::Resolved(dpi) => Self::Success {
                resolution: Some(dpi),
                note: None,
            },
            Verification::Missing(note) => Self::Success {
                resolution: None,
                note: Some(note),
            },
            Verification::NotApplicable => Self::SuccessNotApplicable,
        }
    }
}

/// Record of one (backend, format) write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportAttempt {
    backend: String,
    format: ExportFormat,
    path: PathBuf,
    outcome: ExportOutcome,
    pixel_size: Option<(u32, u32)>,
    duration: Duration,
}

impl ExportAttempt {
    #[must_use]
    pub fn backend(&self) -> &str {
        &self.backend
    }

    #[must_use]
    pub const fn format(&self) -> ExportFormat {
        self.format
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn outcome(&self) -> &ExportOutcome {
        &self.outcome
    }

    /// Size of the encoded raster; `None` for vector formats
    #[must_use]
    pub const fn pixel_size(&self) -> Option<(u32, u32)> {
        self.pixel_size
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// One human-readable line: backend, file name, then the resolution or
    /// the failure reason.
    #[must_use]
    pub fn status_line(&self) -> String {
        let file = self
            .path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let detail = match &self.outcome {
            ExportOutcome::Success {
                resolution: Some(dpi),
                ..
            } => format!("saved, DPI: {dpi:.2}"),
            ExportOutcome::Success {
                resolution: None,
                note,
            } => format!("saved, DPI: unknown ({})", note.as_deref().unwrap_or("no tag")),
            ExportOutcome::SuccessNotApplicable => "saved, DPI: not applicable".to_string(),
            ExportOutcome::Failure { reason } => format!("failed: {reason}"),
        };
        format!("[{}] {file}: {detail}", self.backend)
    }
}

impl fmt::Display for ExportAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_line())
    }
}

/// Outcome counts of a set of attempts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub total: usize,
    /// Successes with a read-back resolution
    pub resolved: usize,
    /// Successes whose resolution could not be determined
    pub unresolved: usize,
    pub not_applicable: usize,
    pub failed: usize,
}

impl ExportSummary {
    #[must_use]
    pub fn from_attempts(attempts: &[ExportAttempt]) -> Self {
        attempts.iter().fold(Self::default(), |mut acc, a| {
            acc.total += 1;
            match a.outcome {
                ExportOutcome::Success {
                    resolution: Some(_),
                    ..
                } => acc.resolved += 1,
                ExportOutcome::Success { .. } => acc.unresolved += 1,
                ExportOutcome::SuccessNotApplicable => acc.not_applicable += 1,
                ExportOutcome::Failure { .. } => acc.failed += 1,
            }
            acc
        })
    }

    #[must_use]
    pub const fn succeeded(&self) -> usize {
        self.total - self.failed
    }

    /// Closing line of a backend run. The count is the number of formats
    /// requested, failed ones included.
    #[must_use]
    pub fn saved_line(&self, directory: &Path) -> String {
        format!(
            "Figure saved in {} different formats in the '{}' directory.",
            self.total,
            directory.display()
        )
    }
}

/// All attempts of one backend within [`Exporter::run_all`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendRun {
    pub backend: String,
    pub directory: PathBuf,
    pub attempts: Vec<ExportAttempt>,
}

impl BackendRun {
    #[must_use]
    pub fn summary(&self) -> ExportSummary {
        ExportSummary::from_attempts(&self.attempts)
    }
}

/// Format export dispatcher
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    #[must_use]
    pub const fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Folder of the `index`-th backend (1-based) under `base`.
    #[must_use]
    pub fn backend_directory(base: &Path, index: usize, backend: &dyn ExportBackend) -> PathBuf {
        base.join(format!("method_{index}_{}", backend.name()))
    }

    /// Write `figure` once per format into `destination`.
    ///
    /// Returns exactly one attempt per entry of `formats`, in order.
    /// Per-format problems are recorded, never returned.
    pub fn export(
        &self,
        figure: &Figure,
        backend: &dyn ExportBackend,
        destination: &Path,
        formats: &[ExportFormat],
    ) -> Vec<ExportAttempt> {
        let scene = self.prepare_scene(figure);
        let mut natural: Option<Result<DynamicImage, String>> = None;

        formats
            .iter()
            .map(|&format| {
                let started = Instant::now();
                let path = destination.join(format!(
                    "{}.{}",
                    self.config.base_filename,
                    format.extension()
                ));
                debug!(backend = backend.name(), %format, path = %path.display(), "Exporting");

                let written = ensure_dir(destination).and_then(|()| {
                    if backend.supports_vector() {
                        self.write_from_scene(&scene, figure, backend, &path, format)
                    } else {
                        let base = natural.get_or_insert_with(|| {
                            raster::rasterize(&scene, figure.dpi())
                                .map(DynamicImage::ImageRgba8)
                                .map_err(|e| e.to_string())
                        });
                        match base {
                            Ok(image) => self.write_from_raster(image, backend, &path, format),
                            Err(reason) => Err(FigportError::render(reason.clone())),
                        }
                    }
                });

                let (outcome, pixel_size) = match written {
                    Ok(pixel_size) => (read_back(backend, &path, format), pixel_size),
                    Err(e) => {
                        warn!(backend = backend.name(), %format, path = %path.display(), error = %e, "Export failed");
                        (
                            ExportOutcome::Failure {
                                reason: e.to_string(),
                            },
                            None,
                        )
                    }
                };
                if outcome.is_success() {
                    info!(backend = backend.name(), %format, path = %path.display(), "Exported");
                }

                ExportAttempt {
                    backend: backend.name().to_string(),
                    format,
                    path,
                    outcome,
                    pixel_size,
                    duration: started.elapsed(),
                }
            })
            .collect()
    }

    /// Run every backend with its default formats, each into
    /// `base/method_N_<name>/`.
    pub fn run_all(
        &self,
        figure: &Figure,
        backends: &[Box<dyn ExportBackend>],
        base: &Path,
    ) -> Vec<BackendRun> {
        backends
            .iter()
            .enumerate()
            .map(|(i, backend)| {
                let directory = Self::backend_directory(base, i + 1, backend.as_ref());
                let attempts = self.export(
                    figure,
                    backend.as_ref(),
                    &directory,
                    &backend.default_formats(),
                );
                BackendRun {
                    backend: backend.name().to_string(),
                    directory,
                    attempts,
                }
            })
            .collect()
    }

    fn prepare_scene(&self, figure: &Figure) -> Scene {
        let scene = figure.scene();
        match self.config.bbox {
            BoundingBox::Full => scene,
            BoundingBox::Tight { pad_inches } => scene.tightened(pad_inches * POINTS_PER_INCH),
        }
    }

    /// Vector formats and dpi-hint formats get the target resolution; other
    /// raster formats render at the figure's own.
    fn write_from_scene(
        &self,
        scene: &Scene,
        figure: &Figure,
        backend: &dyn ExportBackend,
        path: &Path,
        format: ExportFormat,
    ) -> FigportResult<Option<(u32, u32)>> {
        let dpi = if format.supports_vector_output() || format.accepts_dpi_hint() {
            self.config.target_dpi
        } else {
            figure.dpi()
        };
        backend.write_vector(scene, path, format, dpi, &self.config)?;
        Ok((!format.supports_vector_output()).then(|| scene.pixel_size(dpi)))
    }

    fn write_from_raster(
        &self,
        natural: &DynamicImage,
        backend: &dyn ExportBackend,
        path: &Path,
        format: ExportFormat,
    ) -> FigportResult<Option<(u32, u32)>> {
        let (width, height) = raster::scaled_dimensions(
            (natural.width(), natural.height()),
            self.config.target_dpi,
            self.config.baseline_dpi,
        );
        let image = raster::convert_layout(
            raster::resize(natural, width, height),
            backend.layout_for(format),
        );
        backend.write_raster(&image, path, format, self.config.target_dpi, &self.config)?;
        Ok(Some((width, height)))
    }
}

fn ensure_dir(dir: &Path) -> FigportResult<()> {
    std::fs::create_dir_all(dir).map_err(FigportError::from)
}

/// Read-back failures still count as a written file.
fn read_back(backend: &dyn ExportBackend, path: &Path, format: ExportFormat) -> ExportOutcome {
    if !format.supports_resolution_metadata() {
        return ExportOutcome::SuccessNotApplicable;
    }
    match backend.read_resolution(path, format) {
        Ok(verification) => ExportOutcome::from_verification(verification),
        Err(e) => {
            warn!(backend = backend.name(), %format, path = %path.display(), error = %e, "Resolution read-back failed");
            ExportOutcome::Success {
                resolution: None,
                note: Some(format!("resolution could not be read: {e}")),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::backend::{self, ImageSaveBackend, LosslessBackend, TaggedBackend, VectorBackend};
    use tempfile::TempDir;

    fn small_figure() -> Figure {
        Figure::new(2.0, 1.5).plot(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.5])
    }

    mod dispatch_tests {
        use super::*;

        #[test]
        fn test_one_attempt_per_format_in_order() {
            let dir = TempDir::new().unwrap();
            let formats = [ExportFormat::Svg, ExportFormat::Png, ExportFormat::Raw];
            let attempts =
                Exporter::default().export(&small_figure(), &VectorBackend, dir.path(), &formats);
            let got: Vec<_> = attempts.iter().map(ExportAttempt::format).collect();
            assert_eq!(got, formats);
        }

        #[test]
        fn test_creates_destination() {
            let dir = TempDir::new().unwrap();
            let dest = dir.path().join("a").join("b");
            let attempts = Exporter::default().export(
                &small_figure(),
                &TaggedBackend,
                &dest,
                &[ExportFormat::Png],
            );
            assert!(attempts[0].outcome().is_success());
            assert!(dest.join("sample_image.png").exists());
        }

        #[test]
        fn test_failure_does_not_stop_run() {
            let dir = TempDir::new().unwrap();
            let formats = [ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Gif];
            let attempts =
                Exporter::default().export(&small_figure(), &LosslessBackend, dir.path(), &formats);
            assert!(attempts[0].outcome().is_success());
            assert!(attempts[1].outcome().is_failure());
            assert!(attempts[2].outcome().is_success());
            assert!(!dir.path().join("sample_image.jpeg").exists());
        }

        #[test]
        fn test_unwritable_destination_fails_every_format() {
            let dir = TempDir::new().unwrap();
            let blocker = dir.path().join("file");
            std::fs::write(&blocker, b"x").unwrap();
            let attempts = Exporter::default().export(
                &small_figure(),
                &TaggedBackend,
                &blocker,
                &[ExportFormat::Png, ExportFormat::Webp],
            );
            assert!(attempts.iter().all(|a| a.outcome().is_failure()));
        }

        #[test]
        fn test_custom_base_filename() {
            let dir = TempDir::new().unwrap();
            let exporter = Exporter::new(ExportConfig::default().with_base_filename("plot"));
            let attempts =
                exporter.export(&small_figure(), &VectorBackend, dir.path(), &[ExportFormat::Pdf]);
            assert_eq!(attempts[0].path(), dir.path().join("plot.pdf"));
        }
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn test_raster_path_scales_by_target_over_baseline() {
            let dir = TempDir::new().unwrap();
            let attempts = Exporter::default().export(
                &small_figure(),
                &TaggedBackend,
                dir.path(),
                &[ExportFormat::Png],
            );
            assert_eq!(attempts[0].pixel_size(), Some((600, 450)));
            let dpi = attempts[0].outcome().resolution().unwrap();
            assert!((dpi - 300.0).abs() < 0.01);
        }

        #[test]
        fn test_vector_backend_native_dpi_for_webp() {
            let dir = TempDir::new().unwrap();
            let attempts = Exporter::default().export(
                &small_figure(),
                &VectorBackend,
                dir.path(),
                &[ExportFormat::Webp, ExportFormat::Tiff, ExportFormat::Svg],
            );
            assert_eq!(attempts[0].pixel_size(), Some((200, 150)));
            assert_eq!(attempts[1].pixel_size(), Some((600, 450)));
            assert_eq!(attempts[2].pixel_size(), None);
            assert_eq!(*attempts[2].outcome(), ExportOutcome::SuccessNotApplicable);
        }

        #[test]
        fn test_missing_tag_recorded_with_note() {
            let dir = TempDir::new().unwrap();
            let attempts = Exporter::default().export(
                &small_figure(),
                &ImageSaveBackend,
                dir.path(),
                &[ExportFormat::Png],
            );
            match attempts[0].outcome() {
                ExportOutcome::Success {
                    resolution: None,
                    note: Some(note),
                } => assert!(note.contains("pHYs")),
                other => panic!("unexpected outcome {other:?}"),
            }
        }

        #[test]
        fn test_tight_bbox_shrinks_output() {
            let dir = TempDir::new().unwrap();
            let figure = Figure::new(4.0, 3.0).plot(vec![0.0, 1.0], vec![0.0, 1.0]);
            let full = Exporter::default().export(
                &figure,
                &TaggedBackend,
                &dir.path().join("full"),
                &[ExportFormat::Png],
            );
            let tight = Exporter::new(ExportConfig::default().with_bbox(BoundingBox::tight()))
                .export(&figure, &TaggedBackend, &dir.path().join("tight"), &[ExportFormat::Png]);
            let (fw, fh) = full[0].pixel_size().unwrap();
            let (tw, th) = tight[0].pixel_size().unwrap();
            assert!(tw <= fw && th <= fh);
            assert!(tw < fw || th < fh);
        }
    }

    mod summary_tests {
        use super::*;

        #[test]
        fn test_run_all_folders_and_summary() {
            let dir = TempDir::new().unwrap();
            let backends = backend::all();
            let runs = Exporter::default().run_all(&small_figure(), &backends, dir.path());
            assert_eq!(runs.len(), 5);
            assert!(runs[0].directory.ends_with("method_1_vector"));
            assert!(runs[4].directory.ends_with("method_5_tagged"));

            let lossless = runs[3].summary();
            assert_eq!(lossless.total, 7);
            assert!(lossless.failed > 0);
            assert_eq!(lossless.succeeded() + lossless.failed, lossless.total);

            let line = runs[0].summary().saved_line(&runs[0].directory);
            assert!(line.starts_with("Figure saved in 14 different formats in the '"));
            assert!(line.ends_with("method_1_vector' directory."));
        }

        #[test]
        fn test_status_lines() {
            let attempt = ExportAttempt {
                backend: "tagged".into(),
                format: ExportFormat::Png,
                path: PathBuf::from("out/sample_image.png"),
                outcome: ExportOutcome::Success {
                    resolution: Some(299.9994),
                    note: None,
                },
                pixel_size: Some((2400, 1800)),
                duration: Duration::ZERO,
            };
            assert_eq!(attempt.status_line(), "[tagged] sample_image.png: saved, DPI: 300.00");

            let failed = ExportAttempt {
                outcome: ExportOutcome::Failure {
                    reason: "boom".into(),
                },
                ..attempt
            };
            assert_eq!(failed.to_string(), "[tagged] sample_image.png: failed: boom");
        }

        #[test]
        fn test_outcome_serializes_with_status_tag() {
            let json = serde_json::to_string(&ExportOutcome::Failure {
                reason: "x".into(),
            })
            .unwrap();
            assert_eq!(json, r#"{"status":"failure","reason":"x"}"#);
        }
    }
}
