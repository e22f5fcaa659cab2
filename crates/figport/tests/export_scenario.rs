//! End-to-end export of the sine demo through every backend.

#![allow(clippy::unwrap_used, clippy::panic)]

use figport::prelude::*;
use figport::{LosslessBackend, TaggedBackend, VectorBackend};
use std::path::Path;
use tempfile::TempDir;

fn export_one(dir: &Path, backend: &dyn ExportBackend, formats: &[ExportFormat]) -> Vec<ExportAttempt> {
    Exporter::default().export(&Figure::sine_demo(), backend, dir, formats)
}

#[test]
fn vector_backend_writes_all_fourteen_formats() {
    let dir = TempDir::new().unwrap();
    let formats = VectorBackend.default_formats();
    let attempts = export_one(dir.path(), &VectorBackend, &formats);

    assert_eq!(attempts.len(), 14);
    for (attempt, format) in attempts.iter().zip(&formats) {
        assert_eq!(attempt.format(), *format);
        assert!(attempt.path().exists(), "{}", attempt.status_line());
        match attempt.outcome() {
            ExportOutcome::Success {
                resolution: Some(dpi),
                ..
            } => assert!((dpi - 300.0).abs() < 0.01, "{}", attempt.status_line()),
            ExportOutcome::SuccessNotApplicable => {
                assert!(!format.supports_resolution_metadata());
            }
            other => panic!("{format}: unexpected {other:?}"),
        }
    }
}

#[test]
fn every_backend_reports_one_attempt_per_format() {
    let dir = TempDir::new().unwrap();
    let runs = Exporter::default().run_all(&Figure::sine_demo(), &backend::all(), dir.path());
    for run in &runs {
        let backend = backend::by_name(&run.backend).unwrap();
        assert_eq!(run.attempts.len(), backend.default_formats().len());
        assert!(run.directory.is_dir());
    }
}

#[test]
fn png_export_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample_image.png");

    export_one(dir.path(), &TaggedBackend, &[ExportFormat::Png]);
    let first = std::fs::read(&path).unwrap();
    export_one(dir.path(), &TaggedBackend, &[ExportFormat::Png]);
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first.len(), second.len());
    assert_eq!(first, second);
}

#[test]
fn backend_without_alpha_writes_three_channels() {
    let dir = TempDir::new().unwrap();
    let buffered = backend::by_name("buffered").unwrap();
    let attempts = export_one(dir.path(), buffered.as_ref(), &[ExportFormat::Png]);
    assert!(attempts[0].outcome().is_success());

    let decoded = image::open(attempts[0].path()).unwrap();
    assert_eq!(decoded.color().channel_count(), 3);
}

#[test]
fn raster_width_scales_from_baseline() {
    let dir = TempDir::new().unwrap();
    let attempts = export_one(dir.path(), &TaggedBackend, &[ExportFormat::Png, ExportFormat::Webp]);
    for attempt in &attempts {
        let decoded = image::open(attempt.path()).unwrap();
        let expected = (800.0_f64 * 300.0 / 100.0).round() as i64;
        assert!((i64::from(decoded.width()) - expected).abs() <= 1);
    }
}

#[test]
fn failing_format_does_not_affect_the_others() {
    let dir = TempDir::new().unwrap();
    let formats = [ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Gif];
    let attempts = export_one(dir.path(), &LosslessBackend, &formats);

    assert!(matches!(
        attempts[1].outcome(),
        ExportOutcome::Failure { reason } if reason.contains("jpeg")
    ));
    assert!(attempts[0].outcome().is_success());
    assert!(attempts[2].outcome().is_success());
    assert!(dir.path().join("sample_image.png").exists());
    assert!(dir.path().join("sample_image.gif").exists());
}

#[test]
fn formats_without_metadata_are_never_read_back() {
    let dir = TempDir::new().unwrap();
    let formats = [ExportFormat::Svg, ExportFormat::Webp, ExportFormat::Raw];
    let attempts = export_one(dir.path(), &VectorBackend, &formats);
    for attempt in &attempts {
        assert_eq!(*attempt.outcome(), ExportOutcome::SuccessNotApplicable);
    }
    assert_eq!(
        figport::verify(Path::new("does/not/exist.webp"), ExportFormat::Webp).unwrap(),
        Verification::NotApplicable
    );
}

#[test]
fn summary_line_counts_requested_formats() {
    let dir = TempDir::new().unwrap();
    let runs = Exporter::default().run_all(
        &Figure::sine_demo(),
        &[backend::by_name("lossless").unwrap()],
        dir.path(),
    );
    let summary = runs[0].summary();
    assert_eq!(summary.total, 7);
    assert_eq!(
        summary.saved_line(&runs[0].directory),
        format!(
            "Figure saved in 7 different formats in the '{}' directory.",
            runs[0].directory.display()
        )
    );
}
