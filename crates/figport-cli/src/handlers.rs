//! Subcommand implementations

use crate::commands::{ExportArgs, ListArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ExportReporter;
use figport::{
    backend, BackendRun, BoundingBox, ExportBackend, ExportConfig, ExportFormat, Exporter, Figure,
};
use serde::Serialize;
use tracing::info;

/// Capability row of `figport formats`
#[derive(Debug, Clone, Serialize)]
pub struct FormatRow {
    pub format: ExportFormat,
    pub vector: bool,
    pub resolution_tag: bool,
    pub dpi_hint: bool,
    pub alpha: bool,
}

/// Row of `figport backends`
#[derive(Debug, Clone, Serialize)]
pub struct BackendRow {
    pub name: &'static str,
    pub vector: bool,
    pub alpha: bool,
    pub formats: Vec<ExportFormat>,
}

/// Library configuration for an export run.
pub fn export_config(args: &ExportArgs) -> CliResult<ExportConfig> {
    let bbox = if args.tight {
        BoundingBox::tight()
    } else {
        BoundingBox::Full
    };
    let config = ExportConfig::new()
        .with_target_dpi(args.dpi)
        .with_baseline_dpi(args.baseline)
        .with_base_filename(args.name.clone())
        .with_bbox(bbox)
        .with_jpeg_quality(args.quality);
    config
        .validate()
        .map_err(|e| CliError::config(e.to_string()))?;
    Ok(config)
}

/// Backends named in `names`, in the given order; every backend when empty.
pub fn selected_backends(names: &[String]) -> CliResult<Vec<Box<dyn ExportBackend>>> {
    if names.is_empty() {
        return Ok(backend::all());
    }
    names
        .iter()
        .map(|name| backend::by_name(name).map_err(CliError::from))
        .collect()
}

/// Export the demo figure and report every attempt.
///
/// Per-format failures are part of the report, not errors.
pub fn run_export(config: &CliConfig, args: &ExportArgs) -> CliResult<Vec<BackendRun>> {
    let export_config = export_config(args)?;
    let backends = selected_backends(&args.backends)?;
    let exporter = Exporter::new(export_config);
    let figure = Figure::sine_demo();

    let mut reporter = ExportReporter::new(
        config.color.should_color(),
        config.verbosity.is_quiet() || args.json,
    );
    reporter.start_progress(backends.len() as u64, "Exporting");

    let mut runs = Vec::with_capacity(backends.len());
    for (i, backend) in backends.iter().enumerate() {
        reporter.set_message(backend.name());
        let directory = Exporter::backend_directory(&args.out, i + 1, backend.as_ref());
        let formats = if args.formats.is_empty() {
            backend.default_formats()
        } else {
            args.formats.clone()
        };
        info!(backend = backend.name(), directory = %directory.display(), formats = formats.len(), "Running backend");

        let attempts = exporter.export(&figure, backend.as_ref(), &directory, &formats);
        let run = BackendRun {
            backend: backend.name().to_string(),
            directory,
            attempts,
        };
        reporter.header(&format!("Method {}: {}", i + 1, run.backend));
        for attempt in &run.attempts {
            reporter.attempt(attempt);
        }
        reporter.backend_summary(&run);
        reporter.increment(1);
        runs.push(run);
    }
    reporter.finish();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
    }
    Ok(runs)
}

/// Capability table of every format.
pub fn format_rows() -> Vec<FormatRow> {
    ExportFormat::ALL
        .iter()
        .map(|&format| FormatRow {
            format,
            vector: format.supports_vector_output(),
            resolution_tag: format.supports_resolution_metadata(),
            dpi_hint: format.accepts_dpi_hint(),
            alpha: format.has_alpha(),
        })
        .collect()
}

/// Capability table of every backend.
pub fn backend_rows() -> Vec<BackendRow> {
    backend::all()
        .iter()
        .map(|b| BackendRow {
            name: b.name(),
            vector: b.supports_vector(),
            alpha: b.supports_alpha(),
            formats: b.default_formats(),
        })
        .collect()
}

fn flag(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "-"
    }
}

pub fn run_formats(config: &CliConfig, args: &ListArgs) -> CliResult<()> {
    let rows = format_rows();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    let reporter = ExportReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.header("Formats");
    reporter.line(&format!(
        "{:<8} {:<8} {:<10} {:<8} {:<6}",
        "FORMAT", "VECTOR", "DPI TAG", "DPI HINT", "ALPHA"
    ));
    for row in &rows {
        reporter.line(&format!(
            "{:<8} {:<8} {:<10} {:<8} {:<6}",
            row.format.to_string(),
            flag(row.vector),
            flag(row.resolution_tag),
            flag(row.dpi_hint),
            flag(row.alpha)
        ));
    }
    Ok(())
}

pub fn run_backends(config: &CliConfig, args: &ListArgs) -> CliResult<()> {
    let rows = backend_rows();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    let reporter = ExportReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.header("Backends");
    for row in &rows {
        let formats: Vec<String> = row.formats.iter().map(ToString::to_string).collect();
        reporter.line(&format!(
            "{:<10} vector: {:<4} alpha: {:<4} formats: {}",
            row.name,
            flag(row.vector),
            flag(row.alpha),
            formats.join(", ")
        ));
    }
    Ok(())
}
