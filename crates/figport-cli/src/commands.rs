//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use figport::{backend, ExportFormat, DEFAULT_BASELINE_DPI, DEFAULT_BASE_FILENAME, DEFAULT_TARGET_DPI};
use std::path::PathBuf;

/// Figport: export one figure to every supported image format
#[derive(Parser, Debug)]
#[command(name = "figport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the demo figure through one or more backends
    Export(ExportArgs),

    /// List formats and their capabilities
    Formats(ListArgs),

    /// List backends, their capabilities and default formats
    Backends(ListArgs),
}

/// Arguments for the export command
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Root output directory; each backend writes into method_N_<name>/
    #[arg(short, long, default_value = "figures")]
    pub out: PathBuf,

    /// Target resolution in dots per inch
    #[arg(long, default_value_t = DEFAULT_TARGET_DPI)]
    pub dpi: f64,

    /// Resolution of the natural raster size
    #[arg(long, default_value_t = DEFAULT_BASELINE_DPI)]
    pub baseline: f64,

    /// Backend to run (repeatable; all when omitted)
    #[arg(short, long = "backend", value_parser = parse_backend)]
    pub backends: Vec<String>,

    /// Format to write (repeatable; each backend's defaults when omitted)
    #[arg(short, long = "format", value_parser = parse_format)]
    pub formats: Vec<ExportFormat>,

    /// Crop to the drawn content plus padding
    #[arg(long)]
    pub tight: bool,

    /// File stem of every written file
    #[arg(long, default_value = DEFAULT_BASE_FILENAME)]
    pub name: String,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 95, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Print the runs as JSON instead of status lines
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the listing commands
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse().map_err(|e: figport::FigportError| e.to_string())
}

fn parse_backend(s: &str) -> Result<String, String> {
    backend::by_name(s)
        .map(|b| b.name().to_string())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    mod export_args_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let cli = Cli::try_parse_from(["figport", "export"]).unwrap();
            let Commands::Export(args) = cli.command else {
                panic!("expected export");
            };
            assert_eq!(args.out, PathBuf::from("figures"));
            assert_eq!(args.dpi, 300.0);
            assert_eq!(args.baseline, 100.0);
            assert!(args.backends.is_empty());
            assert!(args.formats.is_empty());
            assert_eq!(args.name, "sample_image");
            assert!(!args.tight);
        }

        #[test]
        fn test_repeated_selectors() {
            let cli = Cli::try_parse_from([
                "figport", "export", "-b", "Tagged", "-b", "vector", "-f", ".PNG", "-f", "svgz",
            ])
            .unwrap();
            let Commands::Export(args) = cli.command else {
                panic!("expected export");
            };
            assert_eq!(args.backends, vec!["tagged", "vector"]);
            assert_eq!(args.formats, vec![ExportFormat::Png, ExportFormat::Svgz]);
        }

        #[test]
        fn test_unknown_format_rejected() {
            assert!(Cli::try_parse_from(["figport", "export", "-f", "heic"]).is_err());
        }

        #[test]
        fn test_unknown_backend_rejected() {
            assert!(Cli::try_parse_from(["figport", "export", "-b", "cairo"]).is_err());
        }

        #[test]
        fn test_quality_range() {
            assert!(Cli::try_parse_from(["figport", "export", "--quality", "0"]).is_err());
            assert!(Cli::try_parse_from(["figport", "export", "--quality", "100"]).is_ok());
        }
    }

    mod global_args_tests {
        use super::*;

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli =
                Cli::try_parse_from(["figport", "formats", "-vv", "--color", "never"]).unwrap();
            assert_eq!(cli.verbose, 2);
            assert!(matches!(cli.color, ColorArg::Never));
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["figport"]).is_err());
        }
    }
}
