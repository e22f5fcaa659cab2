//! Figport CLI: export a figure to every supported image format
//!
//! ## Usage
//!
//! ```bash
//! figport export                           # All backends into ./figures
//! figport export -b tagged -f png --dpi 600
//! figport export --tight --json            # Machine-readable report
//! figport formats                          # Format capability table
//! figport backends                         # Backend capability table
//! ```

use clap::Parser;
use figport_cli::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    config.init_logging();
    console::set_colors_enabled(config.color.should_color());

    match cli.command {
        Commands::Export(args) => handlers::run_export(&config, &args).map(|_| ()),
        Commands::Formats(args) => handlers::run_formats(&config, &args),
        Commands::Backends(args) => handlers::run_backends(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_log_json(cli.log_json)
}
