//! Figport CLI Library
//!
//! Command-line interface for the Figport export library.

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{Cli, ColorArg, Commands, ExportArgs, ListArgs};
pub use config::{CliConfig, ColorChoice, Verbosity, LOG_ENV};
pub use error::{CliError, CliResult};
pub use output::ExportReporter;
