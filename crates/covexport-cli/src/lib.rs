//! Covexport CLI Library
//!
//! Command-line interface for exporting coverage mapping snapshots as
//! `llvm.coverage.json.export` documents.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;

pub use commands::{Cli, ColorArg, Commands, ExportArgs, FilesArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
