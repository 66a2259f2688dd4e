//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use covexport::ExportOptions;
use std::path::PathBuf;

/// Covexport: render coverage mappings as llvm.coverage.json.export documents
#[derive(Parser, Debug)]
#[command(name = "covexport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a coverage mapping snapshot as JSON
    Export(ExportArgs),

    /// List the source files that would be exported
    Files(FilesArgs),
}

/// Arguments for the export command
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Coverage mapping snapshot (JSON)
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export options file (YAML); flags override its values
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Export only summary information for each file and the totals
    #[arg(long)]
    pub summary_only: bool,

    /// Omit expansion records from file objects
    #[arg(long)]
    pub skip_expansions: bool,

    /// Omit the top-level function table
    #[arg(long)]
    pub skip_functions: bool,

    /// Worker threads (0 = auto)
    #[arg(short = 'j', long = "num-threads")]
    pub num_threads: Option<usize>,

    /// Skip source files whose names match this regex (repeatable)
    #[arg(long = "ignore-filename-regex", value_name = "REGEX")]
    pub ignore_filename_regex: Vec<String>,

    /// Export exactly these source files instead of every mapped file
    #[arg(long, num_args = 1.., value_name = "FILE", conflicts_with = "ignore_filename_regex")]
    pub sources: Vec<String>,

    /// Pretty-print the JSON document
    #[arg(long)]
    pub pretty: bool,
}

impl ExportArgs {
    /// Apply the flags on top of base options
    #[must_use]
    pub fn apply_to(&self, base: ExportOptions) -> ExportOptions {
        ExportOptions {
            export_summary_only: base.export_summary_only || self.summary_only,
            skip_expansions: base.skip_expansions || self.skip_expansions,
            skip_functions: base.skip_functions || self.skip_functions,
            num_threads: self.num_threads.unwrap_or(base.num_threads),
        }
    }
}

/// Arguments for the files command
#[derive(Parser, Debug)]
pub struct FilesArgs {
    /// Coverage mapping snapshot (JSON)
    pub input: PathBuf,

    /// Skip source files whose names match this regex (repeatable)
    #[arg(long = "ignore-filename-regex", value_name = "REGEX")]
    pub ignore_filename_regex: Vec<String>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
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
