//! Covexport CLI: export coverage mappings as JSON
//!
//! ## Usage
//!
//! ```bash
//! covexport export coverage.json                       # Export to stdout
//! covexport export coverage.json -o out.json -j 8      # Export to a file
//! covexport export coverage.json --summary-only        # Summaries only
//! covexport files coverage.json --ignore-filename-regex '^/usr/'
//! ```

use clap::Parser;
use covexport_cli::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    setup_tracing(config.verbosity);

    match run(&config, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", console::style("Error:").red().bold().for_stderr());
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig, command: Commands) -> CliResult<()> {
    match command {
        Commands::Export(args) => handlers::execute_export(config, &args),
        Commands::Files(args) => handlers::execute_files(config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    ColorChoice::from(cli.color.clone()).apply();
    CliConfig::new().with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
}

fn setup_tracing(verbosity: Verbosity) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
