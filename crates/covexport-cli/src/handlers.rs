//! Command handlers

use crate::commands::{ExportArgs, FilesArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use console::style;
use covexport::{CoverageFilters, ExportOptions, JsonExporter, MemoryMapping};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Resolve export options from the optional file and the flags
///
/// # Errors
///
/// Returns error if the options file cannot be loaded
pub fn resolve_options(args: &ExportArgs) -> CliResult<ExportOptions> {
    let base = match &args.options {
        Some(path) => ExportOptions::load(path).map_err(|e| {
            crate::CliError::config(format!("{}: {e}", path.display()))
        })?,
        None => ExportOptions::default(),
    };
    Ok(args.apply_to(base))
}

/// Run the export command
///
/// The document is fully rendered before the output file is created, so a
/// failed export leaves no file behind.
///
/// # Errors
///
/// Returns error if loading, rendering or writing fails
pub fn execute_export(config: &CliConfig, args: &ExportArgs) -> CliResult<()> {
    let options = resolve_options(args)?;
    let mapping = MemoryMapping::load(&args.input)?;
    tracing::debug!(input = %args.input.display(), files = mapping.file_count(), "loaded mapping");

    let exporter = JsonExporter::new(&mapping, options);
    let document = if args.sources.is_empty() {
        let filters = CoverageFilters::from_patterns(&args.ignore_filename_regex)?;
        exporter.render_root_filtered(&filters)?
    } else {
        exporter.render_root(&args.sources)?
    };

    let file_count = document.data.first().map_or(0, |export| export.files.len());
    match &args.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            document.write_to(writer, args.pretty)?;
            if !config.verbosity.is_quiet() {
                eprintln!(
                    "{} Exported {file_count} file(s) to {}",
                    style("✓").green().for_stderr(),
                    path.display()
                );
            }
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            document.write_to(&mut lock, args.pretty)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

/// Run the files command
///
/// # Errors
///
/// Returns error if loading the mapping or compiling a filter fails
pub fn execute_files(_config: &CliConfig, args: &FilesArgs) -> CliResult<()> {
    let mapping = MemoryMapping::load(&args.input)?;
    let filters = CoverageFilters::from_patterns(&args.ignore_filename_regex)?;
    let exporter = JsonExporter::new(&mapping, ExportOptions::default());

    let stdout = io::stdout();
    let mut lock = stdout.lock();
    for file in exporter.filtered_files(&filters) {
        writeln!(lock, "{file}")?;
    }
    Ok(())
}
