//! JSON Coverage Export
//!
//! Renders a coverage mapping into the versioned
//! `llvm.coverage.json.export` document.
//!
//! ```text
//! {
//!   "data": [ { "files": [...], "functions"?: [...], "totals": {...} } ],
//!   "type": "llvm.coverage.json.export",
//!   "version": "2.0.0"
//! }
//! ```
//!
//! Files are rendered concurrently, then sorted by filename, so the output
//! does not depend on the worker count or on job completion order.

mod parallel;
mod schema;

pub use parallel::{effective_threads, render_files};
pub use schema::{
    render_expansion, render_file, render_functions, render_region, render_regions,
    render_segment, render_summary, CountSummary, FileExport, RegionSummary, RenderedExpansion,
    RenderedFunction, RenderedRegion, RenderedSegment, RenderedSummary,
};

use crate::filters::FilenameFilter;
use crate::mapping::CoverageMapping;
use crate::options::ExportOptions;
use crate::report::{CoverageReport, Summarizer};
use crate::result::{ExportError, ExportResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

/// Schema version of the export document
pub const EXPORT_VERSION: &str = "2.0.0";

/// Type tag of the export document
pub const EXPORT_TYPE: &str = "llvm.coverage.json.export";

/// One export object: files, totals and optionally the function table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageExport {
    /// Files sorted by filename
    pub files: Vec<FileExport>,
    /// Function table, unless suppressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<RenderedFunction>>,
    /// Aggregate summary
    pub totals: RenderedSummary,
}

/// Versioned, type-tagged export envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Export objects (always exactly one when produced here)
    pub data: Vec<CoverageExport>,
    /// Document type tag
    #[serde(rename = "type")]
    pub kind: String,
    /// Schema version
    pub version: String,
}

impl ExportDocument {
    /// Wrap an export object in the envelope
    #[must_use]
    pub fn new(export: CoverageExport) -> Self {
        Self {
            data: vec![export],
            kind: EXPORT_TYPE.to_string(),
            version: EXPORT_VERSION.to_string(),
        }
    }

    /// Serialize to compact JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json_pretty(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to a sink in one call
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails
    pub fn write_to<W: Write>(&self, mut writer: W, pretty: bool) -> ExportResult<()> {
        let bytes = if pretty {
            serde_json::to_vec_pretty(self)?
        } else {
            serde_json::to_vec(self)?
        };
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}

/// Exports a coverage mapping as a JSON document
#[derive(Debug)]
pub struct JsonExporter<'a, M: ?Sized, S = CoverageReport> {
    mapping: &'a M,
    summarizer: S,
    options: ExportOptions,
}

impl<'a, M> JsonExporter<'a, M, CoverageReport>
where
    M: CoverageMapping + ?Sized,
{
    /// Create an exporter using the default summarizer
    #[must_use]
    pub fn new(mapping: &'a M, options: ExportOptions) -> Self {
        Self {
            mapping,
            summarizer: CoverageReport::new(),
            options,
        }
    }
}

impl<'a, M, S> JsonExporter<'a, M, S>
where
    M: CoverageMapping + ?Sized,
    S: Summarizer,
{
    /// Replace the summarizer
    #[must_use]
    pub fn with_summarizer<T: Summarizer>(self, summarizer: T) -> JsonExporter<'a, M, T> {
        JsonExporter {
            mapping: self.mapping,
            summarizer,
            options: self.options,
        }
    }

    /// Export options in effect
    #[must_use]
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Source files that survive the ignore filter, in mapping order
    pub fn filtered_files<F>(&self, filter: &F) -> Vec<String>
    where
        F: FilenameFilter + ?Sized,
    {
        self.mapping
            .unique_source_files()
            .into_iter()
            .filter(|name| !filter.matches_filename(name))
            .collect()
    }

    /// Render the document for every source file not matched by `filter`
    ///
    /// # Errors
    ///
    /// Returns error if summarizing or rendering any file fails
    pub fn render_root_filtered<F>(&self, filter: &F) -> ExportResult<ExportDocument>
    where
        F: FilenameFilter + ?Sized,
    {
        let files = self.filtered_files(filter);
        self.render_root(&files)
    }

    /// Render the document for an explicit list of files
    ///
    /// # Errors
    ///
    /// Returns error if a file is listed twice, or if summarizing or
    /// rendering any file fails
    pub fn render_root(&self, files: &[String]) -> ExportResult<ExportDocument> {
        tracing::debug!(files = files.len(), "exporting coverage");
        reject_duplicates(files)?;

        let reports = self
            .summarizer
            .prepare_file_reports(self.mapping, files, &self.options)?;
        let mut rendered = render_files(self.mapping, files, &reports.files, &self.options)?;

        rendered.sort_by(|a, b| a.filename.cmp(&b.filename));

        let functions = self
            .options
            .renders_functions()
            .then(|| render_functions(self.mapping.covered_functions()));

        tracing::info!(
            files = rendered.len(),
            functions = functions.as_ref().map_or(0, Vec::len),
            "coverage export rendered"
        );

        Ok(ExportDocument::new(CoverageExport {
            files: rendered,
            functions,
            totals: render_summary(&reports.totals),
        }))
    }

    /// Render and write the document for every unfiltered source file
    ///
    /// Nothing is written if rendering fails.
    ///
    /// # Errors
    ///
    /// Returns error if rendering or writing fails
    pub fn export_filtered<F, W>(&self, filter: &F, writer: W) -> ExportResult<()>
    where
        F: FilenameFilter + ?Sized,
        W: Write,
    {
        self.render_root_filtered(filter)?.write_to(writer, false)
    }

    /// Render and write the document for an explicit list of files
    ///
    /// Nothing is written if rendering fails.
    ///
    /// # Errors
    ///
    /// Returns error if rendering or writing fails
    pub fn export_files<W: Write>(&self, files: &[String], writer: W) -> ExportResult<()> {
        self.render_root(files)?.write_to(writer, false)
    }
}

/// Each exported file must appear once
fn reject_duplicates(files: &[String]) -> ExportResult<()> {
    let mut seen = HashSet::with_capacity(files.len());
    match files.iter().find(|name| !seen.insert(name.as_str())) {
        Some(name) => Err(ExportError::DuplicateFile {
            filename: name.clone(),
        }),
        None => Ok(()),
    }
}
