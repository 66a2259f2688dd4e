//! Export Options
//!
//! Switches that control how much detail the exporter renders and how
//! many worker threads it uses.

use crate::result::{ExportError, ExportResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Export configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Export only summaries: no segments, expansions or functions
    pub export_summary_only: bool,
    /// Omit per-file expansion records
    pub skip_expansions: bool,
    /// Omit the top-level function table
    pub skip_functions: bool,
    /// Worker threads (0 = derive from hardware and file count)
    pub num_threads: usize,
}

impl ExportOptions {
    /// Create a builder for export options
    #[must_use]
    pub fn builder() -> ExportOptionsBuilder {
        ExportOptionsBuilder::default()
    }

    /// Whether per-file segments are rendered
    #[must_use]
    pub const fn renders_segments(&self) -> bool {
        !self.export_summary_only
    }

    /// Whether per-file expansions are rendered
    #[must_use]
    pub const fn renders_expansions(&self) -> bool {
        !self.export_summary_only && !self.skip_expansions
    }

    /// Whether the top-level function table is rendered
    #[must_use]
    pub const fn renders_functions(&self) -> bool {
        !self.export_summary_only && !self.skip_functions
    }

    /// Parse options from YAML
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is malformed
    pub fn from_yaml_str(yaml: &str) -> ExportResult<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| ExportError::InvalidOptions {
            message: e.to_string(),
        })
    }

    /// Load options from a YAML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> ExportResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

/// Builder for export options
#[derive(Debug, Default)]
pub struct ExportOptionsBuilder {
    options: ExportOptions,
}

impl ExportOptionsBuilder {
    /// Export only summaries
    #[must_use]
    pub fn summary_only(mut self, enabled: bool) -> Self {
        self.options.export_summary_only = enabled;
        self
    }

    /// Skip expansion records
    #[must_use]
    pub fn skip_expansions(mut self, enabled: bool) -> Self {
        self.options.skip_expansions = enabled;
        self
    }

    /// Skip the function table
    #[must_use]
    pub fn skip_functions(mut self, enabled: bool) -> Self {
        self.options.skip_functions = enabled;
        self
    }

    /// Set the worker thread count
    #[must_use]
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.options.num_threads = threads;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> ExportOptions {
        self.options
    }
}
