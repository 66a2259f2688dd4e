//! Filename Filters
//!
//! Ignore rules applied to the mapping's source files before export.
//! A file is dropped when any rule matches its name.

use crate::result::{ExportError, ExportResult};
use regex::Regex;

/// Predicate deciding whether a filename is ignored
pub trait FilenameFilter {
    /// Whether `filename` matches an ignore rule
    fn matches_filename(&self, filename: &str) -> bool;
}

impl<F> FilenameFilter for F
where
    F: Fn(&str) -> bool,
{
    fn matches_filename(&self, filename: &str) -> bool {
        self(filename)
    }
}

/// Set of ignore-filename regular expressions
#[derive(Debug, Clone, Default)]
pub struct CoverageFilters {
    patterns: Vec<Regex>,
}

impl CoverageFilters {
    /// Create a filter set that ignores nothing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter set from regex patterns
    ///
    /// # Errors
    ///
    /// Returns error if any pattern is not a valid regex
    pub fn from_patterns<I, S>(patterns: I) -> ExportResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filters = Self::new();
        for pattern in patterns {
            filters.push_pattern(pattern.as_ref())?;
        }
        Ok(filters)
    }

    /// Add an ignore pattern
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is not a valid regex
    pub fn push_pattern(&mut self, pattern: &str) -> ExportResult<()> {
        let regex = Regex::new(pattern).map_err(|e| ExportError::InvalidFilter {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        self.patterns.push(regex);
        Ok(())
    }

    /// Number of patterns
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the set has no patterns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl FilenameFilter for CoverageFilters {
    fn matches_filename(&self, filename: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(filename))
    }
}
