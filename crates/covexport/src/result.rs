//! Result and error types for coverage export.

use thiserror::Error;

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting coverage
#[derive(Debug, Error)]
pub enum ExportError {
    /// The mapping provider has no coverage data for a listed file
    #[error("No coverage data for {filename}")]
    MissingCoverage {
        /// File that was requested
        filename: String,
    },

    /// A file was listed more than once for export
    #[error("Duplicate file in export: {filename}")]
    DuplicateFile {
        /// File that was listed again
        filename: String,
    },

    /// The summarizer returned a different number of summaries than files
    #[error("Summary mismatch: {files} files but {summaries} summaries")]
    SummaryMismatch {
        /// Number of files requested
        files: usize,
        /// Number of summaries returned
        summaries: usize,
    },

    /// An ignore-filename pattern failed to compile
    #[error("Invalid filename filter '{pattern}': {message}")]
    InvalidFilter {
        /// Offending pattern
        pattern: String,
        /// Error message
        message: String,
    },

    /// A mapping snapshot is malformed
    #[error("Invalid coverage snapshot: {message}")]
    InvalidSnapshot {
        /// Error message
        message: String,
    },

    /// Export options could not be parsed
    #[error("Invalid export options: {message}")]
    InvalidOptions {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Create a missing coverage error
    #[must_use]
    pub fn missing_coverage(filename: impl Into<String>) -> Self {
        Self::MissingCoverage {
            filename: filename.into(),
        }
    }

    /// Create an invalid snapshot error
    #[must_use]
    pub fn invalid_snapshot(message: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_coverage_display() {
        let err = ExportError::missing_coverage("src/lib.rs");
        assert_eq!(err.to_string(), "No coverage data for src/lib.rs");
    }

    #[test]
    fn test_duplicate_file_display() {
        let err = ExportError::DuplicateFile {
            filename: "a.c".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicate file in export: a.c");
    }

    #[test]
    fn test_summary_mismatch_display() {
        let err = ExportError::SummaryMismatch {
            files: 3,
            summaries: 2,
        };
        assert!(err.to_string().contains("3 files but 2 summaries"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: ExportError = io.into();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
