//! In-memory coverage mapping loaded from a JSON snapshot.

use super::{CoverageData, CoverageMapping, FunctionRecord};
use crate::result::{ExportError, ExportResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// On-disk snapshot layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct MappingSnapshot {
    #[serde(default)]
    files: Vec<CoverageData>,
    #[serde(default)]
    functions: Vec<FunctionRecord>,
}

/// Coverage mapping held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryMapping {
    files: BTreeMap<String, CoverageData>,
    functions: Vec<FunctionRecord>,
}

impl MemoryMapping {
    /// Create an empty mapping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add coverage data for a file
    ///
    /// # Errors
    ///
    /// Returns error if the file was already added
    pub fn add_file(&mut self, data: CoverageData) -> ExportResult<()> {
        if self.files.contains_key(&data.filename) {
            return Err(ExportError::invalid_snapshot(format!(
                "duplicate file {}",
                data.filename
            )));
        }
        let _ = self.files.insert(data.filename.clone(), data);
        Ok(())
    }

    /// Add a function record
    pub fn add_function(&mut self, function: FunctionRecord) {
        self.functions.push(function);
    }

    /// Add coverage data for a file, builder style
    ///
    /// # Errors
    ///
    /// Returns error if the file was already added
    pub fn with_file(mut self, data: CoverageData) -> ExportResult<Self> {
        self.add_file(data)?;
        Ok(self)
    }

    /// Add a function record, builder style
    #[must_use]
    pub fn with_function(mut self, function: FunctionRecord) -> Self {
        self.add_function(function);
        self
    }

    /// Parse a snapshot from a JSON string
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or lists a file twice
    pub fn from_json_str(json: &str) -> ExportResult<Self> {
        let snapshot: MappingSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Load a snapshot from a file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not a valid snapshot
    pub fn load(path: &Path) -> ExportResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    fn from_snapshot(snapshot: MappingSnapshot) -> ExportResult<Self> {
        let mut mapping = Self::new();
        for data in snapshot.files {
            mapping.add_file(data)?;
        }
        mapping.functions = snapshot.functions;
        Ok(mapping)
    }

    /// Number of files with coverage data
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl CoverageMapping for MemoryMapping {
    fn unique_source_files(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn coverage_for_file(&self, filename: &str) -> Option<CoverageData> {
        self.files.get(filename).cloned()
    }

    fn covered_functions(&self) -> &[FunctionRecord] {
        &self.functions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mapping::Segment;

    const SNAPSHOT: &str = r#"{
        "files": [
            {"filename": "src/b.c", "segments": [
                {"line": 1, "col": 1, "count": 4, "has_count": true, "is_region_entry": true}
            ]},
            {"filename": "src/a.c"}
        ],
        "functions": [
            {"name": "main", "execution_count": 1, "filenames": ["src/a.c"],
             "regions": [{"line_start": 1, "column_start": 1, "line_end": 3, "column_end": 2,
                          "execution_count": 1}]}
        ]
    }"#;

    #[test]
    fn test_parse_snapshot() {
        let mapping = MemoryMapping::from_json_str(SNAPSHOT).unwrap();
        assert_eq!(mapping.file_count(), 2);
        assert_eq!(mapping.covered_functions().len(), 1);
    }

    #[test]
    fn test_unique_source_files_sorted() {
        let mapping = MemoryMapping::from_json_str(SNAPSHOT).unwrap();
        assert_eq!(mapping.unique_source_files(), vec!["src/a.c", "src/b.c"]);
    }

    #[test]
    fn test_coverage_for_file() {
        let mapping = MemoryMapping::from_json_str(SNAPSHOT).unwrap();
        let data = mapping.coverage_for_file("src/b.c").unwrap();
        assert_eq!(data.segments, vec![Segment::new(1, 1, 4, true)]);
        assert!(mapping.coverage_for_file("src/missing.c").is_none());
    }

    #[test]
    fn test_duplicate_file_rejected() {
        let json = r#"{"files": [{"filename": "x.c"}, {"filename": "x.c"}]}"#;
        let err = MemoryMapping::from_json_str(json).unwrap_err();
        assert!(matches!(err, ExportError::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = MemoryMapping::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ExportError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let mapping = MemoryMapping::load(&path).unwrap();
        assert_eq!(mapping.file_count(), 2);
    }
}
