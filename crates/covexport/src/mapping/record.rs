//! Coverage Mapping Records
//!
//! Immutable views of a computed coverage mapping: segments, counted
//! regions, function records and expansions. These are produced by a
//! [`CoverageMapping`](super::CoverageMapping) provider and only ever read
//! by the exporter.

use serde::{Deserialize, Serialize};

/// Region category, serialized as its integer tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RegionKind {
    /// Ordinary code region with a counter
    #[default]
    Code,
    /// Region that expands into another file (macro, include)
    Expansion,
    /// Region skipped by the preprocessor
    Skipped,
    /// Whitespace between code regions
    Gap,
    /// Branch condition region
    Branch,
}

impl RegionKind {
    /// Integer tag used in the export schema
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Code => 0,
            Self::Expansion => 1,
            Self::Skipped => 2,
            Self::Gap => 3,
            Self::Branch => 4,
        }
    }
}

impl From<RegionKind> for i64 {
    fn from(kind: RegionKind) -> Self {
        kind.as_i64()
    }
}

impl TryFrom<i64> for RegionKind {
    type Error = String;

    fn try_from(tag: i64) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Code),
            1 => Ok(Self::Expansion),
            2 => Ok(Self::Skipped),
            3 => Ok(Self::Gap),
            4 => Ok(Self::Branch),
            other => Err(format!("unknown region kind {other}")),
        }
    }
}

/// Point in a file where the coverage counter state changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub col: u32,
    /// Execution count at this point
    pub count: u64,
    /// Whether `count` is meaningful
    pub has_count: bool,
    /// Whether this segment starts a region
    pub is_region_entry: bool,
    /// Whether this segment starts a gap region (summaries only)
    #[serde(default)]
    pub is_gap_region: bool,
}

impl Segment {
    /// Create a segment carrying a count
    #[must_use]
    pub const fn new(line: u32, col: u32, count: u64, is_region_entry: bool) -> Self {
        Self {
            line,
            col,
            count,
            has_count: true,
            is_region_entry,
            is_gap_region: false,
        }
    }

    /// Create a segment without a count (end of region, skipped code)
    #[must_use]
    pub const fn uncounted(line: u32, col: u32, is_region_entry: bool) -> Self {
        Self {
            line,
            col,
            count: 0,
            has_count: false,
            is_region_entry,
            is_gap_region: false,
        }
    }

    /// Mark this segment as the start of a gap region
    #[must_use]
    pub const fn gap(mut self) -> Self {
        self.is_gap_region = true;
        self
    }
}

/// Source range with an execution count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountedRegion {
    /// First line
    pub line_start: u32,
    /// First column
    pub column_start: u32,
    /// Last line
    pub line_end: u32,
    /// Last column
    pub column_end: u32,
    /// Times the region executed
    pub execution_count: u64,
    /// Index into the owning function's filenames
    #[serde(default)]
    pub file_id: u32,
    /// Index of the file this region expands into
    #[serde(default)]
    pub expanded_file_id: u32,
    /// Region category
    #[serde(default)]
    pub kind: RegionKind,
}

impl CountedRegion {
    /// Create a code region in the function's main file
    #[must_use]
    pub const fn code(
        line_start: u32,
        column_start: u32,
        line_end: u32,
        column_end: u32,
        execution_count: u64,
    ) -> Self {
        Self {
            line_start,
            column_start,
            line_end,
            column_end,
            execution_count,
            file_id: 0,
            expanded_file_id: 0,
            kind: RegionKind::Code,
        }
    }

    /// Set the region kind
    #[must_use]
    pub const fn with_kind(mut self, kind: RegionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the file and expanded-file ids
    #[must_use]
    pub const fn with_file_ids(mut self, file_id: u32, expanded_file_id: u32) -> Self {
        self.file_id = file_id;
        self.expanded_file_id = expanded_file_id;
        self
    }

    /// Start position as `(line, column)`
    #[must_use]
    pub const fn start(&self) -> (u32, u32) {
        (self.line_start, self.column_start)
    }
}

/// Coverage record of one function instantiation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Mangled or display name
    pub name: String,
    /// Times the function was entered
    pub execution_count: u64,
    /// Counted regions, in mapping order
    #[serde(default)]
    pub regions: Vec<CountedRegion>,
    /// Files the function's regions refer to; the first is where it is defined
    pub filenames: Vec<String>,
}

impl FunctionRecord {
    /// Create a function record
    #[must_use]
    pub fn new(name: impl Into<String>, execution_count: u64) -> Self {
        Self {
            name: name.into(),
            execution_count,
            regions: Vec::new(),
            filenames: Vec::new(),
        }
    }

    /// Append a region
    #[must_use]
    pub fn with_region(mut self, region: CountedRegion) -> Self {
        self.regions.push(region);
        self
    }

    /// Append a filename
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filenames.push(filename.into());
        self
    }

    /// File the function is defined in
    #[must_use]
    pub fn defining_file(&self) -> Option<&str> {
        self.filenames.first().map(String::as_str)
    }

    /// Start of the function's first region in its defining file
    #[must_use]
    pub fn start(&self) -> Option<(u32, u32)> {
        self.regions
            .iter()
            .find(|r| r.file_id == 0)
            .map(CountedRegion::start)
    }
}

/// An expansion site paired with the function body it expands into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionRecord {
    /// Region at the expansion site
    pub region: CountedRegion,
    /// Expanded function record
    pub function: FunctionRecord,
}

/// Detailed coverage of a single file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageData {
    /// File the data belongs to
    pub filename: String,
    /// Segments in ascending source position
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Expansions found in the file
    #[serde(default)]
    pub expansions: Vec<ExpansionRecord>,
}

impl CoverageData {
    /// Create empty coverage data for a file
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }

    /// Append a segment
    #[must_use]
    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Append an expansion
    #[must_use]
    pub fn with_expansion(mut self, expansion: ExpansionRecord) -> Self {
        self.expansions.push(expansion);
        self
    }
}
