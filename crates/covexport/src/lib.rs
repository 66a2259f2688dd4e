//! Covexport: Concurrent JSON Coverage Exporter
//!
//! Renders a computed code-coverage mapping into the versioned
//! `llvm.coverage.json.export` document consumed by dashboards, diff tools
//! and CI gates.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Mapping → Filter → Summarizer → Parallel Render → Sort → JSON  │
//! │                                       ↓                         │
//! │                         WorkerPool + Mutex<Vec<FileExport>>     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use covexport::{CoverageData, CoverageFilters, ExportOptions, JsonExporter, MemoryMapping, Segment};
//!
//! let mapping = MemoryMapping::new()
//!     .with_file(CoverageData::new("main.c").with_segment(Segment::new(10, 1, 5, true)))?;
//! let document = JsonExporter::new(&mapping, ExportOptions::default())
//!     .render_root_filtered(&CoverageFilters::new())?;
//!
//! assert_eq!(document.version, "2.0.0");
//! assert_eq!(document.data[0].files[0].filename, "main.c");
//! # Ok::<(), covexport::ExportError>(())
//! ```

#![warn(missing_docs)]

pub mod export;
pub mod filters;
pub mod mapping;
mod options;
pub mod pool;
pub mod report;
mod result;
pub mod summary;

pub use export::{
    CoverageExport, ExportDocument, FileExport, JsonExporter, EXPORT_TYPE, EXPORT_VERSION,
};
pub use filters::{CoverageFilters, FilenameFilter};
pub use mapping::{
    CountedRegion, CoverageData, CoverageMapping, ExpansionRecord, FunctionRecord, MemoryMapping,
    RegionKind, Segment,
};
pub use options::{ExportOptions, ExportOptionsBuilder};
pub use pool::WorkerPool;
pub use report::{CoverageReport, FileReports, Summarizer};
pub use result::{ExportError, ExportResult};
pub use summary::{
    FileCoverageSummary, FunctionCoverageInfo, FunctionCoverageSummary, LineCoverageInfo,
    RegionCoverageInfo, TOTALS_LABEL,
};
