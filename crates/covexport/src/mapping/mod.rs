//! Coverage Mapping Provider
//!
//! The exporter never computes coverage itself. It queries a provider
//! implementing [`CoverageMapping`] for the list of source files, the
//! detailed coverage of each file, and the covered function records.

mod memory;
mod record;

pub use memory::MemoryMapping;
pub use record::{
    CountedRegion, CoverageData, ExpansionRecord, FunctionRecord, RegionKind, Segment,
};

/// Query interface over a computed coverage mapping
///
/// Implementations are shared by reference across render workers, so they
/// must be `Sync` and must not rely on interior mutation.
pub trait CoverageMapping: Sync {
    /// Every source file with coverage data, without duplicates
    fn unique_source_files(&self) -> Vec<String>;

    /// Detailed coverage for one file
    ///
    /// Segments must be returned in ascending source position. The exporter
    /// preserves the provider's order and never re-sorts them.
    /// Returns `None` when the file has no coverage data.
    fn coverage_for_file(&self, filename: &str) -> Option<CoverageData>;

    /// Every function record in the mapping
    fn covered_functions(&self) -> &[FunctionRecord];
}
