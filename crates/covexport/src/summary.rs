//! Coverage Summary Statistics
//!
//! Per-file and aggregate counters for lines, functions, instantiations
//! and regions. Percentages are 0.0 when nothing was counted.

use crate::mapping::{FunctionRecord, RegionKind};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Label of the aggregate summary
pub const TOTALS_LABEL: &str = "Totals";

fn percent(covered: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (covered as f64 / total as f64) * 100.0
}

/// Line coverage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCoverageInfo {
    /// Lines executed at least once
    pub covered: u64,
    /// Lines with a mapped counter
    pub num_lines: u64,
}

impl LineCoverageInfo {
    /// Create line counters
    #[must_use]
    pub const fn new(covered: u64, num_lines: u64) -> Self {
        Self { covered, num_lines }
    }

    /// Percentage of lines covered
    #[must_use]
    pub fn percent_covered(&self) -> f64 {
        percent(self.covered, self.num_lines)
    }
}

impl AddAssign for LineCoverageInfo {
    fn add_assign(&mut self, rhs: Self) {
        self.covered += rhs.covered;
        self.num_lines += rhs.num_lines;
    }
}

/// Function (or instantiation) coverage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCoverageInfo {
    /// Functions entered at least once
    pub executed: u64,
    /// Functions counted
    pub num_functions: u64,
}

impl FunctionCoverageInfo {
    /// Create function counters
    #[must_use]
    pub const fn new(executed: u64, num_functions: u64) -> Self {
        Self {
            executed,
            num_functions,
        }
    }

    /// Count one function
    pub fn add_function(&mut self, executed: bool) {
        if executed {
            self.executed += 1;
        }
        self.num_functions += 1;
    }

    /// Percentage of functions executed
    #[must_use]
    pub fn percent_covered(&self) -> f64 {
        percent(self.executed, self.num_functions)
    }
}

impl AddAssign for FunctionCoverageInfo {
    fn add_assign(&mut self, rhs: Self) {
        self.executed += rhs.executed;
        self.num_functions += rhs.num_functions;
    }
}

/// Region coverage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCoverageInfo {
    /// Regions executed at least once
    pub covered: u64,
    /// Code regions counted
    pub num_regions: u64,
}

impl RegionCoverageInfo {
    /// Create region counters
    #[must_use]
    pub const fn new(covered: u64, num_regions: u64) -> Self {
        Self {
            covered,
            num_regions,
        }
    }

    /// Regions never executed
    #[must_use]
    pub const fn not_covered(&self) -> u64 {
        self.num_regions.saturating_sub(self.covered)
    }

    /// Percentage of regions covered
    #[must_use]
    pub fn percent_covered(&self) -> f64 {
        percent(self.covered, self.num_regions)
    }

    /// Keep the larger of each counter
    pub fn merge(&mut self, other: &Self) {
        self.covered = self.covered.max(other.covered);
        self.num_regions = self.num_regions.max(other.num_regions);
    }
}

impl AddAssign for RegionCoverageInfo {
    fn add_assign(&mut self, rhs: Self) {
        self.covered += rhs.covered;
        self.num_regions += rhs.num_regions;
    }
}

/// Coverage of a single function, or of a group of instantiations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionCoverageSummary {
    /// Function name
    pub name: String,
    /// Times the function was entered
    pub execution_count: u64,
    /// Region counters
    pub region_coverage: RegionCoverageInfo,
}

impl FunctionCoverageSummary {
    /// Summarize one instantiation; only code regions are counted
    #[must_use]
    pub fn from_function(function: &FunctionRecord) -> Self {
        let mut region_coverage = RegionCoverageInfo::default();
        for region in function.regions.iter().filter(|r| r.kind == RegionKind::Code) {
            region_coverage.num_regions += 1;
            if region.execution_count > 0 {
                region_coverage.covered += 1;
            }
        }
        Self {
            name: function.name.clone(),
            execution_count: function.execution_count,
            region_coverage,
        }
    }

    /// Combine the summaries of every instantiation of one function
    ///
    /// Counts are summed and each counter keeps its best instantiation.
    #[must_use]
    pub fn from_instantiations(name: &str, instantiations: &[Self]) -> Self {
        let mut summary = Self {
            name: name.to_string(),
            ..Default::default()
        };
        let mut iter = instantiations.iter();
        if let Some(first) = iter.next() {
            summary.execution_count = first.execution_count;
            summary.region_coverage = first.region_coverage;
        }
        for inst in iter {
            summary.execution_count = summary.execution_count.saturating_add(inst.execution_count);
            summary.region_coverage.merge(&inst.region_coverage);
        }
        summary
    }
}

/// Coverage summary of one file, or the aggregate of many
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileCoverageSummary {
    /// Filename, or [`TOTALS_LABEL`]
    pub name: String,
    /// Line counters
    pub line_coverage: LineCoverageInfo,
    /// Function counters (one per instantiation group)
    pub function_coverage: FunctionCoverageInfo,
    /// Instantiation counters
    pub instantiation_coverage: FunctionCoverageInfo,
    /// Region counters
    pub region_coverage: RegionCoverageInfo,
}

impl FileCoverageSummary {
    /// Create an empty summary
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create an empty aggregate summary
    #[must_use]
    pub fn totals() -> Self {
        Self::new(TOTALS_LABEL)
    }

    /// Count a function group
    pub fn add_function(&mut self, function: &FunctionCoverageSummary) {
        self.region_coverage += function.region_coverage;
        self.function_coverage
            .add_function(function.execution_count > 0);
    }

    /// Count one instantiation
    pub fn add_instantiation(&mut self, instantiation: &FunctionCoverageSummary) {
        self.instantiation_coverage
            .add_function(instantiation.execution_count > 0);
    }
}

impl AddAssign<&FileCoverageSummary> for FileCoverageSummary {
    fn add_assign(&mut self, rhs: &FileCoverageSummary) {
        self.line_coverage += rhs.line_coverage;
        self.function_coverage += rhs.function_coverage;
        self.instantiation_coverage += rhs.instantiation_coverage;
        self.region_coverage += rhs.region_coverage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_zero_count() {
        assert_eq!(LineCoverageInfo::default().percent_covered(), 0.0);
        assert_eq!(FunctionCoverageInfo::default().percent_covered(), 0.0);
        assert_eq!(RegionCoverageInfo::default().percent_covered(), 0.0);
    }

    #[test]
    fn test_percent_covered() {
        assert_eq!(LineCoverageInfo::new(3, 4).percent_covered(), 75.0);
        assert_eq!(RegionCoverageInfo::new(1, 2).percent_covered(), 50.0);
    }

    #[test]
    fn test_not_covered() {
        assert_eq!(RegionCoverageInfo::new(3, 10).not_covered(), 7);
        assert_eq!(RegionCoverageInfo::new(5, 3).not_covered(), 0);
    }

    #[test]
    fn test_add_function() {
        let mut info = FunctionCoverageInfo::default();
        info.add_function(true);
        info.add_function(false);
        assert_eq!(info, FunctionCoverageInfo::new(1, 2));
    }

    #[test]
    fn test_totals_accumulate() {
        let mut totals = FileCoverageSummary::totals();
        let mut file = FileCoverageSummary::new("a.c");
        file.line_coverage = LineCoverageInfo::new(2, 5);
        file.region_coverage = RegionCoverageInfo::new(1, 3);

        totals += &file;
        totals += &file;

        assert_eq!(totals.name, TOTALS_LABEL);
        assert_eq!(totals.line_coverage, LineCoverageInfo::new(4, 10));
        assert_eq!(totals.region_coverage, RegionCoverageInfo::new(2, 6));
    }

    #[test]
    fn test_function_counts_code_regions_only() {
        use crate::mapping::CountedRegion;

        let function = FunctionRecord::new("f", 2)
            .with_region(CountedRegion::code(1, 1, 9, 1, 2))
            .with_region(CountedRegion::code(3, 5, 4, 1, 0))
            .with_region(CountedRegion::code(5, 1, 5, 8, 0).with_kind(RegionKind::Gap))
            .with_region(CountedRegion::code(6, 1, 6, 8, 1).with_kind(RegionKind::Expansion));

        let summary = FunctionCoverageSummary::from_function(&function);
        assert_eq!(summary.execution_count, 2);
        assert_eq!(summary.region_coverage, RegionCoverageInfo::new(1, 2));
    }

    #[test]
    fn test_group_keeps_best_instantiation() {
        let a = FunctionCoverageSummary {
            name: "f".into(),
            execution_count: 0,
            region_coverage: RegionCoverageInfo::new(0, 4),
        };
        let b = FunctionCoverageSummary {
            name: "f".into(),
            execution_count: 3,
            region_coverage: RegionCoverageInfo::new(2, 4),
        };

        let group = FunctionCoverageSummary::from_instantiations("f", &[a, b]);
        assert_eq!(group.execution_count, 3);
        assert_eq!(group.region_coverage, RegionCoverageInfo::new(2, 4));
    }

    #[test]
    fn test_file_counts_function_and_instantiation() {
        let executed = FunctionCoverageSummary {
            name: "f".into(),
            execution_count: 1,
            region_coverage: RegionCoverageInfo::new(1, 1),
        };
        let mut file = FileCoverageSummary::new("a.c");
        file.add_instantiation(&executed);
        file.add_function(&executed);

        assert_eq!(file.function_coverage, FunctionCoverageInfo::new(1, 1));
        assert_eq!(file.instantiation_coverage, FunctionCoverageInfo::new(1, 1));
        assert_eq!(file.region_coverage, RegionCoverageInfo::new(1, 1));
    }
}
