//! Coverage Report Preparation
//!
//! Computes the per-file summaries and the aggregate total for a list of
//! files. The exporter consumes this through the [`Summarizer`] trait and
//! never recomputes statistics itself.
//!
//! Semantics follow llvm-cov's report:
//! - instantiations of a function are grouped by start location, and a group
//!   counts as one executed function if any instantiation ran
//! - only code regions are counted
//! - line coverage is derived from the file's segments

use crate::export::effective_threads;
use crate::mapping::{CoverageMapping, FunctionRecord, Segment};
use crate::options::ExportOptions;
use crate::pool::WorkerPool;
use crate::result::{ExportError, ExportResult};
use crate::summary::{FileCoverageSummary, FunctionCoverageSummary, LineCoverageInfo};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

/// Per-file summaries, in request order, plus their total
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileReports {
    /// One summary per requested file
    pub files: Vec<FileCoverageSummary>,
    /// Aggregate of `files`
    pub totals: FileCoverageSummary,
}

/// Source of precomputed coverage summaries
pub trait Summarizer {
    /// Summarize `files`, returning one summary per file in the same order
    ///
    /// # Errors
    ///
    /// Returns error if a file cannot be summarized
    fn prepare_file_reports<M>(
        &self,
        mapping: &M,
        files: &[String],
        options: &ExportOptions,
    ) -> ExportResult<FileReports>
    where
        M: CoverageMapping + ?Sized;
}

/// Summarizer following llvm-cov report semantics
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageReport;

impl CoverageReport {
    /// Create a summarizer
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Summarize a single file given the functions defined in it
    ///
    /// # Errors
    ///
    /// Returns error if the mapping has no data for `filename`
    pub fn prepare_single_file_report<M>(
        mapping: &M,
        filename: &str,
        functions: &[&FunctionRecord],
    ) -> ExportResult<FileCoverageSummary>
    where
        M: CoverageMapping + ?Sized,
    {
        let data = mapping
            .coverage_for_file(filename)
            .ok_or_else(|| ExportError::missing_coverage(filename))?;

        let mut report = FileCoverageSummary::new(filename);
        report.line_coverage = line_coverage(&data.segments);

        for group in instantiation_groups(functions).values() {
            let instantiations: Vec<FunctionCoverageSummary> = group
                .iter()
                .map(|f| FunctionCoverageSummary::from_function(f))
                .collect();
            for inst in &instantiations {
                report.add_instantiation(inst);
            }
            let name = group.first().map_or("", |f| f.name.as_str());
            report.add_function(&FunctionCoverageSummary::from_instantiations(
                name,
                &instantiations,
            ));
        }

        Ok(report)
    }
}

impl Summarizer for CoverageReport {
    fn prepare_file_reports<M>(
        &self,
        mapping: &M,
        files: &[String],
        options: &ExportOptions,
    ) -> ExportResult<FileReports>
    where
        M: CoverageMapping + ?Sized,
    {
        let by_file = functions_by_file(mapping.covered_functions());
        let threads = effective_threads(options.num_threads, files.len());
        let results = Mutex::new(Vec::with_capacity(files.len()));

        WorkerPool::new(threads).run(|queue| {
            for (index, filename) in files.iter().enumerate() {
                let (results, by_file) = (&results, &by_file);
                queue.submit(move || {
                    let functions: &[&FunctionRecord] =
                        by_file.get(filename.as_str()).map_or(&[][..], Vec::as_slice);
                    let report = Self::prepare_single_file_report(mapping, filename, functions);
                    results
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((index, report));
                });
            }
        });

        let mut results = results.into_inner().unwrap_or_else(PoisonError::into_inner);
        results.sort_unstable_by_key(|(index, _)| *index);

        let mut reports = FileReports {
            files: Vec::with_capacity(results.len()),
            totals: FileCoverageSummary::totals(),
        };
        for (_, report) in results {
            let report = report?;
            reports.totals += &report;
            reports.files.push(report);
        }
        Ok(reports)
    }
}

/// Functions keyed by the file they are defined in
fn functions_by_file(functions: &[FunctionRecord]) -> HashMap<&str, Vec<&FunctionRecord>> {
    let mut by_file: HashMap<&str, Vec<&FunctionRecord>> = HashMap::new();
    for function in functions {
        if let Some(file) = function.defining_file() {
            by_file.entry(file).or_default().push(function);
        }
    }
    by_file
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey<'a> {
    Location(u32, u32),
    Unmapped(&'a str),
}

/// Instantiations of the same function, keyed by start location
fn instantiation_groups<'a>(
    functions: &[&'a FunctionRecord],
) -> BTreeMap<GroupKey<'a>, Vec<&'a FunctionRecord>> {
    let mut groups: BTreeMap<GroupKey<'a>, Vec<&'a FunctionRecord>> = BTreeMap::new();
    for &function in functions {
        let key = match function.start() {
            Some((line, col)) => GroupKey::Location(line, col),
            None => GroupKey::Unmapped(&function.name),
        };
        groups.entry(key).or_default().push(function);
    }
    groups
}

/// Coverage state of one source line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LineStats {
    execution_count: u64,
    mapped: bool,
}

impl LineStats {
    fn new(wrapped: Option<&Segment>, line_segments: &[Segment]) -> Self {
        let is_start_of_region = |s: &Segment| !s.is_gap_region && s.has_count && s.is_region_entry;

        let region_starts = line_segments.iter().filter(|s| is_start_of_region(s)).count();
        let starts_skipped = line_segments
            .first()
            .is_some_and(|s| !s.has_count && s.is_region_entry);

        let mapped = !starts_skipped
            && (wrapped.is_some_and(|s| s.has_count) || region_starts > 0);
        if !mapped {
            return Self::default();
        }

        let wrapped_count = wrapped.map_or(0, |s| s.count);
        let execution_count = line_segments
            .iter()
            .filter(|s| is_start_of_region(s))
            .map(|s| s.count)
            .fold(wrapped_count, u64::max);

        Self {
            execution_count,
            mapped,
        }
    }
}

/// Line coverage of a file's segments
///
/// Segments must be in ascending source position. Every line from the
/// first segment's to the last segment's is considered.
#[must_use]
pub fn line_coverage(segments: &[Segment]) -> LineCoverageInfo {
    let mut info = LineCoverageInfo::default();
    let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
        return info;
    };

    let mut wrapped: Option<&Segment> = None;
    let mut next = 0;
    for line in first.line..=last.line {
        let start = next;
        while next < segments.len() && segments[next].line == line {
            next += 1;
        }
        let line_segments = &segments[start..next];

        let stats = LineStats::new(wrapped, line_segments);
        if stats.mapped {
            info.num_lines += 1;
            if stats.execution_count > 0 {
                info.covered += 1;
            }
        }

        if let Some(segment) = line_segments.last() {
            wrapped = Some(segment);
        }
    }
    info
}
