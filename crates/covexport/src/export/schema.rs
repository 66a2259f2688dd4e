//! JSON Schema Renderers
//!
//! Pure projections of coverage records into the fixed shapes of the
//! `llvm.coverage.json.export` schema. Segments and regions render as
//! positional arrays; everything else renders as objects whose keys are
//! declared in sorted order.

use crate::mapping::{CountedRegion, CoverageMapping, ExpansionRecord, FunctionRecord, Segment};
use crate::options::ExportOptions;
use crate::result::{ExportError, ExportResult};
use crate::summary::FileCoverageSummary;
use serde::{Deserialize, Serialize};

/// Counts are unsigned in the mapping but signed 64-bit on the wire.
fn json_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// `[line, col, count, hasCount, isRegionEntry]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSegment(pub u32, pub u32, pub i64, pub bool, pub bool);

/// `[lineStart, colStart, lineEnd, colEnd, executionCount, fileID, expandedFileID, kind]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRegion(
    pub u32,
    pub u32,
    pub u32,
    pub u32,
    pub i64,
    pub u32,
    pub u32,
    pub i64,
);

/// Expansion site and the regions it expands into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedExpansion {
    /// Files of the expanded function
    pub filenames: Vec<String>,
    /// Region at the expansion site
    pub source_region: RenderedRegion,
    /// Regions of the expanded function
    pub target_regions: Vec<RenderedRegion>,
}

/// `{count, covered, percent}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountSummary {
    /// Items counted
    pub count: i64,
    /// Items covered
    pub covered: i64,
    /// Covered percentage
    pub percent: f64,
}

/// `{count, covered, notcovered, percent}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    /// Regions counted
    pub count: i64,
    /// Regions covered
    pub covered: i64,
    /// Regions not covered
    pub notcovered: i64,
    /// Covered percentage
    pub percent: f64,
}

/// Rendered summary of a file or of the totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderedSummary {
    /// Function coverage
    pub functions: CountSummary,
    /// Instantiation coverage
    pub instantiations: CountSummary,
    /// Line coverage
    pub lines: CountSummary,
    /// Region coverage
    pub regions: RegionSummary,
}

/// Rendered entry of the function table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedFunction {
    /// Execution count
    pub count: i64,
    /// Files the function refers to
    pub filenames: Vec<String>,
    /// Function name
    pub name: String,
    /// Counted regions
    pub regions: Vec<RenderedRegion>,
}

/// Rendered coverage of one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileExport {
    /// Expansion records, unless suppressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansions: Option<Vec<RenderedExpansion>>,
    /// Source file
    pub filename: String,
    /// Segments in provider order, unless suppressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<RenderedSegment>>,
    /// Precomputed summary
    pub summary: RenderedSummary,
}

/// Render a segment as a 5-element array
#[must_use]
pub fn render_segment(segment: &Segment) -> RenderedSegment {
    RenderedSegment(
        segment.line,
        segment.col,
        json_int(segment.count),
        segment.has_count,
        segment.is_region_entry,
    )
}

/// Render a region as an 8-element array
#[must_use]
pub fn render_region(region: &CountedRegion) -> RenderedRegion {
    RenderedRegion(
        region.line_start,
        region.column_start,
        region.line_end,
        region.column_end,
        json_int(region.execution_count),
        region.file_id,
        region.expanded_file_id,
        region.kind.as_i64(),
    )
}

/// Render regions, preserving order
#[must_use]
pub fn render_regions(regions: &[CountedRegion]) -> Vec<RenderedRegion> {
    regions.iter().map(render_region).collect()
}

/// Render an expansion record
#[must_use]
pub fn render_expansion(expansion: &ExpansionRecord) -> RenderedExpansion {
    RenderedExpansion {
        filenames: expansion.function.filenames.clone(),
        source_region: render_region(&expansion.region),
        target_regions: render_regions(&expansion.function.regions),
    }
}

/// Render a coverage summary
#[must_use]
pub fn render_summary(summary: &FileCoverageSummary) -> RenderedSummary {
    let lines = &summary.line_coverage;
    let functions = &summary.function_coverage;
    let instantiations = &summary.instantiation_coverage;
    let regions = &summary.region_coverage;

    RenderedSummary {
        functions: CountSummary {
            count: json_int(functions.num_functions),
            covered: json_int(functions.executed),
            percent: functions.percent_covered(),
        },
        instantiations: CountSummary {
            count: json_int(instantiations.num_functions),
            covered: json_int(instantiations.executed),
            percent: instantiations.percent_covered(),
        },
        lines: CountSummary {
            count: json_int(lines.num_lines),
            covered: json_int(lines.covered),
            percent: lines.percent_covered(),
        },
        regions: RegionSummary {
            count: json_int(regions.num_regions),
            covered: json_int(regions.covered),
            notcovered: json_int(regions.not_covered()),
            percent: regions.percent_covered(),
        },
    }
}

/// Render the function table
#[must_use]
pub fn render_functions(functions: &[FunctionRecord]) -> Vec<RenderedFunction> {
    functions
        .iter()
        .map(|f| RenderedFunction {
            count: json_int(f.execution_count),
            filenames: f.filenames.clone(),
            name: f.name.clone(),
            regions: render_regions(&f.regions),
        })
        .collect()
}

/// Render one file's coverage
///
/// Detailed coverage is only queried when segments are requested. The
/// summary is used as given.
///
/// # Errors
///
/// Returns error if the mapping has no data for `filename`
pub fn render_file<M>(
    mapping: &M,
    filename: &str,
    summary: &FileCoverageSummary,
    options: &ExportOptions,
) -> ExportResult<FileExport>
where
    M: CoverageMapping + ?Sized,
{
    let mut file = FileExport {
        expansions: None,
        filename: filename.to_string(),
        segments: None,
        summary: render_summary(summary),
    };

    if options.renders_segments() {
        let coverage = mapping
            .coverage_for_file(filename)
            .ok_or_else(|| ExportError::missing_coverage(filename))?;
        file.segments = Some(coverage.segments.iter().map(render_segment).collect());
        if options.renders_expansions() {
            file.expansions = Some(coverage.expansions.iter().map(render_expansion).collect());
        }
    }

    Ok(file)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mapping::{CoverageData, MemoryMapping, RegionKind};
    use crate::summary::{FunctionCoverageInfo, LineCoverageInfo, RegionCoverageInfo};
    use serde_json::json;

    fn summary() -> FileCoverageSummary {
        FileCoverageSummary {
            name: "a.c".into(),
            line_coverage: LineCoverageInfo::new(3, 4),
            function_coverage: FunctionCoverageInfo::new(1, 2),
            instantiation_coverage: FunctionCoverageInfo::new(1, 3),
            region_coverage: RegionCoverageInfo::new(2, 8),
        }
    }

    fn mapping() -> MemoryMapping {
        let expanded = FunctionRecord::new("MACRO", 4)
            .with_filename("a.c")
            .with_filename("macros.h")
            .with_region(CountedRegion::code(1, 1, 1, 20, 4).with_file_ids(1, 0));
        MemoryMapping::new()
            .with_file(
                CoverageData::new("a.c")
                    .with_segment(Segment::new(10, 1, 5, true))
                    .with_segment(Segment::uncounted(12, 2, false))
                    .with_expansion(ExpansionRecord {
                        region: CountedRegion::code(11, 3, 11, 9, 4)
                            .with_kind(RegionKind::Expansion)
                            .with_file_ids(0, 1),
                        function: expanded,
                    }),
            )
            .unwrap()
    }

    // =========================================================================
    // Record Shapes
    // =========================================================================

    #[test]
    fn test_render_segment_shape() {
        let rendered = render_segment(&Segment::new(10, 1, 5, true));
        assert_eq!(serde_json::to_value(rendered).unwrap(), json!([10, 1, 5, true, true]));
    }

    #[test]
    fn test_render_uncounted_segment() {
        let rendered = render_segment(&Segment::uncounted(7, 3, false));
        assert_eq!(serde_json::to_value(rendered).unwrap(), json!([7, 3, 0, false, false]));
    }

    #[test]
    fn test_render_region_shape() {
        let region = CountedRegion::code(1, 2, 3, 4, 5)
            .with_file_ids(6, 7)
            .with_kind(RegionKind::Skipped);
        assert_eq!(
            serde_json::to_value(render_region(&region)).unwrap(),
            json!([1, 2, 3, 4, 5, 6, 7, 2])
        );
    }

    #[test]
    fn test_counts_saturate() {
        let rendered = render_segment(&Segment::new(1, 1, u64::MAX, true));
        assert_eq!(rendered.2, i64::MAX);
    }

    #[test]
    fn test_render_expansion() {
        let data = mapping().coverage_for_file("a.c").unwrap();
        let value = serde_json::to_value(render_expansion(&data.expansions[0])).unwrap();
        assert_eq!(
            value,
            json!({
                "filenames": ["a.c", "macros.h"],
                "source_region": [11, 3, 11, 9, 4, 0, 1, 1],
                "target_regions": [[1, 1, 1, 20, 4, 1, 0, 0]]
            })
        );
    }

    #[test]
    fn test_render_summary_shape() {
        let value = serde_json::to_value(render_summary(&summary())).unwrap();
        assert_eq!(value["lines"], json!({"count": 4, "covered": 3, "percent": 75.0}));
        assert_eq!(value["functions"]["count"], 2);
        assert_eq!(value["functions"]["percent"], 50.0);
        assert_eq!(value["instantiations"]["count"], 3);
        assert_eq!(
            value["regions"],
            json!({"count": 8, "covered": 2, "notcovered": 6, "percent": 25.0})
        );
    }

    #[test]
    fn test_render_empty_summary_percent_is_zero() {
        let rendered = render_summary(&FileCoverageSummary::totals());
        assert_eq!(rendered.lines.percent, 0.0);
        assert_eq!(rendered.regions.notcovered, 0);
    }

    #[test]
    fn test_render_functions() {
        let functions = vec![FunctionRecord::new("main", 1)
            .with_filename("a.c")
            .with_region(CountedRegion::code(1, 12, 4, 2, 1))];
        let value = serde_json::to_value(render_functions(&functions)).unwrap();
        assert_eq!(
            value,
            json!([{
                "count": 1,
                "filenames": ["a.c"],
                "name": "main",
                "regions": [[1, 12, 4, 2, 1, 0, 0, 0]]
            }])
        );
    }

    // =========================================================================
    // Per-File Rendering
    // =========================================================================

    #[test]
    fn test_render_file_full() {
        let file = render_file(&mapping(), "a.c", &summary(), &ExportOptions::default()).unwrap();
        assert_eq!(file.filename, "a.c");
        let segments = file.segments.unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], RenderedSegment(10, 1, 5, true, true));
        assert_eq!(file.expansions.unwrap().len(), 1);
    }

    #[test]
    fn test_render_file_summary_only() {
        let options = ExportOptions::builder().summary_only(true).build();
        let file = render_file(&mapping(), "a.c", &summary(), &options).unwrap();
        assert!(file.segments.is_none());
        assert!(file.expansions.is_none());

        let value = serde_json::to_value(&file).unwrap();
        assert!(value.get("segments").is_none());
        assert!(value.get("expansions").is_none());
        assert!(value.get("summary").is_some());
    }

    #[test]
    fn test_render_file_skip_expansions() {
        let options = ExportOptions::builder().skip_expansions(true).build();
        let file = render_file(&mapping(), "a.c", &summary(), &options).unwrap();
        assert!(file.segments.is_some());
        assert!(file.expansions.is_none());
    }

    #[test]
    fn test_render_file_uses_given_summary() {
        let file = render_file(&mapping(), "a.c", &summary(), &ExportOptions::default()).unwrap();
        assert_eq!(file.summary, render_summary(&summary()));
    }

    #[test]
    fn test_render_file_missing_coverage() {
        let err = render_file(&mapping(), "b.c", &summary(), &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, ExportError::MissingCoverage { .. }));
    }

    #[test]
    fn test_summary_only_does_not_query_mapping() {
        let options = ExportOptions::builder().summary_only(true).build();
        assert!(render_file(&mapping(), "b.c", &summary(), &options).is_ok());
    }
}
