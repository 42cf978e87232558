//! The cleaning pipeline: dedup → fill → project, each step optional.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConvertResult;
use crate::format::TableFormat;
use crate::types::Table;

use super::dedup::deduplicate;
use super::fill::fill_missing;
use super::project::project_columns;

/// Per-file cleaning and export choices.
///
/// Use [`Default`] for "leave the table as loaded, export CSV". Missing JSON keys fall back to
/// the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    /// Drop rows that repeat an earlier row.
    pub remove_duplicates: bool,
    /// Text written into every missing cell.
    pub fill_missing: Option<String>,
    /// Columns to keep, in output order. Empty keeps every column.
    pub keep_columns: Vec<String>,
    /// Derive the numeric summary.
    pub show_summary: bool,
    /// Output format for export.
    pub export_format: TableFormat,
}

impl CleaningOptions {
    /// Parse options from the JSON the upload UI produces.
    ///
    /// ```rust
    /// use table_convert::format::TableFormat;
    /// use table_convert::processing::CleaningOptions;
    ///
    /// let opts = CleaningOptions::from_json(
    ///     r#"{"remove_duplicates": true, "fill_missing": "0", "export_format": "Excel"}"#,
    /// )
    /// .unwrap();
    /// assert!(opts.remove_duplicates);
    /// assert_eq!(opts.fill_missing.as_deref(), Some("0"));
    /// assert!(opts.keep_columns.is_empty());
    /// assert_eq!(opts.export_format, TableFormat::Xlsx);
    /// ```
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

/// A pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Deduplicate,
    FillMissing,
    ProjectColumns,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Deduplicate => "remove duplicates",
            Self::FillMissing => "fill missing values",
            Self::ProjectColumns => "select columns",
        })
    }
}

/// What one stage did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    /// Whether the stage produced a new table.
    pub applied: bool,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    /// Rows removed (dedup), cells filled (fill) or columns dropped (project).
    pub affected: usize,
}

impl StageReport {
    fn skipped(stage: Stage, table: &Table) -> Self {
        Self {
            stage,
            applied: false,
            rows_before: table.row_count(),
            rows_after: table.row_count(),
            columns_before: table.column_count(),
            columns_after: table.column_count(),
            affected: 0,
        }
    }
}

/// Result of [`run_pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// The cleaned table.
    pub table: Table,
    /// One report per stage, in execution order.
    pub stages: Vec<StageReport>,
}

impl PipelineOutput {
    /// Whether `stage` produced a new table.
    pub fn applied(&self, stage: Stage) -> bool {
        self.stages.iter().any(|s| s.stage == stage && s.applied)
    }
}

/// Run the enabled cleaning steps over `table` in fixed order.
///
/// The input table is never modified. On error nothing is returned, so a failed projection
/// leaves no partially cleaned table behind.
pub fn run_pipeline(table: &Table, options: &CleaningOptions) -> ConvertResult<PipelineOutput> {
    run_pipeline_inspect(table, options, |_, _| {})
}

/// Like [`run_pipeline`], calling `inspect` with each stage's report and the table after it.
pub fn run_pipeline_inspect<F>(
    table: &Table,
    options: &CleaningOptions,
    mut inspect: F,
) -> ConvertResult<PipelineOutput>
where
    F: FnMut(&StageReport, &Table),
{
    let mut current = table.clone();
    let mut stages = Vec::with_capacity(3);

    let next = options.remove_duplicates.then(|| deduplicate(&current));
    stages.push(advance(
        &mut current,
        Stage::Deduplicate,
        next,
        |before, after| before.row_count() - after.row_count(),
        &mut inspect,
    ));

    // Fill runs before projection so every original column is filled.
    let next = options
        .fill_missing
        .as_deref()
        .map(|value| fill_missing(&current, value));
    stages.push(advance(
        &mut current,
        Stage::FillMissing,
        next,
        |before, _| before.null_count(),
        &mut inspect,
    ));

    let next = if options.keep_columns.is_empty() {
        None
    } else {
        let out = project_columns(&current, &options.keep_columns)?;
        (out.schema != current.schema).then_some(out)
    };
    stages.push(advance(
        &mut current,
        Stage::ProjectColumns,
        next,
        |before, after| before.column_count() - after.column_count(),
        &mut inspect,
    ));

    Ok(PipelineOutput {
        table: current,
        stages,
    })
}

fn advance<A, F>(
    current: &mut Table,
    stage: Stage,
    next: Option<Table>,
    affected: A,
    inspect: &mut F,
) -> StageReport
where
    A: Fn(&Table, &Table) -> usize,
    F: FnMut(&StageReport, &Table),
{
    let report = match next {
        Some(out) => {
            let report = StageReport {
                stage,
                applied: true,
                rows_before: current.row_count(),
                rows_after: out.row_count(),
                columns_before: current.column_count(),
                columns_after: out.column_count(),
                affected: affected(current, &out),
            };
            *current = out;
            report
        }
        None => StageReport::skipped(stage, current),
    };
    inspect(&report, current);
    report
}
