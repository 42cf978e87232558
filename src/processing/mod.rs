//! In-memory table transformations.
//!
//! The processing layer operates on [`crate::types::Table`] values produced by loading. Every
//! operation takes a table by reference and returns a new one.
//!
//! - [`run_pipeline()`]: the cleaning pipeline, in fixed order:
//!   [`deduplicate()`] → [`fill_missing()`] → [`project_columns()`]
//! - [`summary::project()`]: numeric-only view for charts, with [`reduce()`]-based stats
//!
//! ## Example: dedup → fill → project
//!
//! ```rust
//! use table_convert::processing::{run_pipeline, summary, CleaningOptions, Stage};
//! use table_convert::types::{Table, Value};
//!
//! let table = Table::from_columns(vec![
//!     ("id", vec![Value::Int64(1), Value::Int64(2), Value::Int64(2)]),
//!     ("score", vec![Value::Float64(10.0), Value::Null, Value::Null]),
//!     ("name", vec!["a".into(), "b".into(), "b".into()]),
//! ])
//! .unwrap();
//!
//! let opts = CleaningOptions {
//!     remove_duplicates: true,
//!     fill_missing: Some("0".to_string()),
//!     keep_columns: vec!["name".to_string(), "score".to_string()],
//!     ..Default::default()
//! };
//! let out = run_pipeline(&table, &opts).unwrap();
//!
//! assert_eq!(out.table.row_count(), 2);
//! assert_eq!(out.table.column_names(), vec!["name", "score"]);
//! assert_eq!(out.table.rows[1][1], Value::Utf8("0".to_string()));
//! assert!(out.applied(Stage::Deduplicate));
//!
//! // The text fill made `score` non-numeric, so there is nothing to chart.
//! assert!(summary::project(&out.table).is_none());
//! ```

pub mod dedup;
pub mod fill;
pub mod pipeline;
pub mod project;
pub mod reduce;
pub mod summary;

pub use dedup::deduplicate;
pub use fill::fill_missing;
pub use pipeline::{run_pipeline, run_pipeline_inspect, CleaningOptions, PipelineOutput, Stage, StageReport};
pub use project::project_columns;
pub use reduce::{reduce, ReduceOp};
pub use summary::{ColumnStats, NumericTable};
