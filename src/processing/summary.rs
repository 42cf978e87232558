//! Numeric-only projection used for charts and summary statistics.

use crate::types::{Table, Value};

use super::project::select_indices;
use super::reduce::{reduce, ReduceOp};

/// A view of a table restricted to its numeric (`Int64`/`Float64`) columns.
///
/// Row order and row count match the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable {
    table: Table,
}

/// Per-column summary of a [`NumericTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    /// Non-missing cells.
    pub count: usize,
    pub sum: Value,
    pub min: Value,
    pub max: Value,
    pub mean: Value,
}

impl NumericTable {
    /// The projected table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    /// Column values as floats (missing cells as `None`), ready for a bar chart.
    pub fn series(&self) -> Vec<(String, Vec<Option<f64>>)> {
        self.table
            .schema
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let values = self.table.rows.iter().map(|row| row[idx].as_f64()).collect();
                (field.name.clone(), values)
            })
            .collect()
    }

    /// Count/sum/min/max/mean for every column.
    pub fn stats(&self) -> Vec<ColumnStats> {
        self.table
            .schema
            .field_names()
            .map(|name| {
                let stat = |op| reduce(&self.table, name, op).unwrap_or(Value::Null);
                let count = match stat(ReduceOp::Count) {
                    Value::Int64(n) => n as usize,
                    _ => 0,
                };
                ColumnStats {
                    name: name.to_string(),
                    count,
                    sum: stat(ReduceOp::Sum),
                    min: stat(ReduceOp::Min),
                    max: stat(ReduceOp::Max),
                    mean: stat(ReduceOp::Mean),
                }
            })
            .collect()
    }
}

/// Keep only the numeric columns of `table`.
///
/// Returns `None` when the table has no numeric column; that means "nothing to summarize",
/// not an error.
pub fn project(table: &Table) -> Option<NumericTable> {
    let idxs: Vec<usize> = table
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.data_type.is_numeric())
        .map(|(idx, _)| idx)
        .collect();

    if idxs.is_empty() {
        return None;
    }
    Some(NumericTable {
        table: select_indices(table, &idxs),
    })
}
