//! Reduction operations for [`crate::types::Table`] columns.

use crate::types::{DataType, Table, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count non-missing cells.
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
    /// Arithmetic mean of numeric values, ignoring nulls.
    Mean,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Min`/`Max`/`Mean`, returns `Some(Value::Null)` if there are no non-null values
///   or the column is not numeric.
/// - For `Count`, always returns `Some(Value::Int64(non_null_cells))`.
/// - Integer sums that overflow `i64` are returned as floats.
pub fn reduce(table: &Table, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = table.schema.index_of(column)?;
    let field = table.schema.fields.get(idx)?;

    match op {
        ReduceOp::Count => {
            let n = table.rows.iter().filter(|row| !row[idx].is_null()).count();
            Some(Value::Int64(n as i64))
        }
        ReduceOp::Sum | ReduceOp::Min | ReduceOp::Max | ReduceOp::Mean => {
            Some(reduce_numeric_typed(table, idx, field.data_type, op))
        }
    }
}

fn reduce_numeric_typed(table: &Table, idx: usize, data_type: DataType, op: ReduceOp) -> Value {
    match data_type {
        DataType::Int64 => {
            let values = table.rows.iter().filter_map(|row| match row[idx] {
                Value::Int64(v) => Some(v),
                _ => None,
            });
            let mut acc: Option<i128> = None;
            let mut n: usize = 0;
            for v in values {
                let v = i128::from(v);
                n += 1;
                acc = Some(match (op, acc) {
                    (ReduceOp::Sum | ReduceOp::Mean, Some(a)) => a + v,
                    (ReduceOp::Min, Some(a)) => a.min(v),
                    (ReduceOp::Max, Some(a)) => a.max(v),
                    (_, _) => v,
                });
            }
            match (op, acc) {
                (_, None) => Value::Null,
                (ReduceOp::Mean, Some(a)) => Value::Float64(a as f64 / n as f64),
                (_, Some(a)) => i64::try_from(a)
                    .map(Value::Int64)
                    .unwrap_or(Value::Float64(a as f64)),
            }
        }
        DataType::Float64 => {
            let values = table.rows.iter().filter_map(|row| row[idx].as_f64());
            let mut acc: Option<f64> = None;
            let mut n: usize = 0;
            for v in values {
                n += 1;
                acc = Some(match (op, acc) {
                    (ReduceOp::Sum | ReduceOp::Mean, Some(a)) => a + v,
                    (ReduceOp::Min, Some(a)) => a.min(v),
                    (ReduceOp::Max, Some(a)) => a.max(v),
                    (_, _) => v,
                });
            }
            match (op, acc) {
                (_, None) => Value::Null,
                (ReduceOp::Mean, Some(a)) => Value::Float64(a / n as f64),
                (_, Some(a)) => Value::Float64(a),
            }
        }
        _ => Value::Null,
    }
}
