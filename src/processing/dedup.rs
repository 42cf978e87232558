//! Duplicate-row removal.

use std::collections::HashSet;

use crate::types::{Table, Value};

#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Utf8(&'a str),
}

fn cell_key(v: &Value) -> CellKey<'_> {
    match v {
        Value::Null => CellKey::Null,
        Value::Int64(i) => CellKey::Int(*i),
        // -0.0 == 0.0, so both hash the same.
        Value::Float64(f) if *f == 0.0 => CellKey::Float(0.0f64.to_bits()),
        Value::Float64(f) => CellKey::Float(f.to_bits()),
        Value::Bool(b) => CellKey::Bool(*b),
        Value::Utf8(s) => CellKey::Utf8(s.as_str()),
    }
}

/// Returns a new [`Table`] without rows that repeat an earlier row in every column.
///
/// The first occurrence is kept and survivors stay in their original order.
pub fn deduplicate(table: &Table) -> Table {
    let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(table.row_count());
    let keep: Vec<bool> = table
        .rows
        .iter()
        .map(|row| seen.insert(row.iter().map(cell_key).collect()))
        .collect();

    let mut keep = keep.into_iter();
    table.filter_rows(|_| keep.next().unwrap_or(false))
}
