//! Column projection.

use std::collections::HashSet;

use crate::error::{ConvertError, ConvertResult};
use crate::types::{Schema, Table};

/// Returns a new [`Table`] holding only the `keep` columns, in the order given.
///
/// - Every name is checked before anything is projected; an absent name fails with
///   [`ConvertError::UnknownColumn`].
/// - Repeated names are kept once, at their first position.
/// - An empty `keep` returns the table unchanged.
pub fn project_columns(table: &Table, keep: &[String]) -> ConvertResult<Table> {
    let mut seen = HashSet::with_capacity(keep.len());
    let mut idxs = Vec::with_capacity(keep.len());
    for name in keep {
        if !seen.insert(name.as_str()) {
            continue;
        }
        let idx = table
            .schema
            .index_of(name)
            .ok_or_else(|| ConvertError::UnknownColumn {
                column: name.clone(),
                available: table.column_names(),
            })?;
        idxs.push(idx);
    }

    if idxs.is_empty() {
        return Ok(table.clone());
    }
    Ok(select_indices(table, &idxs))
}

/// Columns at `idxs`, in that order. Indices must be in range.
pub(crate) fn select_indices(table: &Table, idxs: &[usize]) -> Table {
    let fields = idxs
        .iter()
        .map(|&i| table.schema.fields[i].clone())
        .collect();
    let rows = table
        .rows
        .iter()
        .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
        .collect();
    Table::new(Schema::new(fields), rows)
}

#[cfg(test)]
mod tests {
    use super::project_columns;
    use crate::error::ConvertError;
    use crate::types::{Table, Value};

    fn sample() -> Table {
        Table::from_columns(vec![
            ("id", vec![Value::Int64(1), Value::Int64(2)]),
            ("name", vec!["a".into(), "b".into()]),
            ("score", vec![Value::Float64(1.5), Value::Null]),
        ])
        .unwrap()
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keeps_requested_columns_in_requested_order() {
        let out = project_columns(&sample(), &names(&["score", "id"])).unwrap();
        assert_eq!(out.column_names(), vec!["score", "id"]);
        assert_eq!(out.rows[0], vec![Value::Float64(1.5), Value::Int64(1)]);
    }

    #[test]
    fn all_columns_is_identity() {
        let t = sample();
        let out = project_columns(&t, &t.column_names()).unwrap();
        assert_eq!(out, t);
    }

    #[test]
    fn empty_selection_is_a_no_op() {
        let t = sample();
        assert_eq!(project_columns(&t, &[]).unwrap(), t);
    }

    #[test]
    fn repeated_names_collapse() {
        let out = project_columns(&sample(), &names(&["name", "name"])).unwrap();
        assert_eq!(out.column_names(), vec!["name"]);
    }

    #[test]
    fn unknown_column_fails_before_projecting() {
        let err = project_columns(&sample(), &names(&["id", "nonexistent"])).unwrap_err();
        match err {
            ConvertError::UnknownColumn { column, available } => {
                assert_eq!(column, "nonexistent");
                assert_eq!(available, vec!["id", "name", "score"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
