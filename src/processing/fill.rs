//! Missing-value fill.

use crate::types::{Table, Value};

/// Returns a new [`Table`] where every missing cell holds `fill` as text.
///
/// The value is written as supplied into every column, numeric ones included, so a numeric
/// column that had gaps ends up [`crate::types::DataType::Mixed`].
pub fn fill_missing(table: &Table, fill: &str) -> Table {
    if table.null_count() == 0 {
        return table.clone();
    }
    table.map_rows(|row| {
        row.iter()
            .map(|v| match v {
                Value::Null => Value::Utf8(fill.to_string()),
                other => other.clone(),
            })
            .collect()
    })
}
