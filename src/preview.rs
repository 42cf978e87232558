//! Table previews shown after loading and after each applied cleaning stage.

use std::fmt;

use crate::format::TableFormat;
use crate::processing::Stage;
use crate::types::{Table, Value};

/// Default number of rows in a preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Snapshot of a table: the first rows plus its overall shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// Stage the snapshot was taken after; `None` for the freshly loaded table.
    pub stage: Option<Stage>,
    /// Format the file was loaded from.
    pub file_type: TableFormat,
    /// Rows in the full table.
    pub row_count: usize,
    /// Columns in the full table.
    pub column_count: usize,
    /// First rows of the table.
    pub head: Table,
}

impl Preview {
    pub fn of(table: &Table, file_type: TableFormat, stage: Option<Stage>, rows: usize) -> Self {
        Self {
            stage,
            file_type,
            row_count: table.row_count(),
            column_count: table.column_count(),
            head: table.head(rows),
        }
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "File Type: {} | Rows: {} | Columns: {}",
            self.file_type.label(),
            self.row_count,
            self.column_count
        )?;
        let header: Vec<&str> = self.head.schema.field_names().collect();
        writeln!(f, "{}", header.join(" | "))?;
        for row in &self.head.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|v| match v {
                    Value::Null => "NA".to_string(),
                    other => other.to_string(),
                })
                .collect();
            writeln!(f, "{}", cells.join(" | "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Preview;
    use crate::format::TableFormat;
    use crate::types::{Table, Value};

    #[test]
    fn preview_keeps_shape_of_full_table() {
        let t = Table::from_columns(vec![(
            "n",
            (0..10).map(Value::Int64).collect::<Vec<_>>(),
        )])
        .unwrap();
        let p = Preview::of(&t, TableFormat::Csv, None, 5);
        assert_eq!(p.row_count, 10);
        assert_eq!(p.column_count, 1);
        assert_eq!(p.head.row_count(), 5);
    }

    #[test]
    fn preview_renders_header_and_missing_cells() {
        let t = Table::from_columns(vec![
            ("a", vec![Value::Int64(1), Value::Null]),
            ("b", vec!["x".into(), "y".into()]),
        ])
        .unwrap();
        let text = Preview::of(&t, TableFormat::Xlsx, None, 5).to_string();
        assert_eq!(text, "File Type: XLSX | Rows: 2 | Columns: 2\na | b\n1 | x\nNA | y\n");
    }
}
