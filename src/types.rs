//! Core data model.
//!
//! Loaders produce a [`Table`]: an ordered list of named, typed columns stored row-major as
//! tagged [`Value`]s. Column types are sniffed once at load time and re-inferred by the pipeline
//! steps that change cell kinds (see [`infer_data_type`]).

use std::collections::HashSet;
use std::fmt;

use crate::error::{ConvertError, ConvertResult};

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// More than one cell kind (e.g. a numeric column after a text fill).
    Mixed,
    /// No non-missing cells.
    Empty,
}

impl DataType {
    /// `true` for [`DataType::Int64`] and [`DataType::Float64`].
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }

    /// Combine two column types. Integers widen to floats; any other disagreement is `Mixed`.
    pub fn unify(self, other: Self) -> Self {
        match (self, other) {
            (Self::Empty, t) | (t, Self::Empty) => t,
            (a, b) if a == b => a,
            (Self::Int64, Self::Float64) | (Self::Float64, Self::Int64) => Self::Float64,
            _ => Self::Mixed,
        }
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Column type.
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the columns of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing-marker.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The column type this cell alone would imply (`None` for nulls).
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Int64(_) => Some(DataType::Int64),
            Self::Float64(_) => Some(DataType::Float64),
            Self::Bool(_) => Some(DataType::Bool),
            Self::Utf8(_) => Some(DataType::Utf8),
        }
    }

    /// Numeric view of the cell, if it holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int64(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Utf8(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Text form used by previews and the CSV writer. Nulls render as an empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => f.write_str(&format_float(*v)),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(s) => f.write_str(s),
        }
    }
}

/// Format a float so it always reads back as a float (`2` becomes `2.0`).
pub fn format_float(v: f64) -> String {
    let s = v.to_string();
    if !v.is_finite() || s.contains(['.', 'e', 'E']) {
        s
    } else {
        format!("{s}.0")
    }
}

/// Infer the type of a column from its cells. Nulls are ignored; an all-null column is `Empty`.
pub fn infer_data_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> DataType {
    let mut acc = DataType::Empty;
    for t in values.into_iter().filter_map(Value::data_type) {
        acc = acc.unify(t);
        if acc == DataType::Mixed {
            break;
        }
    }
    acc
}

/// In-memory table.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields. Every row
/// has exactly one cell per field and field names are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Column names and inferred types.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from an already consistent schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Build a table from column names and rows, inferring a type for each column.
    ///
    /// Integer cells in a column that also holds floats are widened to floats.
    pub fn from_rows(names: Vec<String>, mut rows: Vec<Vec<Value>>) -> ConvertResult<Self> {
        check_unique_names(&names)?;
        for (idx0, row) in rows.iter().enumerate() {
            if row.len() != names.len() {
                return Err(ConvertError::SchemaMismatch {
                    message: format!(
                        "row {} has {} cells but there are {} columns",
                        idx0 + 1,
                        row.len(),
                        names.len()
                    ),
                });
            }
        }

        let mut fields = Vec::with_capacity(names.len());
        for (idx, name) in names.into_iter().enumerate() {
            let data_type = infer_data_type(rows.iter().map(|r| &r[idx]));
            if data_type == DataType::Float64 {
                for row in rows.iter_mut() {
                    if let Value::Int64(v) = row[idx] {
                        row[idx] = Value::Float64(v as f64);
                    }
                }
            }
            fields.push(Field::new(name, data_type));
        }

        Ok(Self::new(Schema::new(fields), rows))
    }

    /// Build a table from named columns (column-major input).
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<Value>)>) -> ConvertResult<Self> {
        let row_count = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut rows: Vec<Vec<Value>> = (0..row_count)
            .map(|_| Vec::with_capacity(columns.len()))
            .collect();

        for (name, cells) in columns {
            let name = name.into();
            if cells.len() != row_count {
                return Err(ConvertError::SchemaMismatch {
                    message: format!(
                        "column '{name}' has {} cells but the first column has {row_count}",
                        cells.len()
                    ),
                });
            }
            for (row, cell) in rows.iter_mut().zip(cells) {
                row.push(cell);
            }
            names.push(name);
        }

        Self::from_rows(names, rows)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.field_names().map(str::to_string).collect()
    }

    /// Iterate the cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.schema.index_of(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Count of missing-marker cells across the whole table.
    pub fn null_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|v| v.is_null()).count())
            .sum()
    }

    /// First `n` rows as a new table.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new table by applying `mapper` to every row.
    ///
    /// Column types are re-inferred afterwards since the mapper may change cell kinds.
    ///
    /// # Panics
    ///
    /// Panics if `mapper` returns a row with a different length than the schema field count.
    pub fn map_rows<F>(&self, mut mapper: F) -> Self
    where
        F: FnMut(&[Value]) -> Vec<Value>,
    {
        let expected_len = self.schema.fields.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let out = mapper(row.as_slice());
                assert!(
                    out.len() == expected_len,
                    "mapped row length {} does not match schema length {}",
                    out.len(),
                    expected_len
                );
                out
            })
            .collect();

        let mut out = Self {
            schema: self.schema.clone(),
            rows,
        };
        out.refresh_types();
        out
    }

    /// Re-infer each field's type from the current cells.
    fn refresh_types(&mut self) {
        for (idx, field) in self.schema.fields.iter_mut().enumerate() {
            field.data_type = infer_data_type(self.rows.iter().map(|r| &r[idx]));
        }
    }
}

fn check_unique_names(names: &[String]) -> ConvertResult<()> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ConvertError::SchemaMismatch {
                message: format!("duplicate column name '{name}'"),
            });
        }
    }
    Ok(())
}
