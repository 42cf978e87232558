use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx, XlsxError};

use crate::error::{ConvertError, ConvertResult};
use crate::format::TableFormat;
use crate::types::{Table, Value};

use super::sniff::normalize_headers;

/// Load the first worksheet of an `.xlsx` workbook into a [`Table`].
///
/// Behavior:
/// - Detects the first non-empty row as the header row
/// - Reads remaining rows and converts cells into [`Value`]s
/// - Whole-number floats are read as integers, then each column's type is unified
pub fn load_xlsx_from_bytes(bytes: &[u8]) -> ConvertResult<Table> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).map_err(parse_error)?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ConvertError::parse(TableFormat::Xlsx, "workbook has no sheets"))?;
    let range = workbook.worksheet_range(&sheet).map_err(parse_error)?;

    load_sheet_range(&sheet, &range)
}

fn load_sheet_range(sheet: &str, range: &Range<Data>) -> ConvertResult<Table> {
    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| {
            ConvertError::parse(
                TableFormat::Xlsx,
                format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
            )
        })?;

    let mut rows_iter = range.rows().skip(header_row_idx);
    let header_cells: Vec<String> = rows_iter
        .next()
        .map(|row| row.iter().map(cell_to_header_string).collect())
        .unwrap_or_default();
    let names = normalize_headers(header_cells);

    let rows: Vec<Vec<Value>> = rows_iter
        .map(|row| {
            (0..names.len())
                .map(|idx| convert_cell(row.get(idx).unwrap_or(&Data::Empty)))
                .collect()
        })
        .collect();

    Table::from_rows(names, rows)
}

fn parse_error(err: XlsxError) -> ConvertError {
    ConvertError::parse(TableFormat::Xlsx, err)
}

fn cell_to_header_string(c: &Data) -> String {
    convert_cell(c).to_string()
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => float_cell(*f),
        Data::DateTime(dt) => Value::Utf8(
            dt.as_datetime()
                .map(|d| d.to_string())
                .unwrap_or_else(|| c.to_string()),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
        Data::Error(e) => Value::Utf8(e.to_string()),
    }
}

// Spreadsheets store every number as a double; whole numbers come back as integers.
fn float_cell(f: f64) -> Value {
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if f.is_finite() && f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f) {
        Value::Int64(f as i64)
    } else {
        Value::Float64(f)
    }
}
