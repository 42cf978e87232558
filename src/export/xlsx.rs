//! XLSX serialization.

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::error::{ConvertError, ConvertResult};
use crate::format::TableFormat;
use crate::types::{Table, Value};

/// Serialize `table` as a single-sheet workbook with a header row.
///
/// Missing cells are left empty. Fails with [`ConvertError::SerializationError`] for integers a
/// spreadsheet number (an IEEE double) cannot hold exactly, non-finite floats, over-long
/// strings, or a table larger than a worksheet.
pub fn write_xlsx(table: &Table) -> ConvertResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (idx, name) in table.schema.field_names().enumerate() {
        worksheet
            .write_string(0, col_num(idx)?, name)
            .map_err(serialize_error)?;
    }

    for (idx0, row) in table.rows.iter().enumerate() {
        // Row 0 holds the header.
        let row_num = u32::try_from(idx0 + 1).map_err(|_| {
            ConvertError::serialize(TableFormat::Xlsx, "too many rows for a worksheet")
        })?;

        for (idx, value) in row.iter().enumerate() {
            let col = col_num(idx)?;
            match value {
                Value::Null => {}
                Value::Int64(v) => {
                    let Some(number) = exact_f64(*v) else {
                        return Err(ConvertError::serialize(
                            TableFormat::Xlsx,
                            format!("integer {v} at row {} cannot be stored exactly", idx0 + 1),
                        ));
                    };
                    worksheet
                        .write_number(row_num, col, number)
                        .map_err(serialize_error)?;
                }
                Value::Float64(v) => {
                    if !v.is_finite() {
                        return Err(ConvertError::serialize(
                            TableFormat::Xlsx,
                            format!("non-finite number {v} at row {}", idx0 + 1),
                        ));
                    }
                    worksheet
                        .write_number(row_num, col, *v)
                        .map_err(serialize_error)?;
                }
                Value::Bool(b) => {
                    worksheet
                        .write_boolean(row_num, col, *b)
                        .map_err(serialize_error)?;
                }
                Value::Utf8(s) => {
                    worksheet
                        .write_string(row_num, col, s.as_str())
                        .map_err(serialize_error)?;
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(serialize_error)
}

// `as` saturates at i64::MAX, so 2^63 itself has to be ruled out separately.
fn exact_f64(v: i64) -> Option<f64> {
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63
    let f = v as f64;
    (f < I64_BOUND && f as i64 == v).then_some(f)
}

fn col_num(idx: usize) -> ConvertResult<u16> {
    u16::try_from(idx)
        .map_err(|_| ConvertError::serialize(TableFormat::Xlsx, "too many columns for a worksheet"))
}

fn serialize_error(err: XlsxError) -> ConvertError {
    ConvertError::serialize(TableFormat::Xlsx, err)
}

#[cfg(test)]
mod tests {
    use super::write_xlsx;
    use crate::error::ConvertError;
    use crate::types::{Table, Value};

    #[test]
    fn writes_a_zip_container() {
        let t = Table::from_columns(vec![("a", vec![Value::Int64(1)])]).unwrap();
        let bytes = write_xlsx(&t).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn rejects_integers_beyond_double_precision() {
        let t = Table::from_columns(vec![("a", vec![Value::Int64(i64::MAX)])]).unwrap();
        let err = write_xlsx(&t).unwrap_err();
        assert!(matches!(err, ConvertError::SerializationError { .. }));
    }

    #[test]
    fn large_integers_that_fit_a_double_are_written() {
        let t = Table::from_columns(vec![(
            "a",
            vec![Value::Int64(1_000_000_000_000_000_000), Value::Int64(-(1 << 60))],
        )])
        .unwrap();
        assert!(write_xlsx(&t).is_ok());

        let odd = Table::from_columns(vec![("a", vec![Value::Int64((1 << 53) + 1)])]).unwrap();
        assert!(matches!(
            write_xlsx(&odd).unwrap_err(),
            ConvertError::SerializationError { .. }
        ));
    }

    #[test]
    fn rejects_non_finite_floats() {
        let t = Table::from_columns(vec![("a", vec![Value::Float64(f64::INFINITY)])]).unwrap();
        let err = write_xlsx(&t).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn rejects_strings_over_the_cell_limit() {
        let long = "x".repeat(40_000);
        let t = Table::from_columns(vec![("a", vec![Value::Utf8(long)])]).unwrap();
        let err = write_xlsx(&t).unwrap_err();
        assert!(matches!(err, ConvertError::SerializationError { .. }));
    }
}
