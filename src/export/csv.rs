//! CSV serialization.

use crate::error::{ConvertError, ConvertResult};
use crate::format::TableFormat;
use crate::types::Table;

/// Serialize `table` as CSV: a header row, then one record per row.
///
/// Fields containing the delimiter, a quote or a line break are quoted; missing cells are empty
/// fields. Records end with `\n`.
pub fn write_csv(table: &Table) -> ConvertResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(table.schema.field_names())
        .map_err(serialize_error)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))
            .map_err(serialize_error)?;
    }

    wtr.into_inner()
        .map_err(|e| ConvertError::serialize(TableFormat::Csv, e))
}

fn serialize_error(err: csv::Error) -> ConvertError {
    ConvertError::serialize(TableFormat::Csv, err)
}
