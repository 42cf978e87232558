//! Export: re-encode a table as CSV or XLSX with matching MIME type and file name.

pub mod csv;
pub mod xlsx;

use std::fmt;

use crate::error::ConvertResult;
use crate::format::TableFormat;
use crate::types::Table;

/// Encoded table ready for download.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Encoded file content.
    pub bytes: Vec<u8>,
    /// Registered MIME type of `format`.
    pub media_type: &'static str,
    /// Suggested download name: the source name with its extension swapped.
    pub file_name: String,
    pub format: TableFormat,
}

impl fmt::Debug for ExportResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportResult")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("format", &self.format)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Encode `table` as `format`, naming the output after `source_name`.
///
/// ```rust
/// use table_convert::export::export;
/// use table_convert::format::TableFormat;
/// use table_convert::types::{Table, Value};
///
/// let table = Table::from_columns(vec![("id", vec![Value::Int64(1)])]).unwrap();
/// let out = export(&table, TableFormat::Csv, "Sales.XLSX").unwrap();
/// assert_eq!(out.file_name, "Sales.csv");
/// assert_eq!(out.media_type, "text/csv");
/// assert_eq!(out.bytes, b"id\n1\n");
/// ```
pub fn export(table: &Table, format: TableFormat, source_name: &str) -> ConvertResult<ExportResult> {
    Ok(ExportResult {
        bytes: encode(table, format)?,
        media_type: format.media_type(),
        file_name: export_file_name(source_name, format),
        format,
    })
}

/// Encode `table` as `format`.
pub fn encode(table: &Table, format: TableFormat) -> ConvertResult<Vec<u8>> {
    match format {
        TableFormat::Csv => csv::write_csv(table),
        TableFormat::Xlsx => xlsx::write_xlsx(table),
    }
}

/// Replace the text after the last `.` in `source_name` with the format's extension.
///
/// Names without a `.` get the extension appended.
pub fn export_file_name(source_name: &str, format: TableFormat) -> String {
    let stem = source_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(source_name);
    format!("{stem}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::export_file_name;
    use crate::format::TableFormat;

    #[test]
    fn swaps_only_the_last_extension() {
        assert_eq!(export_file_name("csv.report.csv", TableFormat::Xlsx), "csv.report.xlsx");
        assert_eq!(export_file_name("data.XLSX", TableFormat::Csv), "data.csv");
        assert_eq!(export_file_name("noext", TableFormat::Csv), "noext.csv");
    }
}
