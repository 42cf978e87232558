//! CSV loading.

use std::io::Read;

use crate::error::{ConvertError, ConvertResult};
use crate::format::TableFormat;
use crate::types::{Table, Value};

use super::sniff::{normalize_headers, sniff_text_column};

/// Load CSV bytes into a [`Table`].
///
/// Rules:
///
/// - The first record is the header row.
/// - Records shorter than the header are padded with missing cells; longer ones are an error.
/// - Column types are sniffed per column (see [`sniff_text_column`]).
pub fn load_csv_from_bytes(bytes: &[u8]) -> ConvertResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    load_csv_from_reader(&mut rdr)
}

/// Load CSV data from an existing CSV reader.
pub fn load_csv_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> ConvertResult<Table> {
    let headers = rdr.headers().map_err(parse_error)?.clone();
    if headers.is_empty() {
        return Err(ConvertError::parse(
            TableFormat::Csv,
            "no columns to parse from input",
        ));
    }
    let names = normalize_headers(headers.iter().map(str::to_string).collect());

    let mut records = Vec::new();
    for (idx0, result) in rdr.records().enumerate() {
        let record = result.map_err(parse_error)?;
        if record.len() > names.len() {
            return Err(ConvertError::parse(
                TableFormat::Csv,
                format!(
                    "record {} has {} fields, but the header has {}",
                    idx0 + 1,
                    record.len(),
                    names.len()
                ),
            ));
        }
        records.push(record);
    }

    let columns: Vec<Vec<Value>> = (0..names.len())
        .map(|idx| {
            let raw: Vec<&str> = records.iter().map(|r| r.get(idx).unwrap_or("")).collect();
            sniff_text_column(&raw)
        })
        .collect();

    let mut rows: Vec<Vec<Value>> = (0..records.len())
        .map(|_| Vec::with_capacity(names.len()))
        .collect();
    for column in columns {
        for (row, cell) in rows.iter_mut().zip(column) {
            row.push(cell);
        }
    }

    Table::from_rows(names, rows)
}

fn parse_error(err: csv::Error) -> ConvertError {
    ConvertError::parse(TableFormat::Csv, err)
}

#[cfg(test)]
mod tests {
    use super::load_csv_from_bytes;
    use crate::error::ConvertError;
    use crate::types::{DataType, Value};

    #[test]
    fn sniffs_each_column() {
        let t = load_csv_from_bytes(b"id,name,score,active\n1,Ada,98.5,true\n2,,87,false\n").unwrap();
        let types: Vec<DataType> = t.schema.fields.iter().map(|f| f.data_type).collect();
        assert_eq!(
            types,
            vec![DataType::Int64, DataType::Utf8, DataType::Float64, DataType::Bool]
        );
        assert_eq!(t.rows[1][1], Value::Null);
        assert_eq!(t.rows[1][2], Value::Float64(87.0));
    }

    #[test]
    fn quoted_fields_keep_delimiters() {
        let t = load_csv_from_bytes(b"a,b\n\"x, y\",\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(t.rows[0][0], Value::Utf8("x, y".to_string()));
        assert_eq!(t.rows[0][1], Value::Utf8("say \"hi\"".to_string()));
    }

    #[test]
    fn header_only_input_gives_empty_table() {
        let t = load_csv_from_bytes(b"a,b\n").unwrap();
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.column_names(), vec!["a", "b"]);
        assert_eq!(t.schema.fields[0].data_type, DataType::Empty);
    }

    #[test]
    fn ragged_record_is_a_parse_error() {
        let err = load_csv_from_bytes(b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(err, ConvertError::ParseError { .. }));
    }

    #[test]
    fn short_record_is_padded_with_missing_cells() {
        let t = load_csv_from_bytes(b"a,b,c\n1,2,3\n4,5\n").unwrap();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.rows[1], vec![Value::Int64(4), Value::Int64(5), Value::Null]);
        assert_eq!(t.schema.fields[2].data_type, DataType::Int64);
    }

    #[test]
    fn long_record_names_its_position() {
        let err = load_csv_from_bytes(b"a,b\n1,2\n3,4,5\n").unwrap_err();
        assert!(err.to_string().contains("record 2 has 3 fields, but the header has 2"));
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        let err = load_csv_from_bytes(b"").unwrap_err();
        assert!(err.to_string().contains("no columns to parse"));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = load_csv_from_bytes(b"a\n\xff\xfe\n").unwrap_err();
        assert!(matches!(err, ConvertError::ParseError { .. }));
    }
}
