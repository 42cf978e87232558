//! Unified loading entrypoint.
//!
//! Most callers should use [`load_upload`], which picks the loader from the upload's file name,
//! or [`load`] when the bytes and extension are already separate.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{ConvertError, ConvertResult};
use crate::format::TableFormat;
use crate::types::Table;

use super::{csv, excel};

/// An uploaded file: a name (including extension) and its raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as supplied by the uploader, e.g. `sales.csv`.
    pub name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, using its file name as the upload name.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, fs::read(path)?))
    }

    /// Substring after the last `.` in the name, if any.
    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.name)
    }

    /// Format implied by the file name.
    pub fn format(&self) -> ConvertResult<TableFormat> {
        format_for_name(&self.name)
    }
}

/// Substring after the last `.` in `name`, if any.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

/// Resolve the format for a file name, failing with [`ConvertError::UnsupportedFormat`].
pub fn format_for_name(name: &str) -> ConvertResult<TableFormat> {
    let ext = extension_of(name).unwrap_or("");
    TableFormat::from_extension(ext).ok_or_else(|| ConvertError::UnsupportedFormat {
        extension: ext.to_string(),
    })
}

/// Decode `bytes` as a table of the format named by `extension` (case-insensitive).
///
/// # Examples
///
/// ```rust
/// use table_convert::ingestion::load;
/// use table_convert::types::Value;
///
/// # fn main() -> Result<(), table_convert::ConvertError> {
/// let table = load(b"id,name\n1,Ada\n2,Grace\n", "CSV")?;
/// assert_eq!(table.row_count(), 2);
/// assert_eq!(table.rows[0][0], Value::Int64(1));
///
/// assert!(load(b"{}", "json").is_err());
/// # Ok(())
/// # }
/// ```
pub fn load(bytes: &[u8], extension: &str) -> ConvertResult<Table> {
    let format =
        TableFormat::from_extension(extension).ok_or_else(|| ConvertError::UnsupportedFormat {
            extension: extension.to_string(),
        })?;
    load_format(bytes, format)
}

/// Decode `bytes` with an explicit format.
pub fn load_format(bytes: &[u8], format: TableFormat) -> ConvertResult<Table> {
    match format {
        TableFormat::Csv => csv::load_csv_from_bytes(bytes),
        TableFormat::Xlsx => excel::load_xlsx_from_bytes(bytes),
    }
}

/// Load an upload, re-validating the extension from its file name.
pub fn load_upload(file: &UploadedFile) -> ConvertResult<Table> {
    load_format(&file.bytes, file.format()?)
}
