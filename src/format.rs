//! Tabular formats understood by the loader and the exporter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Media type registered for OOXML workbooks.
pub const XLSX_MEDIA_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Media type for comma-separated values.
pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// Supported tabular formats.
///
/// Deserializes from the labels the upload UI uses (`"CSV"`, `"Excel"`) as well as the plain
/// extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TableFormat {
    /// Comma-separated values.
    #[default]
    #[serde(rename = "CSV", alias = "csv", alias = "Csv")]
    Csv,
    /// Single-sheet OOXML workbook.
    #[serde(rename = "Excel", alias = "xlsx", alias = "XLSX", alias = "Xlsx")]
    Xlsx,
}

impl TableFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Canonical file extension (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    /// Registered MIME type.
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Csv => CSV_MEDIA_TYPE,
            Self::Xlsx => XLSX_MEDIA_TYPE,
        }
    }

    /// Upper-case label shown next to previews (`CSV`, `XLSX`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Xlsx => "XLSX",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TableFormat {
    type Err = ConvertError;

    /// Accepts extensions and the UI labels (`CSV`, `Excel`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("excel") {
            return Ok(Self::Xlsx);
        }
        Self::from_extension(trimmed).ok_or_else(|| ConvertError::UnsupportedFormat {
            extension: trimmed.to_string(),
        })
    }
}
