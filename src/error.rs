use thiserror::Error;

use crate::format::TableFormat;
use crate::session::SessionState;

/// Convenience result type used across loading, cleaning and export.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Error type returned by every stage of a file session.
///
/// Third-party errors (`csv`, `calamine`, `rust_xlsxwriter`) are flattened into the variant that
/// matches the direction of the failure, so the enum stays `Clone` and sessions can keep a copy
/// of the error that failed them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// The file extension is not a recognized tabular format.
    #[error("unsupported format: '{extension}' (expected csv or xlsx)")]
    UnsupportedFormat { extension: String },

    /// The byte content could not be decoded as a table of the given format.
    #[error("failed to parse {format} content: {message}")]
    ParseError { format: TableFormat, message: String },

    /// A column projection referenced a column that does not exist.
    #[error("unknown column '{column}'. available={available:?}")]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },

    /// The target encoder cannot represent a value in the table.
    #[error("failed to serialize {format}: {message}")]
    SerializationError { format: TableFormat, message: String },

    /// The table shape is invalid (ragged rows, duplicate column names, ...).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A session step was requested from a state that does not allow it.
    #[error("cannot {step} a session in state {state:?}")]
    InvalidTransition {
        step: &'static str,
        state: SessionState,
    },
}

impl ConvertError {
    pub(crate) fn parse(format: TableFormat, message: impl ToString) -> Self {
        Self::ParseError {
            format,
            message: message.to_string(),
        }
    }

    pub(crate) fn serialize(format: TableFormat, message: impl ToString) -> Self {
        Self::SerializationError {
            format,
            message: message.to_string(),
        }
    }
}
