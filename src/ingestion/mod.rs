//! Loading entrypoints and implementations.
//!
//! Most callers should use [`load_upload`] (from [`unified`]) which:
//!
//! - resolves the format from the upload's file name (case-insensitive extension)
//! - decodes the bytes into an in-memory [`crate::types::Table`]
//! - sniffs one type per column
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`excel`]

pub mod csv;
pub mod excel;
pub mod sniff;
pub mod unified;

pub use unified::{extension_of, format_for_name, load, load_format, load_upload, UploadedFile};
