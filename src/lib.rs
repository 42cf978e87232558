//! `table-convert` loads uploaded CSV and Excel files into an in-memory [`types::Table`], cleans
//! them, summarizes their numeric columns and exports the result back to CSV or XLSX.
//!
//! Everything works on bytes already in memory: an upload is a file name plus its content
//! ([`ingestion::UploadedFile`]), and every export is a byte buffer with a MIME type and a
//! suggested download name ([`export::ExportResult`]).
//!
//! ## Formats
//!
//! - **CSV**: `.csv`. Header row first; column types are sniffed (integer, float, boolean,
//!   text) and common missing markers (`NA`, `NaN`, `NULL`, empty, ...) load as
//!   [`types::Value::Null`].
//! - **Excel**: `.xlsx`. The first worksheet is read; its first non-empty row is the header.
//!
//! Extensions are matched case-insensitively. Anything else is a
//! [`ConvertError::UnsupportedFormat`].
//!
//! ## Quick example: one file, start to finish
//!
//! ```rust
//! use table_convert::format::TableFormat;
//! use table_convert::ingestion::UploadedFile;
//! use table_convert::processing::CleaningOptions;
//! use table_convert::session::{FileSession, SessionOptions, SessionState};
//!
//! let upload = UploadedFile::new("people.csv", "id,name\n1,Ada\n1,Ada\n2,\n");
//! let options = CleaningOptions {
//!     remove_duplicates: true,
//!     fill_missing: Some("unknown".to_string()),
//!     export_format: TableFormat::Csv,
//!     ..Default::default()
//! };
//!
//! let mut session = FileSession::open(upload, options, SessionOptions::default());
//! session.run().unwrap();
//!
//! assert_eq!(session.state(), SessionState::Done);
//! let out = session.export_result().unwrap();
//! assert_eq!(out.bytes, b"id,name\n1,Ada\n2,unknown\n");
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: byte-level loaders for CSV and XLSX, dispatched by file extension
//! - [`processing`]: the cleaning pipeline (dedup, fill, column selection) and numeric summary
//! - [`export`]: CSV/XLSX encoders
//! - [`session`]: per-file state machine, batch processing and observers
//! - [`preview`]: first-rows snapshots taken after each step
//! - [`types`]: `Table`, `Schema` and cell values
//! - [`error`]: the error type shared by all of the above
//!
//! ## Batches
//!
//! [`session::process_uploads`] runs several files one after another. A failing file is
//! reported on its own session and does not stop the others:
//!
//! ```rust
//! use table_convert::ingestion::UploadedFile;
//! use table_convert::processing::CleaningOptions;
//! use table_convert::session::{process_uploads, SessionOptions, SessionState, UploadRequest};
//!
//! let sessions = process_uploads(
//!     vec![
//!         UploadRequest::new(UploadedFile::new("a.txt", "x"), CleaningOptions::default()),
//!         UploadRequest::new(UploadedFile::new("b.csv", "x\n1\n"), CleaningOptions::default()),
//!     ],
//!     &SessionOptions::default(),
//! );
//! assert_eq!(sessions[0].state(), SessionState::Failed);
//! assert_eq!(sessions[1].state(), SessionState::Done);
//! ```

pub mod error;
pub mod export;
pub mod format;
pub mod ingestion;
pub mod preview;
pub mod processing;
pub mod session;
pub mod types;

pub use error::{ConvertError, ConvertResult};
