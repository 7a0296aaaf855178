//! # sheetspell-intake
//!
//! Input files for spell-check batches.
//!
//! [`FileStore`] owns the upload folder (list / upload / delete) and
//! [`read_rows`] turns a stored file into [`Row`](sheetspell_core::Row)s:
//! - CSV and XLSX: first column is the identifier, second column the text
//! - TXT: one row per line, identified by its line index

mod error;
mod options;
mod reader;
mod store;

pub use error::{IntakeError, IntakeResult};
pub use options::CsvReadOptions;
pub use reader::{read_rows, read_rows_from, CsvReader, InputFormat, TextReader, XlsxReader};
pub use store::{DeleteOutcome, FileLookup, FileStore, UploadOutcome, ALL_FILES};
