//! Intake error types

use sheetspell_core::CheckError;
use thiserror::Error;

/// Result type for intake operations
pub type IntakeResult<T> = std::result::Result<T, IntakeError>;

/// Errors that can occur while storing or reading input files
#[derive(Debug, Error)]
pub enum IntakeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The file does not exist in the upload folder
    #[error("'{0}' does not exist! Use File Input APIs to ensure valid input")]
    NotFound(String),

    /// The file name is not a plain file name
    #[error("Invalid file name: '{0}'")]
    InvalidName(String),

    /// Extension is not something a reader exists for
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// The file content is not what its extension promises
    #[error("Invalid input file: {0}")]
    InvalidFormat(String),
}

impl From<IntakeError> for CheckError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::NotFound(name) => CheckError::InputNotFound(name),
            other => CheckError::Unexpected(other.to_string()),
        }
    }
}
