//! Error types for sheetspell-core

use thiserror::Error;

/// Result type alias using [`CheckError`]
pub type Result<T> = std::result::Result<T, CheckError>;

/// Errors that can end a spell-check batch
#[derive(Debug, Error)]
pub enum CheckError {
    /// The remote sheet could not be reached, authorized or written
    #[error("Could not write to the remote sheet: {0}")]
    SurfaceWrite(String),

    /// A control on the remote surface could not be located or read in time
    #[error("Remote surface interaction failed: {0}")]
    SurfaceInteraction(String),

    /// The browser session is gone or never came up
    #[error("Browser session is unreachable: {0}")]
    SessionUnreachable(String),

    /// The requested input file does not exist
    #[error("'{0}' does not exist! Use File Input APIs to ensure valid input")]
    InputNotFound(String),

    /// Another batch currently owns the remote session
    #[error("A spell-check batch is already running, try again later")]
    Busy,

    /// Two input rows share the same identifier
    #[error("Duplicate row id: {0}")]
    DuplicateRow(String),

    /// Anything else
    #[error("{0}")]
    Unexpected(String),
}

impl CheckError {
    /// Create a new "unexpected" error with a message
    pub fn unexpected<S: Into<String>>(msg: S) -> Self {
        CheckError::Unexpected(msg.into())
    }

    /// Create a new surface interaction error with a message
    pub fn interaction<S: Into<String>>(msg: S) -> Self {
        CheckError::SurfaceInteraction(msg.into())
    }
}
