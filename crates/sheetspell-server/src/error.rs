//! Server error types and the mapping of domain errors to HTTP statuses.

use serde_json::json;
use sheetspell_chrome::ChromeError;
use sheetspell_core::CheckError;
use sheetspell_intake::IntakeError;
use thiserror::Error;

use crate::http::ApiResponse;

/// Errors that stop the server from starting or running
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Could not bind {address}: {reason}")]
    Bind { address: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// An error answered as `{"detail": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {detail}")]
pub struct ApiError {
    pub status: u16,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(404, "Not Found")
    }

    pub fn method_not_allowed() -> Self {
        Self::new(405, "Method Not Allowed")
    }

    /// A required parameter is missing or malformed
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::new(422, detail)
    }

    /// Map a domain error raised while trying to `action`
    pub fn from_check(action: &str, err: CheckError) -> Self {
        let error = match err {
            CheckError::InputNotFound(_) => Self::new(422, err.to_string()),
            CheckError::Busy => Self::new(503, err.to_string()),
            other => Self::new(500, format!("Could not {action} due to exception: '{other}'")),
        };
        tracing::error!(status = error.status, "{}", error.detail);
        error
    }

    pub fn from_intake(action: &str, err: IntakeError) -> Self {
        match err {
            IntakeError::InvalidName(_) => Self::invalid(err.to_string()),
            other => Self::from_check(action, other.into()),
        }
    }

    pub fn from_chrome(action: &str, err: ChromeError) -> Self {
        Self::from_check(action, err.into())
    }

    pub fn into_response(self) -> ApiResponse {
        ApiResponse::json(self.status, &json!({ "detail": self.detail }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from_check("run spell-check", CheckError::InputNotFound("a.csv".into())),
            ApiError::new(422, "'a.csv' does not exist! Use File Input APIs to ensure valid input")
        );
        assert_eq!(ApiError::from_check("run spell-check", CheckError::Busy).status, 503);

        let err = ApiError::from_check("run spell-check", CheckError::interaction("dialog gone"));
        assert_eq!(err.status, 500);
        assert_eq!(
            err.detail,
            "Could not run spell-check due to exception: 'Remote surface interaction failed: dialog gone'"
        );
    }

    #[test]
    fn test_invalid_file_name_is_client_error() {
        let err = ApiError::from_intake("upload file", IntakeError::InvalidName("../x".into()));
        assert_eq!(err.status, 422);
    }
}
