//! Error types for the Chrome / Google Sheets layer.

use sheetspell_core::CheckError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChromeError {
    #[error("DevTools protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("Failed to launch Chrome: {0}")]
    Launch(String),

    #[error("Chrome did not answer within {0} seconds")]
    Unresponsive(u64),

    #[error("Timed out after {secs} seconds waiting for '{selector}'")]
    Timeout { selector: String, secs: u64 },

    #[error("Environment variable {0} is not set")]
    MissingCredential(&'static str),

    #[error("Sheets API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("No access token configured for the Sheets API")]
    MissingAccessToken,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid key event: {0}")]
    KeyEvent(String),

    #[error("Unexpected script result: {0}")]
    Script(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChromeError>;

impl From<ChromeError> for CheckError {
    fn from(err: ChromeError) -> Self {
        let message = err.to_string();
        match err {
            ChromeError::Http(_) | ChromeError::Api { .. } | ChromeError::MissingAccessToken => {
                CheckError::SurfaceWrite(message)
            }
            ChromeError::Launch(_) | ChromeError::Unresponsive(_) => {
                CheckError::SessionUnreachable(message)
            }
            _ => CheckError::SurfaceInteraction(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_into_check_error() {
        assert!(matches!(
            CheckError::from(ChromeError::Api { status: 403, body: "denied".into() }),
            CheckError::SurfaceWrite(m) if m.contains("403")
        ));
        assert!(matches!(
            CheckError::from(ChromeError::Launch("no binary".into())),
            CheckError::SessionUnreachable(_)
        ));
        assert!(matches!(
            CheckError::from(ChromeError::Timeout { selector: "#x".into(), secs: 15 }),
            CheckError::SurfaceInteraction(_)
        ));
    }
}
