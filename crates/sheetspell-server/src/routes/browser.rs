//! `/browser` endpoints

use std::str::FromStr;

use sheetspell_chrome::{ChromeError, LoginOutcome};

use super::{message, RouteResult};
use crate::app::App;
use crate::error::ApiError;
use crate::http::{ApiRequest, ApiResponse};

pub const DEFAULT_URL: &str = "https://en.wikipedia.org/wiki/Special:Random";
const SCREENSHOT_NAME: &str = "screenshot.png";

/// What `/browser/kill/{target}` kills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillTarget {
    /// The browser owned by this server
    Session,
    /// Every Chrome process on the host
    Chrome,
    Both,
}

impl FromStr for KillTarget {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "session" => Ok(KillTarget::Session),
            "chrome" => Ok(KillTarget::Chrome),
            "both" => Ok(KillTarget::Both),
            _ => Err(ApiError::invalid(format!(
                "Incorrect path parameter '{s}'! Use one of: session, chrome, both"
            ))),
        }
    }
}

fn kill_message(session: Option<bool>, chrome: Option<bool>) -> String {
    match (session, chrome) {
        (Some(true), None) => "Browser session killed!".into(),
        (Some(false), None) => "No browser session to kill".into(),
        (None, Some(true)) => "All instances of chrome killed!".into(),
        (None, Some(false)) => "No instances of chrome to kill".into(),
        (Some(true), Some(true)) => "Browser session and all instances of chrome killed!".into(),
        (Some(true), Some(false)) => {
            "Browser session killed, but no other instances of chrome to kill!".into()
        }
        (Some(false), Some(true)) => {
            "All instances of chrome killed, but there was no browser session!".into()
        }
        (Some(false), Some(false)) | (None, None) => {
            "No browser session and no instances of chrome to kill!".into()
        }
    }
}

impl App {
    pub(super) async fn open_url(&self, request: &ApiRequest<'_>) -> RouteResult {
        let url = request.param("url").unwrap_or(DEFAULT_URL);
        let title = self
            .control
            .open_url(url)
            .await
            .map_err(|e| ApiError::from_chrome("open URL", e))?;
        message(format!("Successfully launched '{title}' on Chrome browser"))
    }

    pub(super) async fn google_login(&self) -> RouteResult {
        match self.control.google_login().await {
            Ok(LoginOutcome::AlreadyLoggedIn) => message("Already logged into Google Account!"),
            Ok(LoginOutcome::LoggedIn) => message("Successfully logged into Google Account!"),
            Err(e @ ChromeError::MissingCredential(_)) => {
                tracing::error!("Google login failed: {e}");
                message(format!("Failed to log into Google Account! {e}"))
            }
            Err(e) => Err(ApiError::from_chrome("log into Google Account", e)),
        }
    }

    pub(super) async fn screenshot(&self) -> RouteResult {
        let png = self
            .control
            .screenshot()
            .await
            .map_err(|e| ApiError::from_chrome("capture screenshot", e))?;

        let folder = &self.config.files.screenshots_folder;
        let saved = std::fs::create_dir_all(folder)
            .and_then(|_| std::fs::write(folder.join(SCREENSHOT_NAME), &png));
        if let Err(e) = saved {
            tracing::warn!("Could not save screenshot to {}: {e}", folder.display());
        }

        Ok(ApiResponse::attachment("image/png", SCREENSHOT_NAME, png))
    }

    pub(super) async fn kill(&self, target: &str) -> RouteResult {
        let target: KillTarget = target.parse()?;
        let action = "kill processes";

        let session = match target {
            KillTarget::Session | KillTarget::Both => Some(
                self.control
                    .kill_session()
                    .await
                    .map_err(|e| ApiError::from_chrome(action, e))?,
            ),
            KillTarget::Chrome => None,
        };
        let chrome = match target {
            KillTarget::Chrome | KillTarget::Both => Some(
                self.control
                    .kill_host_chrome()
                    .await
                    .map_err(|e| ApiError::from_chrome(action, e))?,
            ),
            KillTarget::Session => None,
        };
        message(kill_message(session, chrome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_kill_target() {
        assert_eq!("Session".parse::<KillTarget>().unwrap(), KillTarget::Session);
        assert_eq!("both".parse::<KillTarget>().unwrap(), KillTarget::Both);
        assert_eq!("chromedriver".parse::<KillTarget>().unwrap_err().status, 422);
    }

    #[test]
    fn test_kill_message() {
        assert_eq!(kill_message(Some(true), None), "Browser session killed!");
        assert_eq!(kill_message(None, Some(false)), "No instances of chrome to kill");
        assert_eq!(
            kill_message(Some(false), Some(false)),
            "No browser session and no instances of chrome to kill!"
        );
    }
}
