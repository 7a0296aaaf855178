//! Browser and spreadsheet settings

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Least likely to raise a captcha during automated sign-in
pub const DEFAULT_LOGIN_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth/oauthchooseaccount?redirect_uri=https%3A%2F%2Fdevelopers.google.com%2Foauthplayground&prompt=consent&response_type=code&client_id=407408718192.apps.googleusercontent.com&scope=email&access_type=offline&flowName=GeneralOAuthFlow";

/// User agent sent in headless mode so Google serves the desktop UI
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/87.0.4280.88 Safari/537.36";

/// How Chrome is launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub headless: bool,
    /// `host:port` of an HTTP proxy
    pub proxy: Option<String>,
    /// Path to the Chrome binary. If None, chromiumoxide searches the usual places.
    pub chrome_executable: Option<PathBuf>,
    pub login_url: String,
    /// Seconds to wait for Chrome to start or answer
    pub launch_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: false,
            proxy: None,
            chrome_executable: None,
            login_url: DEFAULT_LOGIN_URL.to_string(),
            launch_timeout_secs: 30,
        }
    }
}

impl BrowserSettings {
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_secs(self.launch_timeout_secs.max(1))
    }
}

/// Which spreadsheet receives the rows, and how to reach its values API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsSettings {
    pub spreadsheet_id: String,
    pub sheet_title: String,
    /// Numeric id of the worksheet (the `gid` in its URL)
    pub sheet_gid: i64,
    /// OAuth bearer token with the spreadsheets scope
    pub access_token: Option<String>,
    /// Rows written per column
    pub page_size: usize,
    pub api_base: String,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            sheet_title: "Input Sheet".to_string(),
            sheet_gid: 0,
            access_token: None,
            page_size: sheetspell_core::DEFAULT_PAGE_SIZE,
            api_base: "https://sheets.googleapis.com/v4".to_string(),
        }
    }
}

impl SheetsSettings {
    /// URL of the sheet in the Google Sheets editor
    pub fn edit_url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}/edit#gid={}",
            self.spreadsheet_id, self.sheet_gid
        )
    }
}

/// Timing of the spell-check dialog automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceTiming {
    /// How long the editor and the spell-check dialog may take to appear
    pub trigger_timeout: Duration,
    /// Delay between polls while waiting for an element
    pub poll_interval: Duration,
}

impl Default for SurfaceTiming {
    fn default() -> Self {
        Self {
            trigger_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(250),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_edit_url() {
        let sheets = SheetsSettings {
            spreadsheet_id: "abc123".into(),
            sheet_gid: 42,
            ..Default::default()
        };
        assert_eq!(
            sheets.edit_url(),
            "https://docs.google.com/spreadsheets/d/abc123/edit#gid=42"
        );
    }

    #[test]
    fn test_defaults() {
        let sheets = SheetsSettings::default();
        assert_eq!(sheets.page_size, 191_000);
        assert_eq!(sheets.sheet_title, "Input Sheet");
        assert!(!BrowserSettings::default().headless);
    }
}
