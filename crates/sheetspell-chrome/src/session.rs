//! Chrome session: owns the browser process and its single working tab.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::config::{BrowserSettings, DESKTOP_USER_AGENT};
use crate::dom;
use crate::error::{ChromeError, Result};

pub const GOOGLE_USERNAME_ENV: &str = "GOOGLE_USERNAME_ENV";
pub const GOOGLE_PASSWORD_ENV: &str = "GOOGLE_PASSWORD_ENV";

const INBOX_URL: &str = "https://mail.google.com";
const LOGIN_FIELD_TIMEOUT: Duration = Duration::from_secs(15);
const LOGIN_POLL: Duration = Duration::from_millis(250);

/// Google account used for the browser login
#[derive(Clone)]
pub struct GoogleCredentials {
    pub username: String,
    pub password: String,
}

impl GoogleCredentials {
    /// Read the account from `GOOGLE_USERNAME_ENV` / `GOOGLE_PASSWORD_ENV`
    pub fn from_env() -> Result<Self> {
        let username = std::env::var(GOOGLE_USERNAME_ENV)
            .map_err(|_| ChromeError::MissingCredential(GOOGLE_USERNAME_ENV))?;
        let password = std::env::var(GOOGLE_PASSWORD_ENV)
            .map_err(|_| ChromeError::MissingCredential(GOOGLE_PASSWORD_ENV))?;
        Ok(Self { username, password })
    }
}

impl std::fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// How a login request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The inbox was reachable without signing in
    AlreadyLoggedIn,
    LoggedIn,
}

/// Extra Chrome switches for a session
pub fn chrome_args(settings: &BrowserSettings) -> Vec<String> {
    let mut args: Vec<String> = [
        "--start-maximized",
        "--incognito",
        "--disable-extensions",
        "--disable-popup-blocking",
        "--disable-notifications",
        "--ignore-certificate-errors",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    if let Some(proxy) = settings.proxy.as_deref().filter(|p| !p.is_empty()) {
        args.push(format!("--proxy-server=http://{proxy}"));
    }
    if settings.headless {
        args.push(format!("--user-agent={DESKTOP_USER_AGENT}"));
    }
    args
}

struct Running {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl Running {
    async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .viewport(None)
            .launch_timeout(settings.launch_timeout())
            .request_timeout(settings.launch_timeout())
            .args(chrome_args(settings));
        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(ChromeError::Launch)?;

        tracing::info!(headless = settings.headless, "Starting Chrome");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ChromeError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("DevTools handler: {e}");
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    async fn is_reachable(&self, timeout: Duration) -> bool {
        matches!(
            tokio::time::timeout(timeout, self.page.get_title()).await,
            Ok(Ok(_))
        )
    }

    async fn kill(mut self) {
        if let Some(Err(e)) = self.browser.kill().await {
            tracing::warn!("Could not kill Chrome: {e}");
        }
        self.handler.abort();
    }
}

/// A lazily launched Chrome with one tab.
///
/// The browser starts on first use and is relaunched if it stops answering.
pub struct ChromeSession {
    settings: BrowserSettings,
    running: Option<Running>,
    logged_in: bool,
}

impl ChromeSession {
    pub fn new(settings: BrowserSettings) -> Self {
        Self {
            settings,
            running: None,
            logged_in: false,
        }
    }

    pub fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// The working tab, launching or relaunching Chrome as needed
    pub async fn page(&mut self) -> Result<&Page> {
        let reachable = match &self.running {
            Some(running) => Some(running.is_reachable(self.settings.launch_timeout()).await),
            None => None,
        };
        if reachable == Some(false) {
            tracing::warn!("Chrome stopped responding, relaunching");
            if let Some(running) = self.running.take() {
                running.kill().await;
            }
            self.logged_in = false;
        }

        if self.running.is_none() {
            self.running = Some(Running::launch(&self.settings).await?);
            self.logged_in = false;
        }

        self.running
            .as_ref()
            .map(|r| &r.page)
            .ok_or_else(|| ChromeError::Launch("session is not running".into()))
    }

    /// Navigate to `url` and return the resulting page title
    pub async fn open_url(&mut self, url: &str) -> Result<String> {
        let page = self.page().await?;
        page.goto(url).await?;
        let title = page.get_title().await?.unwrap_or_default();
        tracing::info!(%url, %title, "Opened URL");
        Ok(title)
    }

    /// Sign into the Google account unless the inbox is already reachable
    pub async fn google_login(&mut self) -> Result<LoginOutcome> {
        let login_url = self.settings.login_url.clone();
        let page = self.page().await?;

        page.goto(INBOX_URL).await?;
        let title = page.get_title().await?.unwrap_or_default();
        if title.to_lowercase().contains("inbox") {
            tracing::info!("Already logged into Google account");
            self.logged_in = true;
            return Ok(LoginOutcome::AlreadyLoggedIn);
        }

        let credentials = GoogleCredentials::from_env()?;
        page.goto(login_url).await?;

        dom::wait_for(page, "#identifierId", LOGIN_FIELD_TIMEOUT, LOGIN_POLL)
            .await?
            .click()
            .await?
            .type_str(&credentials.username)
            .await?;
        page.find_element("#identifierNext").await?.click().await?;

        dom::wait_for(page, "input[name=password]", LOGIN_FIELD_TIMEOUT, LOGIN_POLL)
            .await?
            .click()
            .await?
            .type_str(&credentials.password)
            .await?;
        page.find_element("#passwordNext").await?.click().await?;

        tracing::info!(username = %credentials.username, "Logged into Google account");
        self.logged_in = true;
        Ok(LoginOutcome::LoggedIn)
    }

    /// Log in first if this session has not done so yet
    pub async fn ensure_logged_in(&mut self) -> Result<()> {
        // Relaunching drops the login, so touch the page before checking the flag
        self.page().await?;
        if !self.logged_in {
            self.google_login().await?;
        }
        Ok(())
    }

    /// PNG of the current tab
    pub async fn screenshot(&mut self) -> Result<Vec<u8>> {
        let page = self.page().await?;
        let png = page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build(),
            )
            .await?;
        Ok(png)
    }

    /// Kill the owned browser process. Returns false if none was running.
    pub async fn kill(&mut self) -> bool {
        self.logged_in = false;
        match self.running.take() {
            Some(running) => {
                running.kill().await;
                tracing::info!("Killed browser session");
                true
            }
            None => false,
        }
    }
}

/// Kill every Chrome process on this host, owned or not.
///
/// Returns true if anything was killed.
pub async fn kill_host_chrome() -> Result<bool> {
    let mut killed = false;
    if cfg!(windows) {
        let status = Command::new("taskkill")
            .args(["/F", "/IM", "chrome.exe"])
            .status()
            .await?;
        killed = status.success();
    } else {
        for name in ["chrome", "chromium", "chromium-browser"] {
            let status = Command::new("pkill").args(["-x", name]).status().await?;
            killed |= status.success();
        }
    }
    tracing::info!(killed, "Killed host Chrome processes");
    Ok(killed)
}
