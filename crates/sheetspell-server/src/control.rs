//! Admin operations on the browser session

use async_trait::async_trait;
use sheetspell_chrome::{ChromeError, LoginOutcome, SharedSession};

type Result<T> = std::result::Result<T, ChromeError>;

/// Direct control of the browser, outside of spell-check batches
#[async_trait]
pub trait BrowserControl: Send + Sync {
    /// Open `url` and return the page title
    async fn open_url(&self, url: &str) -> Result<String>;

    async fn google_login(&self) -> Result<LoginOutcome>;

    /// PNG of the current page
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Kill the owned browser session. Returns false if none was running.
    async fn kill_session(&self) -> Result<bool>;

    /// Kill every Chrome process on the host. Returns false if none was found.
    async fn kill_host_chrome(&self) -> Result<bool>;
}

/// [`BrowserControl`] over the Chrome session shared with the spell checker
pub struct ChromeControl {
    session: SharedSession,
}

impl ChromeControl {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl BrowserControl for ChromeControl {
    async fn open_url(&self, url: &str) -> Result<String> {
        self.session.lock().await.open_url(url).await
    }

    async fn google_login(&self) -> Result<LoginOutcome> {
        self.session.lock().await.google_login().await
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.session.lock().await.screenshot().await
    }

    async fn kill_session(&self) -> Result<bool> {
        match self.session.try_lock() {
            Ok(mut session) => Ok(session.kill().await),
            Err(_) => {
                // A batch holds the session; killing the processes makes it fail and let go
                tracing::warn!("Browser session is busy with a batch, killing host Chrome instead");
                sheetspell_chrome::kill_host_chrome().await
            }
        }
    }

    async fn kill_host_chrome(&self) -> Result<bool> {
        sheetspell_chrome::kill_host_chrome().await
    }
}
