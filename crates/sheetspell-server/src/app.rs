//! Application wiring: configuration, upload folder, browser and spell checker

use std::sync::Arc;

use sheetspell_chrome::{ChromeSession, GoogleSheetProvider, SheetsClient};
use sheetspell_core::{Row, SpellCheckResponse, SpellChecker, SurfaceProvider, WordLists};
use sheetspell_intake::FileStore;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::control::{BrowserControl, ChromeControl};
use crate::error::ApiError;

/// Everything a request handler needs
pub struct App {
    pub(crate) config: AppConfig,
    pub(crate) files: FileStore,
    pub(crate) control: Arc<dyn BrowserControl>,
    pub(crate) checker: SpellChecker,
}

impl App {
    pub fn new(
        config: AppConfig,
        control: Arc<dyn BrowserControl>,
        provider: Arc<dyn SurfaceProvider>,
        lists: WordLists,
    ) -> Self {
        let files = config.files.store();
        let checker = SpellChecker::new(provider, Arc::new(lists), config.check.policy());
        Self {
            config,
            files,
            control,
            checker,
        }
    }

    /// Wire the app to a lazily launched Chrome session
    pub fn from_config(config: AppConfig) -> Self {
        let session = Arc::new(Mutex::new(ChromeSession::new(config.browser.clone())));
        let provider = GoogleSheetProvider::new(
            Arc::clone(&session),
            SheetsClient::new(config.sheets.clone()),
            config.check.timing(),
        );
        let control = ChromeControl::new(session);
        let lists = config.words.load();
        Self::new(config, Arc::new(control), Arc::new(provider), lists)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    /// Run one spell-check batch and shape the result for callers
    pub async fn spell_check(&self, rows: Vec<Row>) -> Result<SpellCheckResponse, ApiError> {
        let (store, report) = self
            .checker
            .check(rows)
            .await
            .map_err(|e| ApiError::from_check("run spell-check", e))?;
        tracing::debug!(?report, "Spell-check batch report");
        Ok(SpellCheckResponse::from(&store))
    }

    /// Rows of a stored input file
    pub fn read_input(&self, file_name: &str) -> Result<Vec<Row>, ApiError> {
        self.files
            .read(file_name)
            .map_err(|e| ApiError::from_intake("run spell-check", e))
    }
}
