//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SHEETSPELL_*` prefix, `__` as separator)
//! 2. Project-level `./sheetspell.toml`
//! 3. User-level `~/.config/sheetspell/config.toml`
//! 4. Built-in defaults
//!
//! `SHEETSPELL_SERVER__PORT` maps to `server.port`,
//! `SHEETSPELL_SHEETS__ACCESS_TOKEN` to `sheets.access_token`, and so on.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use sheetspell_chrome::{BrowserSettings, SheetsSettings, SurfaceTiming};
use sheetspell_core::{CheckPolicy, RetryPolicy, WordLists};
use sheetspell_intake::FileStore;

use crate::error::ServerError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            title: "Google Spell-Check App".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Run spell checking by loading words into Google Sheets".to_string(),
        }
    }
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileSettings {
    pub upload_folder: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub screenshots_folder: PathBuf,
    /// Chunk size used when streaming uploads to disk
    pub write_buffer_size: usize,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            upload_folder: PathBuf::from("resources/uploads"),
            allowed_extensions: ["csv", "txt", "xls", "xlsx"].map(String::from).to_vec(),
            screenshots_folder: PathBuf::from("screenshots"),
            write_buffer_size: 16_384,
        }
    }
}

impl FileSettings {
    pub fn store(&self) -> FileStore {
        FileStore::new(
            &self.upload_folder,
            self.allowed_extensions.clone(),
            self.write_buffer_size,
        )
    }
}

/// Timing and retry bounds for the spell-check dialog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckSettings {
    pub trigger_timeout_ms: u64,
    pub poll_delay_ms: u64,
    pub element_poll_ms: u64,
    pub stale_read_attempts: u32,
    pub empty_read_attempts: u32,
    pub dismiss_attempts: u32,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            trigger_timeout_ms: 15_000,
            poll_delay_ms: 1_000,
            element_poll_ms: 250,
            stale_read_attempts: 3,
            empty_read_attempts: 30,
            dismiss_attempts: 30,
        }
    }
}

impl CheckSettings {
    pub fn policy(&self) -> CheckPolicy {
        let poll = Duration::from_millis(self.poll_delay_ms);
        CheckPolicy {
            stale_read: RetryPolicy::immediate(self.stale_read_attempts),
            empty_read: RetryPolicy::new(self.empty_read_attempts, poll),
            dismiss: RetryPolicy::new(self.dismiss_attempts, poll),
        }
    }

    pub fn timing(&self) -> SurfaceTiming {
        SurfaceTiming {
            trigger_timeout: Duration::from_millis(self.trigger_timeout_ms),
            poll_interval: Duration::from_millis(self.element_poll_ms.max(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WordListSettings {
    pub blacklist_path: PathBuf,
    pub whitelist_path: PathBuf,
}

impl Default for WordListSettings {
    fn default() -> Self {
        Self {
            blacklist_path: PathBuf::from("resources/word_list/blacklist_words.txt"),
            whitelist_path: PathBuf::from("resources/word_list/whitelist_words.txt"),
        }
    }
}

impl WordListSettings {
    /// Missing files yield empty lists
    pub fn load(&self) -> WordLists {
        WordLists::from_files(&self.blacklist_path, &self.whitelist_path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub files: FileSettings,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub sheets: SheetsSettings,
    #[serde(default)]
    pub check: CheckSettings,
    #[serde(default)]
    pub words: WordListSettings,
}

impl AppConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT read `.env`; use [`AppConfig::load_with_dotenv`] for that.
    pub fn load() -> Result<Self, ServerError> {
        Ok(Self::figment().extract()?)
    }

    /// Load `.env` from the current directory, then all other sources
    pub fn load_with_dotenv() -> Result<Self, ServerError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Could not read .env: {e}");
            }
        }
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from("sheetspell.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("SHEETSPELL_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sheetspell").join("config.toml"))
    }
}
