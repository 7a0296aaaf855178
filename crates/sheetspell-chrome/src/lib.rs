//! Chrome automation of the Google Sheets spell checker.
//!
//! Rows are written to the input worksheet through the Sheets values API and
//! the editor's built-in spell-check dialog is driven over the Chrome
//! DevTools Protocol.
//!
//! # Architecture
//!
//! ```text
//! SpellChecker (sheetspell-core)
//!     └── GoogleSheetProvider (this crate)
//!           ├── ChromeSession ── chromiumoxide ── Chrome (one tab, one Google login)
//!           └── SheetsClient  ── reqwest ── sheets.googleapis.com
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sheetspell_chrome::{BrowserSettings, ChromeSession, GoogleSheetProvider, SheetsClient, SheetsSettings, SurfaceTiming};
//! use sheetspell_core::{CheckPolicy, Row, SpellChecker, WordLists};
//! use tokio::sync::Mutex;
//!
//! # async fn example() -> sheetspell_core::Result<()> {
//! let session = Arc::new(Mutex::new(ChromeSession::new(BrowserSettings::default())));
//! let sheets = SheetsClient::new(SheetsSettings::default());
//! let provider = GoogleSheetProvider::new(session, sheets, SurfaceTiming::default());
//!
//! let checker = SpellChecker::new(Arc::new(provider), Arc::new(WordLists::default()), CheckPolicy::default());
//! let (rows, _report) = checker.check(vec![Row::new("1", "helo wrld")]).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod input;
pub mod session;
pub mod sheets;
pub mod surface;

pub use config::{BrowserSettings, SheetsSettings, SurfaceTiming};
pub use error::ChromeError;
pub use session::{kill_host_chrome, ChromeSession, GoogleCredentials, LoginOutcome};
pub use sheets::SheetsClient;
pub use surface::{GoogleSheetProvider, GoogleSheetSurface, SharedSession};
