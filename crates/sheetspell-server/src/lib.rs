//! # sheetspell-server
//!
//! HTTP API in front of the spell checker.
//!
//! | route | purpose |
//! |---|---|
//! | `GET /` | service title, version and description |
//! | `GET /browser/open-url?url=` | open a URL in the managed Chrome |
//! | `GET /browser/google-login` | sign into the Google account |
//! | `GET /browser/screenshot` | PNG of the current page |
//! | `GET /browser/kill/{session,chrome,both}` | kill the session and/or host Chrome |
//! | `GET /file-input/?file_name=` | list files or check one |
//! | `POST /file-input/upload?file_name=` | stream the request body into the upload folder |
//! | `DELETE /file-input/?confirmation_flag=&file_name=` | delete one or all files |
//! | `GET /spell-check/words/{word}` | check one word |
//! | `GET /spell-check/words?word_list=` | check several words |
//! | `GET /spell-check/file?file_name=` | check an uploaded file |
//!
//! Handlers are transport independent ([`App::handle`]); [`serve`] puts
//! them behind `tiny_http`.

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod http;
mod routes;
pub mod server;

pub use app::App;
pub use config::AppConfig;
pub use control::{BrowserControl, ChromeControl};
pub use error::{ApiError, ServerError};
pub use http::{ApiRequest, ApiResponse, Method};
pub use server::serve;
