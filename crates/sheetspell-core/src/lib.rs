//! # sheetspell-core
//!
//! Core data structures and the reconciliation loop for sheetspell.
//!
//! This crate knows nothing about browsers or HTTP. It provides:
//! - [`Row`] and [`RowStore`] - input rows and the corrections discovered for them
//! - [`WordLists`] - the static blacklist / whitelist overrides
//! - [`TextSurface`] - the seam to a remote editable surface with a spell checker
//! - [`run_batch`] - pushes rows, drains flagged observations and applies them
//! - [`SpellCheckResponse`] - the wire shape returned to API callers
//!
//! ## Example
//!
//! ```rust
//! use sheetspell_core::{Row, RowStore, WordLists};
//!
//! let mut store = RowStore::from_rows(vec![Row::new("1", "badword ok")]).unwrap();
//! let lists = WordLists::new(["badword"], Vec::<String>::new());
//!
//! sheetspell_core::enforce_blacklist(&mut store, &lists);
//! assert_eq!(store.rows()[0].incorrect_words(), ["badword"]);
//! ```

pub mod error;
pub mod observation;
pub mod page;
pub mod reconcile;
pub mod report;
pub mod retry;
pub mod row;
#[cfg(any(test, feature = "test-support"))]
pub mod scripted;
pub mod service;
pub mod surface;
pub mod words;

pub use error::{CheckError, Result};
pub use observation::FlaggedObservation;
pub use page::{paginate, Page};
pub use reconcile::{apply_observation, enforce_blacklist, run_batch, BatchState, ReconcileReport};
pub use report::{Correction, SpellCheckResponse};
pub use retry::{CheckPolicy, RetryPolicy};
pub use row::{normalize_text, Row, RowStore};
pub use service::{SpellChecker, SurfaceProvider};
pub use surface::{next_flag, FlagField, SurfaceRead, TextSurface};
pub use words::WordLists;

/// Default number of rows written to one column of the remote sheet.
pub const DEFAULT_PAGE_SIZE: usize = 191_000;

/// Separator used when list-valued fields are flattened for API callers.
pub const LIST_SEPARATOR: &str = ", ";
