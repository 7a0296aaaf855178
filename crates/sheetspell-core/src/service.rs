//! Batch admission: one batch per remote session at a time

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{CheckError, Result};
use crate::reconcile::{run_batch, ReconcileReport};
use crate::retry::CheckPolicy;
use crate::row::{Row, RowStore};
use crate::surface::TextSurface;
use crate::words::WordLists;

/// Hands out a ready-to-use surface bound to the shared remote session
#[async_trait]
pub trait SurfaceProvider: Send + Sync {
    async fn checkout(&self) -> Result<Box<dyn TextSurface>>;
}

/// Runs spell-check batches, rejecting a new batch while one is in flight.
pub struct SpellChecker {
    provider: Arc<dyn SurfaceProvider>,
    lists: Arc<WordLists>,
    policy: CheckPolicy,
    in_flight: Mutex<()>,
}

impl SpellChecker {
    pub fn new(provider: Arc<dyn SurfaceProvider>, lists: Arc<WordLists>, policy: CheckPolicy) -> Self {
        Self {
            provider,
            lists,
            policy,
            in_flight: Mutex::new(()),
        }
    }

    pub fn word_lists(&self) -> &WordLists {
        &self.lists
    }

    /// Check whether a batch is currently running
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Spell-check `rows` as one batch.
    ///
    /// Fails fast with [`CheckError::Busy`] if another batch owns the session.
    pub async fn check(&self, rows: Vec<Row>) -> Result<(RowStore, ReconcileReport)> {
        let _guard = self.in_flight.try_lock().map_err(|_| CheckError::Busy)?;

        let mut store = RowStore::from_rows(rows)?;
        let mut surface = self.provider.checkout().await?;
        let report = run_batch(surface.as_mut(), &mut store, &self.lists, &self.policy).await?;
        Ok((store, report))
    }
}
