//! The seam between the reconciliation loop and a remote spell-checking surface

use async_trait::async_trait;

use crate::error::{CheckError, Result};
use crate::observation::FlaggedObservation;
use crate::retry::{CheckPolicy, RetryPolicy};

/// A field of the surface's misspelling UI that can be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagField {
    /// Full content of the cell under review
    Phrase,
    /// The flagged token
    Word,
    /// The first suggested replacement
    Suggestion,
}

/// Outcome of reading one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceRead {
    /// The element was found; its text may be empty
    Text(String),
    /// The element disappeared between lookup and read
    Stale,
}

/// A remote editable surface with a built-in spell checker.
///
/// Implementations do the raw UI work; bounded retries around them live in
/// [`next_flag`] and the reconciliation loop so they can be driven by a
/// [`CheckPolicy`].
#[async_trait]
pub trait TextSurface: Send {
    /// Write every text to the surface, one row per text, in order
    async fn push(&mut self, texts: &[&str]) -> Result<()>;

    /// Open the spell-check facility.
    ///
    /// Returns `Ok(false)` when the spell-check dialog never appeared, in
    /// which case there is nothing to read.
    async fn begin_check(&mut self) -> Result<bool>;

    /// Check if the surface reports that no misspellings remain
    async fn check_exhausted(&mut self) -> Result<bool>;

    /// Read one field of the currently flagged misspelling
    async fn read(&mut self, field: FlagField) -> Result<SurfaceRead>;

    /// Advance past the current flag.
    ///
    /// Returns `Ok(false)` when the dismiss control is not present right now.
    async fn dismiss_current(&mut self) -> Result<bool>;

    /// Clear everything that was pushed
    async fn reset(&mut self) -> Result<()>;
}

/// Read the next flagged misspelling, or `None` once the surface is exhausted.
///
/// Stale phrase / word reads are retried per `policy.stale_read` and escalate
/// to [`CheckError::SurfaceInteraction`]; a suggestion that stays stale is
/// reported as empty. A flagged word that reads empty is re-read after
/// `policy.empty_read.backoff` until the policy runs out.
pub async fn next_flag(
    surface: &mut dyn TextSurface,
    policy: &CheckPolicy,
) -> Result<Option<FlaggedObservation>> {
    for empty_attempt in policy.empty_read.attempts() {
        if surface.check_exhausted().await? {
            return Ok(None);
        }

        let phrase = read_field(surface, FlagField::Phrase, &policy.stale_read)
            .await?
            .ok_or_else(|| stale_error(FlagField::Phrase, &policy.stale_read))?;
        let word = read_field(surface, FlagField::Word, &policy.stale_read)
            .await?
            .ok_or_else(|| stale_error(FlagField::Word, &policy.stale_read))?;
        let suggestion = read_field(surface, FlagField::Suggestion, &policy.stale_read)
            .await?
            .unwrap_or_default();

        if !word.is_empty() {
            return Ok(Some(FlaggedObservation {
                phrase,
                word,
                suggestion,
            }));
        }

        tracing::debug!(attempt = empty_attempt, "Flagged word read empty, polling again");
        if !policy.empty_read.is_last(empty_attempt) {
            policy.empty_read.pause().await;
        }
    }

    Err(CheckError::interaction(format!(
        "flagged word stayed empty after {} reads",
        policy.empty_read.max_attempts.max(1)
    )))
}

async fn read_field(
    surface: &mut dyn TextSurface,
    field: FlagField,
    policy: &RetryPolicy,
) -> Result<Option<String>> {
    for attempt in policy.attempts() {
        match surface.read(field).await? {
            SurfaceRead::Text(text) => return Ok(Some(text)),
            SurfaceRead::Stale => {
                tracing::debug!(?field, attempt, "Stale element while reading");
                if !policy.is_last(attempt) {
                    policy.pause().await;
                }
            }
        }
    }
    Ok(None)
}

fn stale_error(field: FlagField, policy: &RetryPolicy) -> CheckError {
    CheckError::interaction(format!(
        "{field:?} element stayed stale after {} reads",
        policy.max_attempts.max(1)
    ))
}
