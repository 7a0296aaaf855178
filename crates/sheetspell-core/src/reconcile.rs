//! The reconciliation loop: push rows, drain flags, apply overrides

use crate::error::Result;
use crate::observation::FlaggedObservation;
use crate::retry::{CheckPolicy, RetryPolicy};
use crate::row::RowStore;
use crate::surface::{next_flag, TextSurface};
use crate::words::WordLists;

/// Where a batch currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Pushed,
    Checking,
    Reading,
    Applying,
    Drained,
    Reset,
}

/// Counters describing one drained batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Observations read from the surface, repeats included
    pub observations: usize,
    /// Observations applied to the row store
    pub applied: usize,
    /// Observations skipped because they repeated the previous one
    pub repeats: usize,
    /// True when the dismiss control never came back and the loop gave up early
    pub degraded: bool,
    /// Final state of the batch
    pub state: BatchState,
}

impl Default for ReconcileReport {
    fn default() -> Self {
        Self {
            observations: 0,
            applied: 0,
            repeats: 0,
            degraded: false,
            state: BatchState::Idle,
        }
    }
}

impl ReconcileReport {
    fn enter(&mut self, state: BatchState) {
        tracing::trace!(from = ?self.state, to = ?state, "Batch transition");
        self.state = state;
    }
}

/// Run one batch against `surface` and fold the results into `store`.
///
/// The surface is always reset once pushing has started, even when the check
/// fails; the first error wins. Blacklist enforcement runs after a successful
/// drain regardless of how many flags the surface produced.
pub async fn run_batch(
    surface: &mut dyn TextSurface,
    store: &mut RowStore,
    lists: &WordLists,
    policy: &CheckPolicy,
) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();
    tracing::info!(rows = store.len(), "Starting spell-check batch");

    let outcome = drive(surface, store, lists, policy, &mut report).await;
    let reset = surface.reset().await;

    match (outcome, reset) {
        (Err(e), Err(reset_err)) => {
            tracing::warn!("Could not reset remote surface after failure: {reset_err}");
            return Err(e);
        }
        (Err(e), Ok(())) => return Err(e),
        (Ok(()), Err(reset_err)) => return Err(reset_err),
        (Ok(()), Ok(())) => report.enter(BatchState::Reset),
    }

    enforce_blacklist(store, lists);

    tracing::info!(
        observations = report.observations,
        applied = report.applied,
        repeats = report.repeats,
        degraded = report.degraded,
        "Finished spell-check batch"
    );
    Ok(report)
}

async fn drive(
    surface: &mut dyn TextSurface,
    store: &mut RowStore,
    lists: &WordLists,
    policy: &CheckPolicy,
    report: &mut ReconcileReport,
) -> Result<()> {
    surface.push(&store.texts()).await?;
    report.enter(BatchState::Pushed);

    if !surface.begin_check().await? {
        tracing::info!("Spell-check dialog did not open; nothing flagged");
        report.enter(BatchState::Drained);
        return Ok(());
    }

    let mut previous: Option<FlaggedObservation> = None;
    loop {
        report.enter(BatchState::Checking);
        let Some(observation) = next_flag(surface, policy).await? else {
            break;
        };
        report.enter(BatchState::Reading);
        report.observations += 1;

        report.enter(BatchState::Applying);
        if previous.as_ref().is_some_and(|p| p.same_flag(&observation)) {
            report.repeats += 1;
        } else {
            apply_observation(store, lists, &observation);
            report.applied += 1;
        }

        if !dismiss_with_wait(surface, &policy.dismiss).await? {
            tracing::warn!(
                word = %observation.word,
                "Dismiss control did not come back; treating the check as drained"
            );
            report.degraded = true;
            break;
        }
        previous = Some(observation);
    }

    report.enter(BatchState::Drained);
    Ok(())
}

async fn dismiss_with_wait(surface: &mut dyn TextSurface, policy: &RetryPolicy) -> Result<bool> {
    for attempt in policy.attempts() {
        if surface.dismiss_current().await? {
            return Ok(true);
        }
        tracing::debug!(attempt, "Dismiss control not present yet");
        if !policy.is_last(attempt) {
            policy.pause().await;
        }
    }
    Ok(false)
}

/// Fold one observation into every row whose text equals its phrase.
///
/// Whitelisted words are not flagged; the row gets a note instead.
pub fn apply_observation(store: &mut RowStore, lists: &WordLists, observation: &FlaggedObservation) {
    let whitelisted = lists.is_whitelisted(&observation.word);
    let rows = store.matching_mut(&observation.phrase);
    if rows.is_empty() {
        tracing::debug!(phrase = %observation.phrase, "Flagged phrase matches no row");
    }

    for row in rows {
        if whitelisted {
            row.add_note(format!("{} found in whitelist", observation.word));
        } else {
            row.record_correction(&observation.word, &observation.suggestion);
        }
    }
}

/// Flag every blacklisted token of every row.
///
/// Independent of remote results and idempotent. Blacklisted words carry an
/// empty suggestion.
pub fn enforce_blacklist(store: &mut RowStore, lists: &WordLists) {
    if lists.blacklist().is_empty() {
        return;
    }

    for row in store.rows_mut() {
        let words: Vec<String> = lists
            .blacklisted_tokens(row.text())
            .into_iter()
            .map(str::to_string)
            .collect();
        for word in words {
            row.record_correction(&word, "");
            row.add_note(format!("{word} marked using blacklisted words"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;
    use pretty_assertions::assert_eq;

    fn store(rows: &[(&str, &str)]) -> RowStore {
        RowStore::from_rows(rows.iter().map(|(id, text)| Row::new(*id, text))).unwrap()
    }

    #[test]
    fn test_apply_marks_all_rows_with_phrase() {
        let mut store = store(&[("1", "helo"), ("2", "helo"), ("3", "world")]);
        let lists = WordLists::default();

        apply_observation(&mut store, &lists, &FlaggedObservation::new("helo", "helo", "hello"));

        assert_eq!(store.rows()[0].incorrect_words(), ["helo"]);
        assert_eq!(store.rows()[1].suggestions(), ["hello"]);
        assert!(!store.rows()[2].has_corrections());
    }

    #[test]
    fn test_apply_whitelisted_adds_note_once() {
        let mut store = store(&[("1", "Zenith rocks")]);
        let lists = WordLists::new(Vec::<String>::new(), ["Zenith"]);
        let observation = FlaggedObservation::new("Zenith rocks", "Zenith", "Zenit");

        apply_observation(&mut store, &lists, &observation);
        apply_observation(&mut store, &lists, &observation);

        let row = &store.rows()[0];
        assert!(!row.has_corrections());
        assert_eq!(row.description(), ["Zenith found in whitelist"]);
    }

    #[test]
    fn test_blacklist_idempotent() {
        let mut store = store(&[("1", "badword ok badword"), ("2", "fine")]);
        let lists = WordLists::new(["badword"], Vec::<String>::new());

        enforce_blacklist(&mut store, &lists);
        let first: Vec<Row> = store.rows().to_vec();
        enforce_blacklist(&mut store, &lists);

        assert_eq!(store.rows(), first.as_slice());
        assert_eq!(store.rows()[0].incorrect_words(), ["badword"]);
        assert_eq!(
            store.rows()[0].description(),
            ["badword marked using blacklisted words"]
        );
        assert!(!store.rows()[1].has_corrections());
    }

    #[test]
    fn test_blacklist_keeps_pairing_after_remote_flags() {
        let mut store = store(&[("1", "helo badword")]);
        let lists = WordLists::new(["badword"], Vec::<String>::new());

        apply_observation(
            &mut store,
            &lists,
            &FlaggedObservation::new("helo badword", "helo", "hello"),
        );
        enforce_blacklist(&mut store, &lists);

        let row = &store.rows()[0];
        assert_eq!(row.incorrect_words(), ["helo", "badword"]);
        assert_eq!(row.suggestions(), ["hello", ""]);
    }

    #[test]
    fn test_blacklist_does_not_duplicate_remote_flag() {
        let mut store = store(&[("1", "badword")]);
        let lists = WordLists::new(["badword"], Vec::<String>::new());

        apply_observation(&mut store, &lists, &FlaggedObservation::new("badword", "badword", "bad word"));
        enforce_blacklist(&mut store, &lists);

        let row = &store.rows()[0];
        assert_eq!(row.incorrect_words(), ["badword"]);
        assert_eq!(row.suggestions(), ["bad word"]);
        assert_eq!(row.description(), ["badword marked using blacklisted words"]);
    }
}
