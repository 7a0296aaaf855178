//! Row types

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{CheckError, Result};

/// Replace line breaks inside a cell's text with spaces.
///
/// The remote sheet shows multi-line cells joined by a space in its
/// spell-check phrase, so rows are stored the same way to keep matching exact.
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", " ")
}

/// One input row and the corrections recorded against it.
///
/// `incorrect_words` and `suggestions` are kept in lockstep: the suggestion
/// for `incorrect_words[n]` is always `suggestions[n]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: String,
    text: String,
    incorrect_words: Vec<String>,
    suggestions: Vec<String>,
    description: Vec<String>,
}

impl Row {
    /// Create a new row with no corrections
    pub fn new(id: impl Into<String>, text: impl AsRef<str>) -> Self {
        Self {
            id: id.into(),
            text: normalize_text(text.as_ref()),
            incorrect_words: Vec::new(),
            suggestions: Vec::new(),
            description: Vec::new(),
        }
    }

    /// Caller-provided identifier (unique within a batch)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Text that is pushed to the remote sheet
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Flagged words in first-seen order
    pub fn incorrect_words(&self) -> &[String] {
        &self.incorrect_words
    }

    /// Suggestions paired positionally with [`Row::incorrect_words`]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Notes explaining overrides applied to this row
    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// Check if any word has been flagged
    pub fn has_corrections(&self) -> bool {
        !self.incorrect_words.is_empty()
    }

    /// Check if `word` is already flagged on this row
    pub fn is_flagged(&self, word: &str) -> bool {
        self.incorrect_words.iter().any(|w| w == word)
    }

    /// Record `word` with its `suggestion`.
    ///
    /// Returns `false` (and records nothing) when the word is already flagged.
    pub fn record_correction(&mut self, word: &str, suggestion: &str) -> bool {
        if self.is_flagged(word) {
            return false;
        }
        self.incorrect_words.push(word.to_string());
        self.suggestions.push(suggestion.to_string());
        true
    }

    /// Append a description note unless an identical note is already present
    pub fn add_note(&mut self, note: impl Into<String>) -> bool {
        let note = note.into();
        if self.description.contains(&note) {
            return false;
        }
        self.description.push(note);
        true
    }

    /// Whitespace-separated tokens of the row text
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

/// Ordered collection of the rows in one batch
#[derive(Debug, Default)]
pub struct RowStore {
    rows: Vec<Row>,
    by_id: HashMap<String, usize>,
    /// Row indices per text, ascending
    by_text: HashMap<String, Vec<usize>>,
}

impl RowStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from rows, rejecting duplicate identifiers
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Result<Self> {
        let mut store = Self::new();
        for row in rows {
            store.push(row)?;
        }
        Ok(store)
    }

    /// Append a row
    pub fn push(&mut self, row: Row) -> Result<()> {
        let idx = self.rows.len();
        match self.by_id.entry(row.id.clone()) {
            Entry::Occupied(_) => return Err(CheckError::DuplicateRow(row.id)),
            Entry::Vacant(slot) => {
                slot.insert(idx);
            }
        }
        self.by_text.entry(row.text.clone()).or_default().push(idx);
        self.rows.push(row);
        Ok(())
    }

    /// All rows in input order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Mutable access to all rows in input order
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the store holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by its identifier
    pub fn get(&self, id: &str) -> Option<&Row> {
        self.by_id.get(id).map(|&idx| &self.rows[idx])
    }

    /// Texts in input order, as they are pushed to the remote sheet
    pub fn texts(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.text.as_str()).collect()
    }

    /// Every row whose text is exactly `phrase`
    pub fn matching_mut(&mut self, phrase: &str) -> Vec<&mut Row> {
        let Some(indices) = self.by_text.get(phrase) else {
            return Vec::new();
        };

        let mut matched = Vec::with_capacity(indices.len());
        let mut rest: &mut [Row] = &mut self.rows;
        let mut offset = 0;
        for &idx in indices {
            let (_, tail) = std::mem::take(&mut rest).split_at_mut(idx - offset);
            let Some((row, tail)) = tail.split_first_mut() else {
                break;
            };
            matched.push(row);
            rest = tail;
            offset = idx + 1;
        }
        matched
    }

    /// Rows that ended up with at least one flagged word
    pub fn corrected(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.has_corrections())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_row_normalizes_line_breaks() {
        let row = Row::new("1", "first line\r\nsecond line");
        assert_eq!(row.text(), "first line second line");
        assert!(!row.has_corrections());
    }

    #[test]
    fn test_record_correction_keeps_pairing() {
        let mut row = Row::new("1", "helo wrld");

        assert!(row.record_correction("helo", "hello"));
        assert!(row.record_correction("wrld", "world"));
        assert!(!row.record_correction("helo", "halo"));

        assert_eq!(row.incorrect_words(), ["helo", "wrld"]);
        assert_eq!(row.suggestions(), ["hello", "world"]);
    }

    #[test]
    fn test_add_note_dedupes() {
        let mut row = Row::new("1", "x");
        assert!(row.add_note("a note"));
        assert!(!row.add_note("a note"));
        assert_eq!(row.description(), ["a note"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = RowStore::from_rows(vec![Row::new("1", "a"), Row::new("1", "b")]).unwrap_err();
        assert!(matches!(err, CheckError::DuplicateRow(id) if id == "1"));
    }

    #[test]
    fn test_matching_returns_all_rows_with_same_text() {
        let mut store = RowStore::from_rows(vec![
            Row::new("1", "same text"),
            Row::new("2", "other"),
            Row::new("3", "same text"),
        ])
        .unwrap();

        let ids: Vec<String> = store
            .matching_mut("same text")
            .into_iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, vec!["1".to_string(), "3".to_string()]);
        assert!(store.matching_mut("missing").is_empty());
    }

    #[test]
    fn test_texts_in_input_order() {
        let store = RowStore::from_rows(vec![Row::new("b", "two"), Row::new("a", "one")]).unwrap();
        assert_eq!(store.texts(), vec!["two", "one"]);
        assert_eq!(store.get("a").map(Row::text), Some("one"));
    }

    #[test]
    fn test_large_store_builds_in_linear_time() {
        let start = std::time::Instant::now();
        let mut store = RowStore::from_rows((0..400_000).map(|i| Row::new(i.to_string(), "w"))).unwrap();
        assert!(
            start.elapsed() < std::time::Duration::from_secs(5),
            "building 400k rows took {:?}",
            start.elapsed()
        );

        assert_eq!(store.len(), 400_000);
        assert_eq!(store.get("399999").map(Row::text), Some("w"));
        assert!(store.get("400000").is_none());
        assert_eq!(store.matching_mut("w").len(), 400_000);
    }

    #[test]
    fn test_matching_interleaved_texts() {
        let mut store = RowStore::from_rows(vec![
            Row::new("1", "a"),
            Row::new("2", "b"),
            Row::new("3", "b"),
            Row::new("4", "a"),
            Row::new("5", "b"),
        ])
        .unwrap();

        for row in store.matching_mut("b") {
            row.record_correction("b", "be");
        }
        let flagged: Vec<&str> = store.corrected().map(Row::id).collect();
        assert_eq!(flagged, vec!["2", "3", "5"]);

        let ids: Vec<String> = store
            .matching_mut("a")
            .into_iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, vec!["1".to_string(), "4".to_string()]);
    }
}
