//! Response shape returned to API callers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::row::{Row, RowStore};
use crate::LIST_SEPARATOR;

/// Corrections for one input text, flattened to delimited strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub incorrect_word: String,
    pub suggested_word: String,
    pub description: String,
}

impl From<&Row> for Correction {
    fn from(row: &Row) -> Self {
        Self {
            incorrect_word: row.incorrect_words().join(LIST_SEPARATOR),
            suggested_word: row.suggestions().join(LIST_SEPARATOR),
            description: row.description().join(LIST_SEPARATOR),
        }
    }
}

/// Spell-check results keyed by original text.
///
/// Only rows with at least one incorrect word are included. Rows sharing the
/// same text collapse into one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellCheckResponse {
    pub incorrect_words: BTreeMap<String, Correction>,
}

impl From<&RowStore> for SpellCheckResponse {
    fn from(store: &RowStore) -> Self {
        let incorrect_words = store
            .corrected()
            .map(|row| (row.text().to_string(), Correction::from(row)))
            .collect();
        Self { incorrect_words }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_only_corrected_rows_included() {
        let mut flagged = Row::new("1", "helo wrld");
        flagged.record_correction("helo", "hello");
        flagged.record_correction("wrld", "world");
        let store = RowStore::from_rows(vec![flagged, Row::new("2", "fine")]).unwrap();

        let response = SpellCheckResponse::from(&store);

        assert_eq!(response.incorrect_words.len(), 1);
        assert_eq!(
            response.incorrect_words["helo wrld"],
            Correction {
                incorrect_word: "helo, wrld".into(),
                suggested_word: "hello, world".into(),
                description: String::new(),
            }
        );
    }

    #[test]
    fn test_serialized_shape() {
        let mut row = Row::new("1", "helo");
        row.record_correction("helo", "hello");
        let store = RowStore::from_rows(vec![row]).unwrap();

        let json = serde_json::to_value(SpellCheckResponse::from(&store)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "incorrect_words": {
                    "helo": {
                        "incorrect_word": "helo",
                        "suggested_word": "hello",
                        "description": ""
                    }
                }
            })
        );
    }
}
