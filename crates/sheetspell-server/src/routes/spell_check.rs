//! `/spell-check` endpoints

use sheetspell_core::Row;

use super::{required, RouteResult};
use crate::app::App;
use crate::http::{ApiRequest, ApiResponse};

/// One row per word, identified by its position
fn word_rows<'w>(words: impl IntoIterator<Item = &'w str>) -> Vec<Row> {
    words
        .into_iter()
        .enumerate()
        .map(|(idx, word)| Row::new(idx.to_string(), word))
        .collect()
}

impl App {
    pub(super) async fn check_word(&self, word: &str) -> RouteResult {
        let response = self.spell_check(word_rows([word])).await?;
        Ok(ApiResponse::ok(&response))
    }

    pub(super) async fn check_word_list(&self, request: &ApiRequest<'_>) -> RouteResult {
        let rows = word_rows(request.params("word_list"));
        let response = self.spell_check(rows).await?;
        Ok(ApiResponse::ok(&response))
    }

    pub(super) async fn check_input_file(&self, request: &ApiRequest<'_>) -> RouteResult {
        let rows = self.read_input(required(request, "file_name")?)?;
        let response = self.spell_check(rows).await?;
        Ok(ApiResponse::ok(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_word_rows_ids_by_position() {
        let rows = word_rows(["helo", "wrld"]);
        assert_eq!(rows[0].id(), "0");
        assert_eq!(rows[1].id(), "1");
        assert_eq!(rows[1].text(), "wrld");
    }
}
