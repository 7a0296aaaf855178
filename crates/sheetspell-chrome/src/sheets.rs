//! Google Sheets values API: filling and clearing the input worksheet

use serde_json::{json, Value};
use sheetspell_core::{paginate, Page};

use crate::config::SheetsSettings;
use crate::error::{ChromeError, Result};

/// Extra rows kept below the last page so the grid never runs short
const ROW_HEADROOM: usize = 1_000;

/// Columns a new worksheet starts with
const DEFAULT_COLUMN_COUNT: usize = 26;

/// Column letters for a 0-based column index (0 = A, 26 = AA)
pub fn column_letter(mut column: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (column % 26) as u8);
        if column < 26 {
            break;
        }
        column = column / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// A1 range anchoring a page at row 1 of its column
pub fn page_range(sheet_title: &str, column: usize) -> String {
    format!("'{}'!{}1", sheet_title.replace('\'', "''"), column_letter(column))
}

/// Request body writing one page as a single column
pub fn page_body(sheet_title: &str, page: &Page<'_>) -> Value {
    json!({
        "range": page_range(sheet_title, page.column),
        "majorDimension": "COLUMNS",
        "values": [page.texts],
    })
}

/// Request body growing the grid to hold `rows` x `columns`
pub fn resize_body(sheet_gid: i64, rows: usize, columns: usize) -> Value {
    json!({
        "requests": [{
            "updateSheetProperties": {
                "properties": {
                    "sheetId": sheet_gid,
                    "gridProperties": { "rowCount": rows, "columnCount": columns }
                },
                "fields": "gridProperties(rowCount,columnCount)"
            }
        }]
    })
}

/// Thin client over the values endpoints of one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    settings: SheetsSettings,
}

impl SheetsClient {
    pub fn new(settings: SheetsSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &SheetsSettings {
        &self.settings
    }

    fn token(&self) -> Result<&str> {
        self.settings
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ChromeError::MissingAccessToken)
    }

    fn spreadsheet_url(&self) -> String {
        format!(
            "{}/spreadsheets/{}",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.spreadsheet_id
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let response = request.bearer_auth(self.token()?).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ChromeError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Remove every value from the worksheet
    pub async fn clear(&self) -> Result<()> {
        let range = urlencoding::encode(&self.settings.sheet_title).into_owned();
        let url = format!("{}/values/{range}:clear", self.spreadsheet_url());
        self.send(self.http.post(url).json(&json!({}))).await?;
        tracing::debug!(sheet = %self.settings.sheet_title, "Cleared worksheet");
        Ok(())
    }

    /// Grow the grid so `pages` columns of `page_size` rows fit
    pub async fn resize_for(&self, pages: usize) -> Result<()> {
        let rows = self.settings.page_size.max(1) + ROW_HEADROOM;
        let columns = pages.max(DEFAULT_COLUMN_COUNT);
        let url = format!("{}:batchUpdate", self.spreadsheet_url());
        let body = resize_body(self.settings.sheet_gid, rows, columns);
        self.send(self.http.post(url).json(&body)).await
    }

    /// Write one page into its column
    pub async fn write_page(&self, page: &Page<'_>) -> Result<()> {
        let range = page_range(&self.settings.sheet_title, page.column);
        let url = format!(
            "{}/values/{}?valueInputOption=RAW",
            self.spreadsheet_url(),
            urlencoding::encode(&range)
        );
        let body = page_body(&self.settings.sheet_title, page);
        self.send(self.http.put(url).json(&body)).await?;
        tracing::debug!(column = page.column, rows = page.len(), "Wrote page");
        Ok(())
    }

    /// Clear the worksheet and write `texts` top-down, one page per column
    pub async fn fill(&self, texts: &[&str]) -> Result<()> {
        self.clear().await?;
        let pages = paginate(texts, self.settings.page_size);
        self.resize_for(pages.len()).await?;
        for page in &pages {
            self.write_page(page).await?;
        }
        tracing::info!(rows = texts.len(), pages = pages.len(), "Filled worksheet");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(1), "B");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_page_range_quotes_title() {
        assert_eq!(page_range("Input Sheet", 2), "'Input Sheet'!C1");
        assert_eq!(page_range("Bob's", 0), "'Bob''s'!A1");
    }

    #[test]
    fn test_page_body_is_one_column() {
        let texts = ["helo", "wrld"];
        let page = Page { column: 1, texts: &texts };
        assert_eq!(
            page_body("Input Sheet", &page),
            json!({
                "range": "'Input Sheet'!B1",
                "majorDimension": "COLUMNS",
                "values": [["helo", "wrld"]],
            })
        );
    }

    #[test]
    fn test_resize_body() {
        let body = resize_body(7, 192_000, 26);
        let props = &body["requests"][0]["updateSheetProperties"]["properties"];
        assert_eq!(props["sheetId"], 7);
        assert_eq!(props["gridProperties"]["rowCount"], 192_000);
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected_before_sending() {
        let client = SheetsClient::new(SheetsSettings::default());
        assert!(matches!(client.clear().await, Err(ChromeError::MissingAccessToken)));
    }
}
