//! Live tests against a real Chrome and Google account.
//!
//! Skipped unless `SHEETSPELL_LIVE_CHROME=1` is set. The spell-check test
//! additionally needs `GOOGLE_USERNAME_ENV`, `GOOGLE_PASSWORD_ENV`,
//! `SHEETSPELL_SHEETS__SPREADSHEET_ID` and `SHEETSPELL_SHEETS__ACCESS_TOKEN`.

use std::sync::Arc;

use sheetspell_chrome::{
    BrowserSettings, ChromeSession, GoogleSheetProvider, SheetsClient, SheetsSettings,
    SurfaceTiming,
};
use sheetspell_core::{CheckPolicy, Row, SpellCheckResponse, SpellChecker, WordLists};
use tokio::sync::Mutex;

fn chrome_enabled() -> bool {
    std::env::var("SHEETSPELL_LIVE_CHROME").is_ok_and(|v| v == "1")
}

/// Skip this test if live Chrome tests are not enabled.
macro_rules! skip_if_no_chrome {
    () => {
        if !chrome_enabled() {
            eprintln!("SKIP: set SHEETSPELL_LIVE_CHROME=1 to run live Chrome tests");
            return;
        }
    };
}

fn headless() -> BrowserSettings {
    BrowserSettings {
        headless: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_open_url_and_screenshot() {
    skip_if_no_chrome!();

    let mut session = ChromeSession::new(headless());
    let title = session
        .open_url("https://en.wikipedia.org/wiki/Special:Random")
        .await
        .expect("open_url");
    assert!(title.contains("Wikipedia"), "unexpected title: {title}");

    let png = session.screenshot().await.expect("screenshot");
    assert_eq!(&png[..4], b"\x89PNG");
    assert!(session.kill().await);
}

#[tokio::test]
async fn test_spell_check_round_trip() {
    skip_if_no_chrome!();
    let (Ok(spreadsheet_id), Ok(token)) = (
        std::env::var("SHEETSPELL_SHEETS__SPREADSHEET_ID"),
        std::env::var("SHEETSPELL_SHEETS__ACCESS_TOKEN"),
    ) else {
        eprintln!("SKIP: no spreadsheet configured");
        return;
    };

    let session = Arc::new(Mutex::new(ChromeSession::new(headless())));
    let sheets = SheetsClient::new(SheetsSettings {
        spreadsheet_id,
        access_token: Some(token),
        ..Default::default()
    });
    let provider = GoogleSheetProvider::new(Arc::clone(&session), sheets, SurfaceTiming::default());
    let checker = SpellChecker::new(
        Arc::new(provider),
        Arc::new(WordLists::default()),
        CheckPolicy::default(),
    );

    let (store, report) = checker
        .check(vec![Row::new("1", "helo wrld")])
        .await
        .expect("check");
    eprintln!("report: {report:?}");

    let response = SpellCheckResponse::from(&store);
    assert!(response.incorrect_words.contains_key("helo wrld"));
    session.lock().await.kill().await;
}
