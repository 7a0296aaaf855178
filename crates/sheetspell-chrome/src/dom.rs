//! Small DOM helpers on top of a chromiumoxide page

use std::time::Duration;

use chromiumoxide::element::Element;
use chromiumoxide::Page;
use tokio::time::Instant;

use crate::error::{ChromeError, Result};

/// Poll for `selector` until it exists or `timeout` runs out
pub async fn find_within(
    page: &Page,
    selector: &str,
    timeout: Duration,
    poll: Duration,
) -> Option<Element> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(element) = page.find_element(selector).await {
            return Some(element);
        }
        if Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(poll).await;
    }
}

/// Like [`find_within`], but a missing element is an error
pub async fn wait_for(
    page: &Page,
    selector: &str,
    timeout: Duration,
    poll: Duration,
) -> Result<Element> {
    find_within(page, selector, timeout, poll)
        .await
        .ok_or_else(|| ChromeError::Timeout {
            selector: selector.to_string(),
            secs: timeout.as_secs(),
        })
}

/// Check if `selector` matches an element that is rendered
pub async fn is_displayed(page: &Page, selector: &str) -> Result<bool> {
    let script = format!(
        "(() => {{ const e = document.querySelector({}); return !!e && e.offsetParent !== null; }})()",
        serde_json::to_string(selector)?
    );
    let visible: bool = page.evaluate(script).await?.into_value()?;
    Ok(visible)
}

/// Visible text of the first match, or `None` if it vanished mid-read
pub async fn visible_text(page: &Page, selector: &str) -> Option<String> {
    let element = page.find_element(selector).await.ok()?;
    match element.inner_text().await {
        Ok(text) => Some(text.unwrap_or_default()),
        Err(_) => None,
    }
}
