//! The Google Sheets spell-check dialog as a [`TextSurface`]

use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::Page;
use sheetspell_core::{FlagField, SurfaceProvider, SurfaceRead, TextSurface};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::SurfaceTiming;
use crate::dom;
use crate::error::{ChromeError, Result};
use crate::input::{self, Key, CTRL};
use crate::session::ChromeSession;
use crate::sheets::SheetsClient;

/// Present once the editor has finished loading
pub const TITLE_INPUT: &str = "input.docs-title-input";
pub const TOOLS_MENU: &str = "#docs-tools-menu";
pub const IGNORE_BUTTON: &str = "#docs-spellcheckslidingdialog-button-ignore";
pub const NO_MISSPELLINGS_FOOTER: &str = "#docs-spellcheckslidingdialog-no-misspellings-footer";
pub const PHRASE_CELL: &str = ".cell-input";
pub const ORIGINAL_WORD: &str = "#docs-spellcheckslidingdialog-original-word";
pub const FIRST_SUGGESTION: &str = ".goog-menuitem-content";

/// Tools menu is open: Spelling > Spell check
const SPELL_CHECK_MENU_PATH: [Key; 8] = [
    Key::Enter,
    Key::ArrowDown,
    Key::ArrowDown,
    Key::ArrowDown,
    Key::ArrowDown,
    Key::ArrowDown,
    Key::ArrowRight,
    Key::Enter,
];

pub type SharedSession = Arc<Mutex<ChromeSession>>;

fn selector(field: FlagField) -> &'static str {
    match field {
        FlagField::Phrase => PHRASE_CELL,
        FlagField::Word => ORIGINAL_WORD,
        FlagField::Suggestion => FIRST_SUGGESTION,
    }
}

/// One checked-out use of the shared session against the input worksheet.
///
/// Holds the session lock for as long as it lives.
pub struct GoogleSheetSurface {
    session: OwnedMutexGuard<ChromeSession>,
    sheets: SheetsClient,
    timing: SurfaceTiming,
}

impl GoogleSheetSurface {
    pub fn new(session: OwnedMutexGuard<ChromeSession>, sheets: SheetsClient, timing: SurfaceTiming) -> Self {
        Self {
            session,
            sheets,
            timing,
        }
    }

    async fn page(&mut self) -> Result<&Page> {
        self.session.page().await
    }

    async fn open_spell_check(&mut self) -> Result<bool> {
        let url = self.sheets.settings().edit_url();
        let timing = self.timing;
        let page = self.page().await?;

        page.goto(url).await?;
        dom::wait_for(page, TITLE_INPUT, timing.trigger_timeout, timing.poll_interval).await?;
        input::press(page, Key::ArrowDown, CTRL).await?;

        dom::wait_for(page, TOOLS_MENU, timing.trigger_timeout, timing.poll_interval)
            .await?
            .click()
            .await?;
        input::press_sequence(page, &SPELL_CHECK_MENU_PATH).await?;

        for control in [IGNORE_BUTTON, NO_MISSPELLINGS_FOOTER] {
            if dom::find_within(page, control, timing.trigger_timeout, timing.poll_interval)
                .await
                .is_none()
            {
                tracing::info!(%control, "Spell-check dialog control never appeared");
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn dismiss(&mut self) -> Result<bool> {
        let page = self.page().await?;
        if !dom::is_displayed(page, IGNORE_BUTTON).await? {
            return Ok(false);
        }
        match page.find_element(IGNORE_BUTTON).await {
            Ok(button) => {
                button.click().await?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}

#[async_trait]
impl TextSurface for GoogleSheetSurface {
    async fn push(&mut self, texts: &[&str]) -> sheetspell_core::Result<()> {
        Ok(self.sheets.fill(texts).await?)
    }

    async fn begin_check(&mut self) -> sheetspell_core::Result<bool> {
        Ok(self.open_spell_check().await?)
    }

    async fn check_exhausted(&mut self) -> sheetspell_core::Result<bool> {
        let page = self.page().await?;
        Ok(dom::is_displayed(page, NO_MISSPELLINGS_FOOTER).await?)
    }

    async fn read(&mut self, field: FlagField) -> sheetspell_core::Result<SurfaceRead> {
        let page = self.page().await?;
        Ok(match dom::visible_text(page, selector(field)).await {
            Some(text) => SurfaceRead::Text(text),
            None => SurfaceRead::Stale,
        })
    }

    async fn dismiss_current(&mut self) -> sheetspell_core::Result<bool> {
        Ok(self.dismiss().await?)
    }

    async fn reset(&mut self) -> sheetspell_core::Result<()> {
        Ok(self.sheets.clear().await?)
    }
}

/// Hands out [`GoogleSheetSurface`]s bound to one shared Chrome session.
pub struct GoogleSheetProvider {
    session: SharedSession,
    sheets: SheetsClient,
    timing: SurfaceTiming,
}

impl GoogleSheetProvider {
    pub fn new(session: SharedSession, sheets: SheetsClient, timing: SurfaceTiming) -> Self {
        Self {
            session,
            sheets,
            timing,
        }
    }
}

#[async_trait]
impl SurfaceProvider for GoogleSheetProvider {
    async fn checkout(&self) -> sheetspell_core::Result<Box<dyn TextSurface>> {
        let mut session = Arc::clone(&self.session).lock_owned().await;
        session.ensure_logged_in().await.map_err(|e| match e {
            ChromeError::MissingCredential(_) => {
                sheetspell_core::CheckError::SessionUnreachable(e.to_string())
            }
            other => other.into(),
        })?;
        Ok(Box::new(GoogleSheetSurface::new(
            session,
            self.sheets.clone(),
            self.timing,
        )))
    }
}
