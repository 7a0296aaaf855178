//! A scripted in-memory [`TextSurface`] for tests and dry runs.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CheckError, Result};
use crate::observation::FlaggedObservation;
use crate::service::SurfaceProvider;
use crate::surface::{FlagField, SurfaceRead, TextSurface};

/// What the scripted surface recorded while it was driven
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptLog {
    pub pushed: Vec<String>,
    pub checks_started: usize,
    pub dismissals: usize,
    pub resets: usize,
}

/// Replays a fixed list of flags, with optional UI glitches.
///
/// Each flag stays on screen until it is dismissed. Clones share one log.
#[derive(Debug, Clone)]
pub struct ScriptedSurface {
    flags: VecDeque<FlaggedObservation>,
    stale_phrase: u32,
    stale_word: u32,
    stale_suggestion: u32,
    empty_word_reads: u32,
    missing_dismissals: u32,
    dialog_opens: bool,
    push_error: Option<String>,
    check_error: Option<String>,
    push_delay: Duration,
    log: Arc<Mutex<ScriptLog>>,
}

impl ScriptedSurface {
    pub fn new(flags: impl IntoIterator<Item = FlaggedObservation>) -> Self {
        Self {
            flags: flags.into_iter().collect(),
            stale_phrase: 0,
            stale_word: 0,
            stale_suggestion: 0,
            empty_word_reads: 0,
            missing_dismissals: 0,
            dialog_opens: true,
            push_error: None,
            check_error: None,
            push_delay: Duration::ZERO,
            log: Arc::default(),
        }
    }

    /// The next `count` reads of `field` find a stale element
    pub fn with_stale(mut self, field: FlagField, count: u32) -> Self {
        match field {
            FlagField::Phrase => self.stale_phrase = count,
            FlagField::Word => self.stale_word = count,
            FlagField::Suggestion => self.stale_suggestion = count,
        }
        self
    }

    /// The next `count` word reads come back empty
    pub fn with_empty_word_reads(mut self, count: u32) -> Self {
        self.empty_word_reads = count;
        self
    }

    /// The next `count` dismiss attempts find no control
    pub fn with_missing_dismissals(mut self, count: u32) -> Self {
        self.missing_dismissals = count;
        self
    }

    /// The spell-check dialog never opens
    pub fn without_dialog(mut self) -> Self {
        self.dialog_opens = false;
        self
    }

    pub fn failing_push(mut self, message: impl Into<String>) -> Self {
        self.push_error = Some(message.into());
        self
    }

    pub fn failing_check(mut self, message: impl Into<String>) -> Self {
        self.check_error = Some(message.into());
        self
    }

    /// Hold every push for `delay`
    pub fn with_push_delay(mut self, delay: Duration) -> Self {
        self.push_delay = delay;
        self
    }

    /// Shared record of what happened to this surface and its clones
    pub fn log(&self) -> ScriptLog {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn record(&self, f: impl FnOnce(&mut ScriptLog)) {
        if let Ok(mut log) = self.log.lock() {
            f(&mut log);
        }
    }

    fn take_glitch(counter: &mut u32) -> bool {
        if *counter > 0 {
            *counter -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl TextSurface for ScriptedSurface {
    async fn push(&mut self, texts: &[&str]) -> Result<()> {
        if !self.push_delay.is_zero() {
            tokio::time::sleep(self.push_delay).await;
        }
        if let Some(message) = &self.push_error {
            return Err(CheckError::SurfaceWrite(message.clone()));
        }
        let texts: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        self.record(|log| log.pushed.extend(texts));
        Ok(())
    }

    async fn begin_check(&mut self) -> Result<bool> {
        self.record(|log| log.checks_started += 1);
        if let Some(message) = &self.check_error {
            return Err(CheckError::interaction(message.clone()));
        }
        Ok(self.dialog_opens)
    }

    async fn check_exhausted(&mut self) -> Result<bool> {
        Ok(self.flags.is_empty())
    }

    async fn read(&mut self, field: FlagField) -> Result<SurfaceRead> {
        let glitched = match field {
            FlagField::Phrase => Self::take_glitch(&mut self.stale_phrase),
            FlagField::Word => Self::take_glitch(&mut self.stale_word),
            FlagField::Suggestion => Self::take_glitch(&mut self.stale_suggestion),
        };
        if glitched {
            return Ok(SurfaceRead::Stale);
        }
        if field == FlagField::Word && Self::take_glitch(&mut self.empty_word_reads) {
            return Ok(SurfaceRead::Text(String::new()));
        }

        let current = self
            .flags
            .front()
            .ok_or_else(|| CheckError::interaction("no flag on screen"))?;
        let text = match field {
            FlagField::Phrase => current.phrase.clone(),
            FlagField::Word => current.word.clone(),
            FlagField::Suggestion => current.suggestion.clone(),
        };
        Ok(SurfaceRead::Text(text))
    }

    async fn dismiss_current(&mut self) -> Result<bool> {
        if Self::take_glitch(&mut self.missing_dismissals) {
            return Ok(false);
        }
        self.flags.pop_front();
        self.record(|log| log.dismissals += 1);
        Ok(true)
    }

    async fn reset(&mut self) -> Result<()> {
        self.record(|log| log.resets += 1);
        Ok(())
    }
}

/// Hands out clones of one scripted surface
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    template: ScriptedSurface,
}

impl ScriptedProvider {
    pub fn new(template: ScriptedSurface) -> Self {
        Self { template }
    }

    pub fn log(&self) -> ScriptLog {
        self.template.log()
    }
}

#[async_trait]
impl SurfaceProvider for ScriptedProvider {
    async fn checkout(&self) -> Result<Box<dyn TextSurface>> {
        Ok(Box::new(self.template.clone()))
    }
}
