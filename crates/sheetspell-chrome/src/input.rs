//! Raw keyboard input sent through the DevTools `Input` domain

use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::Page;

use crate::error::{ChromeError, Result};

/// `Input.dispatchKeyEvent` modifier bit for Control
pub const CTRL: i64 = 2;

/// Keys used to drive the editor menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    ArrowDown,
    ArrowRight,
}

impl Key {
    fn name(self) -> &'static str {
        match self {
            Key::Enter => "Enter",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowRight => "ArrowRight",
        }
    }

    fn virtual_key_code(self) -> i64 {
        match self {
            Key::Enter => 13,
            Key::ArrowDown => 40,
            Key::ArrowRight => 39,
        }
    }

    fn text(self) -> Option<&'static str> {
        match self {
            Key::Enter => Some("\r"),
            _ => None,
        }
    }
}

/// Key down / key up pair for one press of `key`
pub fn key_events(key: Key, modifiers: i64) -> Result<[DispatchKeyEventParams; 2]> {
    let build = |kind: DispatchKeyEventType| {
        let mut builder = DispatchKeyEventParams::builder()
            .r#type(kind.clone())
            .key(key.name())
            .code(key.name())
            .windows_virtual_key_code(key.virtual_key_code())
            .native_virtual_key_code(key.virtual_key_code())
            .modifiers(modifiers);
        if kind == DispatchKeyEventType::KeyDown {
            if let Some(text) = key.text() {
                builder = builder.text(text);
            }
        }
        builder.build().map_err(ChromeError::KeyEvent)
    };
    Ok([
        build(DispatchKeyEventType::KeyDown)?,
        build(DispatchKeyEventType::KeyUp)?,
    ])
}

/// Press `key` on whatever element has focus
pub async fn press(page: &Page, key: Key, modifiers: i64) -> Result<()> {
    for event in key_events(key, modifiers)? {
        page.execute(event).await?;
    }
    Ok(())
}

/// Press each key in order
pub async fn press_sequence(page: &Page, keys: &[Key]) -> Result<()> {
    for key in keys {
        press(page, *key, 0).await?;
    }
    Ok(())
}
