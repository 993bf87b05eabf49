//! Global toggle-hotkey registration and listening.
//!
//! A single hotkey combination toggles the clicker. Presses are broadcast to
//! the controller over a watch channel carrying a press counter; the
//! controller decides what "toggle" means based on the clicker's current
//! state, so an auto-stop that fires between presses cannot desynchronize
//! the two.

use std::sync::Arc;

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tokio::sync::watch;
use tracing::debug;

use crate::error::{ClickerError, Result};

/// Hotkey used when nothing is configured.
pub const DEFAULT_HOTKEY: &str = "f6";

pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    registered: Option<String>,
    press_tx: watch::Sender<u64>,
}

impl HotkeyManager {
    pub fn new() -> Result<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| ClickerError::hotkey(format!("failed to create hotkey manager: {e}")))?;

        let (press_tx, _) = watch::channel(0);

        Ok(Self {
            manager,
            registered: None,
            press_tx,
        })
    }

    /// Register the toggle hotkey, replacing any previous registration.
    pub fn register_toggle_hotkey(&mut self, hotkey_str: &str) -> Result<()> {
        let hotkey = parse_hotkey(hotkey_str)?;

        if let Some(previous) = self.registered.take() {
            // Best effort; the old combination may already be gone.
            let _ = self.manager.unregister(parse_hotkey(&previous)?);
        }

        self.manager.register(hotkey).map_err(|e| {
            ClickerError::hotkey(format!("failed to register hotkey '{hotkey_str}': {e}"))
        })?;

        self.registered = Some(hotkey_str.to_string());
        println!(
            "🔥 Global toggle hotkey '{}' registered successfully",
            display_hotkey(hotkey_str)
        );
        Ok(())
    }

    /// Receiver whose value increments on every hotkey press.
    pub fn presses(&self) -> watch::Receiver<u64> {
        self.press_tx.subscribe()
    }

    /// Spawn the blocking listener that drains hotkey events.
    pub async fn start_listener(self: Arc<Self>) -> Result<()> {
        let receiver = GlobalHotKeyEvent::receiver();
        let manager = self.clone();

        tokio::task::spawn_blocking(move || loop {
            if let Ok(event) = receiver.try_recv() {
                if event.state == HotKeyState::Pressed {
                    debug!("toggle hotkey pressed");
                    manager.press_tx.send_modify(|count| *count += 1);
                }
            }

            // Small sleep to prevent busy waiting
            std::thread::sleep(std::time::Duration::from_millis(10));
        });

        Ok(())
    }
}

/// Normalize user input to the stored hotkey form: lowercase, no spaces.
/// Empty input falls back to [`DEFAULT_HOTKEY`].
pub fn normalize_hotkey(input: &str) -> String {
    let normalized: String = input
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if normalized.is_empty() {
        DEFAULT_HOTKEY.to_string()
    } else {
        normalized
    }
}

/// Display-friendly form of a stored hotkey: `"ctrl+f6"` becomes `"CTRL + F6"`.
pub fn display_hotkey(hotkey: &str) -> String {
    hotkey.replace('+', " + ").to_uppercase()
}

/// Parse a normalized combination like `"ctrl+alt+f6"` into a [`HotKey`].
pub fn parse_hotkey(hotkey_str: &str) -> Result<HotKey> {
    let binding = hotkey_str.to_lowercase();
    let parts: Vec<&str> = binding.split('+').map(|s| s.trim()).collect();

    let mut modifiers = Modifiers::empty();
    let mut key_code = None;

    for part in &parts {
        match *part {
            "" => {
                return Err(ClickerError::invalid_hotkey(hotkey_str, "empty key segment"));
            }
            "ctrl" | "control" => modifiers |= Modifiers::CONTROL,
            "alt" => modifiers |= Modifiers::ALT,
            "shift" => modifiers |= Modifiers::SHIFT,
            "meta" | "cmd" | "super" => modifiers |= Modifiers::SUPER,
            key => {
                if key_code.is_some() {
                    return Err(ClickerError::invalid_hotkey(
                        hotkey_str,
                        "multiple non-modifier keys specified",
                    ));
                }
                key_code = Some(parse_key_code(key)?);
            }
        }
    }

    let code = key_code
        .ok_or_else(|| ClickerError::invalid_hotkey(hotkey_str, "no non-modifier key specified"))?;

    Ok(HotKey::new(Some(modifiers), code))
}

fn parse_key_code(key: &str) -> Result<Code> {
    let code = match key {
        // Letters
        "a" => Code::KeyA,
        "b" => Code::KeyB,
        "c" => Code::KeyC,
        "d" => Code::KeyD,
        "e" => Code::KeyE,
        "f" => Code::KeyF,
        "g" => Code::KeyG,
        "h" => Code::KeyH,
        "i" => Code::KeyI,
        "j" => Code::KeyJ,
        "k" => Code::KeyK,
        "l" => Code::KeyL,
        "m" => Code::KeyM,
        "n" => Code::KeyN,
        "o" => Code::KeyO,
        "p" => Code::KeyP,
        "q" => Code::KeyQ,
        "r" => Code::KeyR,
        "s" => Code::KeyS,
        "t" => Code::KeyT,
        "u" => Code::KeyU,
        "v" => Code::KeyV,
        "w" => Code::KeyW,
        "x" => Code::KeyX,
        "y" => Code::KeyY,
        "z" => Code::KeyZ,

        // Numbers
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,

        // Function keys
        "f1" => Code::F1,
        "f2" => Code::F2,
        "f3" => Code::F3,
        "f4" => Code::F4,
        "f5" => Code::F5,
        "f6" => Code::F6,
        "f7" => Code::F7,
        "f8" => Code::F8,
        "f9" => Code::F9,
        "f10" => Code::F10,
        "f11" => Code::F11,
        "f12" => Code::F12,

        // Special keys
        "space" => Code::Space,
        "enter" | "return" => Code::Enter,
        "tab" => Code::Tab,
        "escape" | "esc" => Code::Escape,
        "home" => Code::Home,
        "end" => Code::End,
        "pageup" => Code::PageUp,
        "pagedown" => Code::PageDown,

        _ => {
            return Err(ClickerError::invalid_hotkey(
                key,
                "unsupported key".to_string(),
            ))
        }
    };

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hotkey_valid() {
        assert!(parse_hotkey("f6").is_ok());
        assert!(parse_hotkey("ctrl+f6").is_ok());
        assert!(parse_hotkey("ctrl+alt+r").is_ok());
        assert!(parse_hotkey("shift+space").is_ok());
    }

    #[test]
    fn test_parse_hotkey_invalid() {
        assert!(matches!(
            parse_hotkey("ctrl+alt"),
            Err(ClickerError::InvalidHotkey { .. })
        ));
        assert!(matches!(
            parse_hotkey("a+b"),
            Err(ClickerError::InvalidHotkey { .. })
        ));
        assert!(matches!(
            parse_hotkey("ctrl+"),
            Err(ClickerError::InvalidHotkey { .. })
        ));
        assert!(matches!(
            parse_hotkey("ctrl+volumeup"),
            Err(ClickerError::InvalidHotkey { .. })
        ));
    }

    #[test]
    fn test_normalize_hotkey() {
        assert_eq!(normalize_hotkey("Ctrl + F6"), "ctrl+f6");
        assert_eq!(normalize_hotkey("  "), DEFAULT_HOTKEY);
        assert_eq!(normalize_hotkey(""), DEFAULT_HOTKEY);
        assert_eq!(normalize_hotkey("F6"), "f6");
    }

    #[test]
    fn test_display_hotkey() {
        assert_eq!(display_hotkey("ctrl+f6"), "CTRL + F6");
        assert_eq!(display_hotkey("f6"), "F6");
    }
}
