//! Persisted configuration.
//!
//! The only thing remembered between runs is the toggle hotkey, stored as a
//! small JSON file:
//!
//! ```json
//! {
//!   "hotkey": "ctrl+f6"
//! }
//! ```
//!
//! The controller reads it at startup and writes it back at shutdown. A
//! missing or malformed file is not an error at startup; it just means
//! defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ClickerError, Result};
use crate::global_hotkey::{normalize_hotkey, parse_hotkey, DEFAULT_HOTKEY};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Normalized toggle hotkey combination, e.g. `"ctrl+f6"`.
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
}

fn default_hotkey() -> String {
    DEFAULT_HOTKEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkey: default_hotkey(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ClickerError::config_load(path, e.to_string()))?;
        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| ClickerError::config_load(path, e.to_string()))?;
        config.hotkey = normalize_hotkey(&config.hotkey);
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &str) -> Self {
        if !Path::new(path).exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Write configuration to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ClickerError::config_save(path, e.to_string()))?;
        fs::write(path, content).map_err(|e| ClickerError::config_save(path, e.to_string()))?;
        Ok(())
    }

    /// Check that the stored hotkey is a registrable combination.
    pub fn validate(&self) -> Result<()> {
        parse_hotkey(&self.hotkey)?;
        Ok(())
    }
}
