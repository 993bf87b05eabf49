//! Custom error types for auto-clicker.
//!
//! This module provides structured error types using `thiserror` for better
//! error handling and more informative error messages.

use std::io;
use thiserror::Error;

/// Main error type for auto-clicker operations.
#[derive(Error, Debug)]
pub enum ClickerError {
    /// The click interval is zero or negative.
    #[error("interval must be greater than 0, got {seconds}")]
    InvalidInterval { seconds: f64 },

    /// The clicks-per-second value is zero or negative.
    #[error("CPS must be greater than 0, got {value}")]
    InvalidCps { value: f64 },

    /// The auto-stop duration is zero or negative.
    #[error("duration must be greater than 0, got {seconds}")]
    InvalidDuration { seconds: f64 },

    /// The mouse button name is not recognized.
    #[error("invalid mouse button '{value}': expected 'left' or 'right'")]
    InvalidButton { value: String },

    /// The click mode name is not recognized.
    #[error("invalid click mode '{value}': expected 'click' or 'hold'")]
    InvalidMode { value: String },

    /// Error parsing a hotkey combination.
    #[error("invalid hotkey '{combo}': {reason}")]
    InvalidHotkey { combo: String, reason: String },

    /// Error registering or handling a hotkey.
    #[error("hotkey error: {0}")]
    Hotkey(String),

    /// The input-injection backend is unavailable or failed to initialize.
    #[error("mouse backend error: {0}")]
    Backend(String),

    /// A synthetic mouse action failed at runtime.
    #[error("failed to {action} {button} button: {reason}")]
    DeviceAction {
        action: String,
        button: String,
        reason: String,
    },

    /// Error reading or parsing the configuration file.
    #[error("failed to load config from '{path}': {reason}")]
    ConfigLoad { path: String, reason: String },

    /// Error writing the configuration file.
    #[error("failed to save config to '{path}': {reason}")]
    ConfigSave { path: String, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for auto-clicker operations.
pub type Result<T> = std::result::Result<T, ClickerError>;

impl ClickerError {
    /// Create a new InvalidButton error.
    pub fn invalid_button(value: impl Into<String>) -> Self {
        Self::InvalidButton {
            value: value.into(),
        }
    }

    /// Create a new InvalidMode error.
    pub fn invalid_mode(value: impl Into<String>) -> Self {
        Self::InvalidMode {
            value: value.into(),
        }
    }

    /// Create a new InvalidHotkey error.
    pub fn invalid_hotkey(combo: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHotkey {
            combo: combo.into(),
            reason: reason.into(),
        }
    }

    /// Create a new Hotkey error.
    pub fn hotkey(message: impl Into<String>) -> Self {
        Self::Hotkey(message.into())
    }

    /// Create a new Backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Create a new DeviceAction error.
    pub fn device_action(
        action: impl Into<String>,
        button: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DeviceAction {
            action: action.into(),
            button: button.into(),
            reason: reason.into(),
        }
    }

    /// Create a new ConfigLoad error.
    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new ConfigSave error.
    pub fn config_save(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigSave {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
