//! # Auto Clicker
//!
//! A command-line mouse auto-clicker with a configurable click rate, a
//! global toggle hotkey and an optional auto-stop timer.
//!
//! ## Features
//!
//! - Click rate from 0.1 to 100 clicks per second
//! - Regular click mode or press-and-hold mode
//! - Left or right mouse button
//! - Optional auto-stop timer (`"30s"`, `"5m"`, `"1h30m"`)
//! - Global hotkey for toggling on/off, persisted between runs
//! - Swappable input backend (ships with a `ydotool` implementation)
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use auto_clicker::{AutoClicker, ClickMode, MouseButton, YdotoolBackend};
//!
//! # async fn demo() -> auto_clicker::Result<()> {
//! let backend = Arc::new(YdotoolBackend::new()?);
//! let mut clicker = AutoClicker::new(backend);
//!
//! clicker.set_interval(Duration::from_millis(100))?; // 10 CPS
//! clicker.set_button(MouseButton::Primary);
//! clicker.set_mode(ClickMode::Click);
//! clicker.set_duration(Some(Duration::from_secs(30)))?;
//!
//! clicker.start();
//! // ... toggled off by a hotkey or the timer ...
//! clicker.stop().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! The toggle hotkey is persisted as JSON:
//!
//! ```json
//! {
//!   "hotkey": "ctrl+f6"
//! }
//! ```

pub mod clicker;
pub mod config;
pub mod error;
pub mod global_hotkey;
pub mod mouse;
pub mod utils;

pub use clicker::{AutoClicker, ClickMode};
pub use config::Config;
pub use error::{ClickerError, Result};
pub use global_hotkey::HotkeyManager;
pub use mouse::{MouseBackend, MouseButton, YdotoolBackend};
