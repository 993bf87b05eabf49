//! Synthetic mouse input.
//!
//! The clicker engine only depends on the [`MouseBackend`] trait; the
//! shipped implementation shells out to `ydotool`, which talks to uinput at
//! the kernel level and therefore works on both X11 and Wayland. It requires
//! the ydotoold daemon to be running: `sudo systemctl enable --now ydotoold`.

use std::fmt;
use std::process::Command;
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::{ClickerError, Result};

/// Mouse button targeted by synthetic actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// The primary (left) button.
    Primary,
    /// The secondary (right) button.
    Secondary,
}

impl MouseButton {
    /// ydotool button code (`click` subcommand argument).
    fn code(self) -> &'static str {
        match self {
            MouseButton::Primary => "0xC0",
            MouseButton::Secondary => "0xC1",
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MouseButton::Primary => write!(f, "left"),
            MouseButton::Secondary => write!(f, "right"),
        }
    }
}

impl FromStr for MouseButton {
    type Err = ClickerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" | "primary" => Ok(MouseButton::Primary),
            "right" | "secondary" => Ok(MouseButton::Secondary),
            other => Err(ClickerError::invalid_button(other)),
        }
    }
}

/// Capability to issue synthetic mouse button actions.
///
/// Implementations must be callable from the clicker's worker task, so the
/// trait requires `Send + Sync`. Failures are reported as
/// [`ClickerError::DeviceAction`] and treated by the engine as fatal to the
/// current run.
pub trait MouseBackend: Send + Sync {
    /// Press the button and leave it held down.
    fn press(&self, button: MouseButton) -> Result<()>;

    /// Release a previously pressed button.
    fn release(&self, button: MouseButton) -> Result<()>;

    /// One discrete press-and-release action.
    fn click(&self, button: MouseButton) -> Result<()> {
        self.press(button)?;
        self.release(button)
    }
}

/// Mouse backend that sends events through the `ydotool` CLI.
pub struct YdotoolBackend {
    socket_path: String,
}

impl YdotoolBackend {
    /// Create a new backend, probing that `ydotool` is installed.
    pub fn new() -> Result<Self> {
        let output = Command::new("which")
            .arg("ydotool")
            .output()
            .map_err(|e| ClickerError::backend(format!("failed to check for ydotool: {e}")))?;

        if !output.status.success() {
            return Err(ClickerError::backend(
                "ydotool not found; install it and start ydotoold",
            ));
        }

        info!("ydotool mouse backend ready");
        Ok(Self {
            socket_path: socket_path(),
        })
    }

    fn run_ydotool(&self, action: &str, button: MouseButton, args: &[&str]) -> Result<()> {
        let output = Command::new("ydotool")
            .env("YDOTOOL_SOCKET", &self.socket_path)
            .args(args)
            .output()
            .map_err(|e| ClickerError::device_action(action, button.to_string(), e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClickerError::device_action(
                action,
                button.to_string(),
                stderr.trim().to_string(),
            ));
        }

        Ok(())
    }
}

impl MouseBackend for YdotoolBackend {
    fn press(&self, button: MouseButton) -> Result<()> {
        debug!("pressing {} button via ydotool", button);
        self.run_ydotool("press", button, &["click", "-D", button.code()])
    }

    fn release(&self, button: MouseButton) -> Result<()> {
        debug!("releasing {} button via ydotool", button);
        self.run_ydotool("release", button, &["click", "-U", button.code()])
    }

    fn click(&self, button: MouseButton) -> Result<()> {
        debug!("clicking {} button via ydotool", button);
        self.run_ydotool("click", button, &["click", button.code()])
    }
}

/// ydotoold socket path for the current user.
fn socket_path() -> String {
    let uid = unsafe { libc::getuid() };
    format!("/run/user/{uid}/.ydotool_socket")
}
