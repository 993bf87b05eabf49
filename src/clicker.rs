//! The auto-click engine.
//!
//! [`AutoClicker`] owns the click-rate, button, mode and duration settings
//! and drives a single background tokio task while active. Settings may be
//! changed while running; a change takes effect on the next loop tick.
//! Stopping is cooperative: the controller signals a watch channel and
//! awaits the worker with a bounded timeout, and the worker itself releases
//! any held button and publishes the stopped state on its way out, so there
//! is exactly one writer for that transition.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::{ClickerError, Result};
use crate::mouse::{MouseBackend, MouseButton};

/// Sleep slice between state re-checks while a button is held down.
const HOLD_POLL_SLICE: Duration = Duration::from_millis(10);

/// Upper bound on how long `stop()` waits for the worker to exit.
const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// How the engine drives the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMode {
    /// One discrete press-and-release per tick.
    Click,
    /// Press once and keep the button logically held until stop.
    Hold,
}

impl fmt::Display for ClickMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickMode::Click => write!(f, "click"),
            ClickMode::Hold => write!(f, "hold"),
        }
    }
}

impl FromStr for ClickMode {
    type Err = ClickerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "click" => Ok(ClickMode::Click),
            "hold" => Ok(ClickMode::Hold),
            other => Err(ClickerError::invalid_mode(other)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    interval: Duration,
    button: MouseButton,
    mode: ClickMode,
    duration: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // 10 CPS out of the box.
            interval: Duration::from_millis(100),
            button: MouseButton::Primary,
            mode: ClickMode::Click,
            duration: None,
        }
    }
}

/// State shared between the controller handle and the worker task.
struct Shared {
    backend: Arc<dyn MouseBackend>,
    settings: Mutex<Settings>,
    running: AtomicBool,
    holding: AtomicBool,
    started_at: Mutex<Option<Instant>>,
}

/// Automated mouse clicker with start/stop lifecycle and optional auto-stop.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use auto_clicker::{AutoClicker, YdotoolBackend};
///
/// # async fn demo() -> auto_clicker::Result<()> {
/// let backend = Arc::new(YdotoolBackend::new()?);
/// let mut clicker = AutoClicker::new(backend);
/// clicker.set_interval(Duration::from_millis(625))?; // 1.6 CPS
/// clicker.start();
/// // ... later, from a hotkey or shutdown path:
/// clicker.stop().await;
/// # Ok(())
/// # }
/// ```
pub struct AutoClicker {
    shared: Arc<Shared>,
    stop_tx: watch::Sender<bool>,
    worker: Option<JoinHandle<()>>,
}

impl AutoClicker {
    /// Create a stopped clicker using the given input backend.
    pub fn new(backend: Arc<dyn MouseBackend>) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                backend,
                settings: Mutex::new(Settings::default()),
                running: AtomicBool::new(false),
                holding: AtomicBool::new(false),
                started_at: Mutex::new(None),
            }),
            stop_tx,
            worker: None,
        }
    }

    /// Set the interval between clicks. Effective on the next loop tick.
    pub fn set_interval(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(ClickerError::InvalidInterval {
                seconds: interval.as_secs_f64(),
            });
        }
        self.shared.settings.lock().interval = interval;
        Ok(())
    }

    /// Set the mouse button to drive.
    pub fn set_button(&self, button: MouseButton) {
        self.shared.settings.lock().button = button;
    }

    /// Set the clicking mode.
    pub fn set_mode(&self, mode: ClickMode) {
        self.shared.settings.lock().mode = mode;
    }

    /// Set the auto-stop duration; `None` runs indefinitely.
    pub fn set_duration(&self, duration: Option<Duration>) -> Result<()> {
        if let Some(d) = duration {
            if d.is_zero() {
                return Err(ClickerError::InvalidDuration {
                    seconds: d.as_secs_f64(),
                });
            }
        }
        self.shared.settings.lock().duration = duration;
        Ok(())
    }

    /// Whether the background loop is currently active.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Whether the button is currently held down (hold mode only).
    pub fn is_holding(&self) -> bool {
        self.shared.holding.load(Ordering::SeqCst)
    }

    /// Start clicking. No-op if already running.
    ///
    /// Spawns exactly one worker task; must be called from within a tokio
    /// runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("clicker already running, ignoring start");
            return;
        }

        // Drop the handle of a worker that stopped itself (timer expiry or
        // device failure); it has already finished.
        self.worker.take();

        *self.shared.started_at.lock() = Some(Instant::now());
        self.shared.running.store(true, Ordering::SeqCst);
        self.stop_tx.send_replace(false);

        let shared = Arc::clone(&self.shared);
        let stop_rx = self.stop_tx.subscribe();
        self.worker = Some(tokio::spawn(click_loop(shared, stop_rx)));
        debug!("clicker started");
    }

    /// Stop clicking. No-op if not running.
    ///
    /// Signals the worker and waits (bounded by one second) for it to exit,
    /// which guarantees a held button has been released by the time this
    /// returns on the normal path.
    pub async fn stop(&mut self) {
        if !self.is_running() {
            debug!("clicker not running, ignoring stop");
            return;
        }

        let _ = self.stop_tx.send(true);

        if let Some(handle) = self.worker.take() {
            match tokio::time::timeout(STOP_JOIN_TIMEOUT, handle).await {
                Ok(Ok(())) => debug!("clicker stopped"),
                Ok(Err(e)) => {
                    warn!("click worker task failed: {e}");
                    self.shared.running.store(false, Ordering::SeqCst);
                }
                Err(_) => {
                    warn!(
                        "click worker did not exit within {:?}, marking stopped",
                        STOP_JOIN_TIMEOUT
                    );
                    self.shared.running.store(false, Ordering::SeqCst);
                }
            }
        }
    }

    /// Start if stopped, stop if running.
    pub async fn toggle(&mut self) {
        if self.is_running() {
            self.stop().await;
        } else {
            self.start();
        }
    }

    /// Time left until auto-stop.
    ///
    /// `None` when not running or when no duration is set; otherwise the
    /// remaining budget, floored at zero.
    pub fn remaining(&self) -> Option<Duration> {
        if !self.is_running() {
            return None;
        }
        let duration = self.shared.settings.lock().duration?;
        let started = (*self.shared.started_at.lock())?;
        Some(duration.saturating_sub(started.elapsed()))
    }
}

async fn click_loop(shared: Arc<Shared>, mut stop_rx: watch::Receiver<bool>) {
    debug!("click loop running");

    loop {
        if *stop_rx.borrow() {
            debug!("stop requested");
            break;
        }

        let Settings {
            interval,
            button,
            mode,
            duration,
        } = *shared.settings.lock();

        if let Some(limit) = duration {
            let started = *shared.started_at.lock();
            if started.is_none_or(|t| t.elapsed() >= limit) {
                debug!("duration elapsed, stopping");
                break;
            }
        }

        let sleep_for = match mode {
            ClickMode::Hold => {
                if !shared.holding.load(Ordering::SeqCst) {
                    if let Err(e) = shared.backend.press(button) {
                        error!("click loop aborting: {e}");
                        break;
                    }
                    shared.holding.store(true, Ordering::SeqCst);
                }
                HOLD_POLL_SLICE
            }
            ClickMode::Click => {
                if let Err(e) = shared.backend.click(button) {
                    error!("click loop aborting: {e}");
                    break;
                }
                interval
            }
        };

        // Race the pacing sleep against the stop signal so stop latency is
        // bounded by milliseconds rather than by one interval.
        tokio::select! {
            _ = tokio::time::sleep(sleep_for) => {}
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    debug!("stop requested");
                    break;
                }
            }
        }
    }

    // Release before publishing the stopped state so a caller never observes
    // "not running" while the button is still logically held.
    if shared.holding.load(Ordering::SeqCst) {
        let button = shared.settings.lock().button;
        if let Err(e) = shared.backend.release(button) {
            warn!("failed to release held button on stop: {e}");
        }
        shared.holding.store(false, Ordering::SeqCst);
    }
    shared.running.store(false, Ordering::SeqCst);
    debug!("click loop exited");
}
