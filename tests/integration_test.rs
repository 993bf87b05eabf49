use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use auto_clicker::utils::{format_time_display, parse_timer_str};
use auto_clicker::{AutoClicker, ClickMode, ClickerError, Config, MouseBackend, MouseButton};
use tempfile::NamedTempFile;

/// Backend that counts actions instead of touching any input device.
#[derive(Default)]
struct RecordingBackend {
    presses: AtomicUsize,
    releases: AtomicUsize,
    clicks: AtomicUsize,
}

impl MouseBackend for RecordingBackend {
    fn press(&self, _button: MouseButton) -> auto_clicker::Result<()> {
        self.presses.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self, _button: MouseButton) -> auto_clicker::Result<()> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn click(&self, _button: MouseButton) -> auto_clicker::Result<()> {
        self.clicks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Backend whose every action fails, simulating an unavailable device.
struct FailingBackend;

impl MouseBackend for FailingBackend {
    fn press(&self, button: MouseButton) -> auto_clicker::Result<()> {
        Err(ClickerError::device_action(
            "press",
            button.to_string(),
            "device unavailable",
        ))
    }

    fn release(&self, button: MouseButton) -> auto_clicker::Result<()> {
        Err(ClickerError::device_action(
            "release",
            button.to_string(),
            "device unavailable",
        ))
    }
}

fn clicker_with(backend: Arc<RecordingBackend>) -> AutoClicker {
    AutoClicker::new(backend)
}

async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..100 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 1s");
}

// AutoClicker lifecycle

#[tokio::test]
async fn test_start_twice_spawns_single_worker() {
    let backend = Arc::new(RecordingBackend::default());
    let mut clicker = clicker_with(backend.clone());
    clicker.set_mode(ClickMode::Hold);

    clicker.start();
    clicker.start(); // no-op
    wait_until(|| clicker.is_holding()).await;

    // A second worker would have pressed again.
    assert_eq!(backend.presses.load(Ordering::SeqCst), 1);

    clicker.stop().await;
    assert!(!clicker.is_running());
    assert_eq!(backend.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stop_when_not_running_is_noop() {
    let backend = Arc::new(RecordingBackend::default());
    let mut clicker = clicker_with(backend.clone());

    clicker.stop().await;
    assert!(!clicker.is_running());
    assert_eq!(backend.releases.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_click_mode_issues_discrete_clicks() {
    let backend = Arc::new(RecordingBackend::default());
    let mut clicker = clicker_with(backend.clone());
    clicker.set_interval(Duration::from_millis(20)).unwrap();

    clicker.start();
    tokio::time::sleep(Duration::from_millis(110)).await;
    clicker.stop().await;

    let clicks = backend.clicks.load(Ordering::SeqCst);
    assert!(clicks >= 2, "expected at least 2 clicks, got {clicks}");
    // Discrete clicks never leave the button held.
    assert!(!clicker.is_holding());
    assert_eq!(backend.presses.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_hold_mode_releases_exactly_once_on_stop() {
    let backend = Arc::new(RecordingBackend::default());
    let mut clicker = clicker_with(backend.clone());
    clicker.set_mode(ClickMode::Hold);
    clicker.set_button(MouseButton::Secondary);

    clicker.start();
    wait_until(|| clicker.is_holding()).await;

    clicker.stop().await;
    assert!(!clicker.is_holding());
    assert_eq!(backend.presses.load(Ordering::SeqCst), 1);
    assert_eq!(backend.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_remaining_time_decreases_then_clears() {
    let backend = Arc::new(RecordingBackend::default());
    let mut clicker = clicker_with(backend.clone());
    clicker.set_interval(Duration::from_millis(10)).unwrap();
    clicker.set_duration(Some(Duration::from_secs(5))).unwrap();

    assert_eq!(clicker.remaining(), None); // not running yet

    clicker.start();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let first = clicker.remaining().expect("running with a duration");
    assert!(first <= Duration::from_secs(5));

    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = clicker.remaining().expect("still running");
    assert!(second < first);

    clicker.stop().await;
    assert_eq!(clicker.remaining(), None);
}

#[tokio::test]
async fn test_duration_expiry_stops_the_loop() {
    let backend = Arc::new(RecordingBackend::default());
    let mut clicker = clicker_with(backend.clone());
    clicker.set_interval(Duration::from_millis(10)).unwrap();
    clicker
        .set_duration(Some(Duration::from_millis(80)))
        .unwrap();

    clicker.start();
    wait_until(|| !clicker.is_running()).await;

    assert_eq!(clicker.remaining(), None);
    assert!(backend.clicks.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn test_duration_expiry_releases_held_button() {
    let backend = Arc::new(RecordingBackend::default());
    let mut clicker = clicker_with(backend.clone());
    clicker.set_mode(ClickMode::Hold);
    clicker
        .set_duration(Some(Duration::from_millis(60)))
        .unwrap();

    clicker.start();
    wait_until(|| !clicker.is_running()).await;

    assert!(!clicker.is_holding());
    assert_eq!(backend.presses.load(Ordering::SeqCst), 1);
    assert_eq!(backend.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_device_failure_terminates_the_run() {
    let mut clicker = AutoClicker::new(Arc::new(FailingBackend));
    clicker.set_interval(Duration::from_millis(10)).unwrap();

    clicker.start();
    wait_until(|| !clicker.is_running()).await;

    // A failed run requires an explicit new start; stop stays a no-op.
    clicker.stop().await;
    assert!(!clicker.is_running());
}

#[tokio::test]
async fn test_toggle_flips_state() {
    let backend = Arc::new(RecordingBackend::default());
    let mut clicker = clicker_with(backend.clone());
    clicker.set_interval(Duration::from_millis(10)).unwrap();

    clicker.toggle().await;
    assert!(clicker.is_running());

    clicker.toggle().await;
    assert!(!clicker.is_running());
}

#[tokio::test]
async fn test_restart_after_expiry() {
    let backend = Arc::new(RecordingBackend::default());
    let mut clicker = clicker_with(backend.clone());
    clicker.set_interval(Duration::from_millis(10)).unwrap();
    clicker
        .set_duration(Some(Duration::from_millis(40)))
        .unwrap();

    clicker.start();
    wait_until(|| !clicker.is_running()).await;

    let clicks_after_first_run = backend.clicks.load(Ordering::SeqCst);
    clicker.start();
    assert!(clicker.is_running());
    wait_until(|| !clicker.is_running()).await;
    assert!(backend.clicks.load(Ordering::SeqCst) > clicks_after_first_run);
}

#[tokio::test]
async fn test_settings_apply_on_next_tick() {
    let backend = Arc::new(RecordingBackend::default());
    let mut clicker = clicker_with(backend.clone());
    clicker.set_interval(Duration::from_millis(10)).unwrap();

    clicker.start();
    tokio::time::sleep(Duration::from_millis(30)).await;

    // Slowing down mid-run must not error and must not restart the loop.
    clicker.set_interval(Duration::from_millis(50)).unwrap();
    assert!(clicker.is_running());

    clicker.stop().await;
}

// Config persistence

#[test]
fn test_config_from_file() -> Result<()> {
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(br#"{ "hotkey": "Ctrl + F6" }"#)?;

    let config = Config::from_file(temp_file.path().to_str().unwrap())?;
    // Hotkeys are normalized on load.
    assert_eq!(config.hotkey, "ctrl+f6");
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_config_save_load_roundtrip() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let config_path = temp_dir.path().join("clicker.json");
    let config_path = config_path.to_str().unwrap();

    let original = Config {
        hotkey: "ctrl+alt+k".to_string(),
    };
    original.save_to_file(config_path)?;

    let loaded = Config::from_file(config_path)?;
    assert_eq!(loaded, original);
    Ok(())
}

#[test]
fn test_config_load_or_default_missing_file() {
    let config = Config::load_or_default("/nonexistent/clicker.json");
    assert_eq!(config.hotkey, "f6");
}

#[test]
fn test_config_load_or_default_malformed_file() -> Result<()> {
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(b"not json at all")?;

    let config = Config::load_or_default(temp_file.path().to_str().unwrap());
    assert_eq!(config.hotkey, "f6");
    Ok(())
}

#[test]
fn test_config_load_error_reports_path() {
    let err = Config::from_file("/nonexistent/clicker.json").unwrap_err();
    assert!(matches!(err, ClickerError::ConfigLoad { .. }));
    assert!(err.to_string().contains("/nonexistent/clicker.json"));
}

// Timer string handling as the CLI uses it

#[test]
fn test_timer_string_to_display_round() {
    let secs = parse_timer_str("1h30m").unwrap();
    assert_eq!(secs, 5400.0);
    assert_eq!(format_time_display(secs), "1h 30m");

    assert_eq!(parse_timer_str("90m"), Some(5400.0));
    assert_eq!(parse_timer_str("not a timer"), None);
    assert_eq!(parse_timer_str("0h0m0s"), None);
}
