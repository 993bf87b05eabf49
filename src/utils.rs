//! Pure helper functions for click-rate conversion and timer strings.
//!
//! The controller layer validates and translates user input with these
//! before handing values to [`crate::AutoClicker`]. Nothing here holds
//! state and nothing here touches the input backend.

use crate::error::{ClickerError, Result};

/// Lowest accepted click rate, in clicks per second.
pub const MIN_CPS: f64 = 0.1;
/// Highest accepted click rate, in clicks per second.
pub const MAX_CPS: f64 = 100.0;

/// Convert clicks per second to the interval between clicks, in seconds.
pub fn cps_to_seconds(cps: f64) -> Result<f64> {
    if cps <= 0.0 {
        return Err(ClickerError::InvalidCps { value: cps });
    }
    Ok(1.0 / cps)
}

/// Convert an interval between clicks, in seconds, to clicks per second.
pub fn seconds_to_cps(seconds: f64) -> Result<f64> {
    if seconds <= 0.0 {
        return Err(ClickerError::InvalidInterval { seconds });
    }
    Ok(1.0 / seconds)
}

/// Check a CPS value against the accepted range (0.1 to 100).
pub fn validate_cps(cps: f64) -> bool {
    (MIN_CPS..=MAX_CPS).contains(&cps)
}

/// Check an interval value: it must be positive and translate to a CPS
/// inside the accepted range.
pub fn validate_seconds(seconds: f64) -> bool {
    match seconds_to_cps(seconds) {
        Ok(cps) => validate_cps(cps),
        Err(_) => false,
    }
}

/// Parse a timer string like `"30s"`, `"5m"`, `"1h30m"` into total seconds.
///
/// Hours, minutes and seconds segments are each optional but must appear
/// in that order. Whitespace and case are ignored. Malformed input, leftover
/// text after the recognized segments, or an all-zero total all yield `None`;
/// this function never errors.
pub fn parse_timer_str(input: &str) -> Option<f64> {
    let cleaned: String = input.to_lowercase().split_whitespace().collect();
    if cleaned.is_empty() {
        return None;
    }

    let mut rest = cleaned.as_str();
    let mut total = 0.0_f64;

    if let Some((value, tail)) = rest.split_once('h') {
        total += value.parse::<f64>().ok()? * 3600.0;
        rest = tail;
    }
    if let Some((value, tail)) = rest.split_once('m') {
        total += value.parse::<f64>().ok()? * 60.0;
        rest = tail;
    }
    if let Some((value, tail)) = rest.split_once('s') {
        total += value.parse::<f64>().ok()?;
        rest = tail;
    }

    if !rest.is_empty() {
        return None;
    }

    // A timer of zero seconds schedules nothing.
    (total > 0.0).then_some(total)
}

/// Format a second count as space-joined `h`/`m`/`s` segments.
///
/// Zero-valued hour and minute segments are omitted; the seconds segment is
/// always present when everything else is zero (`0.0` renders as `"0s"`).
pub fn format_time_display(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }

    parts.join(" ")
}
