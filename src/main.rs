//! Command-line controller for the auto-clicker.
//!
//! Wires the global toggle hotkey to the click engine, reports timer
//! countdowns and persists the hotkey on exit.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use auto_clicker::global_hotkey::{display_hotkey, normalize_hotkey};
use auto_clicker::utils::{
    cps_to_seconds, format_time_display, parse_timer_str, seconds_to_cps, validate_cps,
    validate_seconds, MAX_CPS, MIN_CPS,
};
use auto_clicker::{AutoClicker, ClickMode, Config, HotkeyManager, MouseButton, YdotoolBackend};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "aclk", version, about = "Hotkey-toggled mouse auto-clicker")]
struct Cli {
    /// Click rate in clicks per second (0.1 to 100)
    #[arg(long, default_value_t = 1.6)]
    cps: f64,

    /// Seconds between clicks; overrides --cps
    #[arg(long)]
    interval: Option<f64>,

    /// Mouse button: left or right
    #[arg(long, default_value = "left")]
    button: String,

    /// Click mode: click or hold
    #[arg(long, default_value = "click")]
    mode: String,

    /// Auto-stop timer, e.g. "30s", "5m", "1h30m"
    #[arg(long)]
    timer: Option<String>,

    /// Toggle hotkey, e.g. "ctrl+f6"; overrides the saved config
    #[arg(long)]
    hotkey: Option<String>,

    /// Path to the JSON config file storing the hotkey
    #[arg(short, long, default_value = "clicker.json")]
    config: String,

    /// Start clicking immediately instead of waiting for the hotkey
    #[arg(long)]
    start: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let button: MouseButton = cli.button.parse()?;
    let mode: ClickMode = cli.mode.parse()?;

    let interval_secs = match cli.interval {
        Some(seconds) => {
            if !validate_seconds(seconds) {
                bail!(
                    "interval {seconds}s is outside the supported range \
                     ({MIN_CPS} to {MAX_CPS} CPS)"
                );
            }
            seconds
        }
        None => {
            if !validate_cps(cli.cps) {
                bail!("CPS {} is outside the supported range ({MIN_CPS} to {MAX_CPS})", cli.cps);
            }
            cps_to_seconds(cli.cps)?
        }
    };
    let cps = seconds_to_cps(interval_secs)?;

    let timer_secs = match &cli.timer {
        Some(raw) => Some(
            parse_timer_str(raw)
                .with_context(|| format!("invalid timer '{raw}' (expected e.g. \"1h30m\")"))?,
        ),
        None => None,
    };

    let mut config = Config::load_or_default(&cli.config);
    if let Some(hotkey) = &cli.hotkey {
        config.hotkey = normalize_hotkey(hotkey);
    }
    config.validate()?;

    let backend = Arc::new(YdotoolBackend::new()?);
    let mut clicker = AutoClicker::new(backend);
    clicker.set_interval(Duration::from_secs_f64(interval_secs))?;
    clicker.set_button(button);
    clicker.set_mode(mode);
    clicker.set_duration(timer_secs.map(Duration::from_secs_f64))?;

    let mut hotkeys = HotkeyManager::new()?;
    hotkeys.register_toggle_hotkey(&config.hotkey)?;
    let mut presses = hotkeys.presses();
    let hotkeys = Arc::new(hotkeys);
    hotkeys.clone().start_listener().await?;

    println!(
        "🖱️  {} — {} mode, {} button, {:.1} CPS",
        "Auto-clicker ready".bold(),
        mode,
        button,
        cps
    );
    if let Some(secs) = timer_secs {
        println!("⏱️  Auto-stop after {}", format_time_display(secs));
    }
    println!(
        "Press {} to toggle, Ctrl+C to quit",
        display_hotkey(&config.hotkey).green().bold()
    );

    if cli.start {
        clicker.start();
        println!("{}", "RUNNING".green().bold());
    }

    let mut status = tokio::time::interval(Duration::from_secs(1));
    let mut was_running = clicker.is_running();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            changed = presses.changed() => {
                if changed.is_err() {
                    break;
                }
                clicker.toggle().await;
                if clicker.is_running() {
                    println!("{}", "RUNNING".green().bold());
                } else {
                    println!("{}", "STOPPED".red().bold());
                }
                was_running = clicker.is_running();
            }
            _ = status.tick() => {
                if let Some(remaining) = clicker.remaining() {
                    print!(
                        "\r⏱️  {} remaining   ",
                        format_time_display(remaining.as_secs_f64())
                    );
                    let _ = std::io::stdout().flush();
                } else if was_running && !clicker.is_running() {
                    // The auto-stop timer expired inside the worker.
                    println!("\n⏱️  {}", "Timer finished — clicker stopped".yellow());
                    was_running = false;
                }
            }
        }
    }

    clicker.stop().await;

    if let Err(e) = config.save_to_file(&cli.config) {
        tracing::warn!("{e}");
    }

    Ok(())
}
