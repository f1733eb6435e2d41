//! Growlab Daemon
//!
//! Long-lived foreground process that samples environmental sensors and
//! renders the readings plus disk usage onto an attached OLED display.

mod config;
mod poll;
mod rendering;
mod screen;
mod sensors;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use growlab_hw::OledDevice;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use poll::PollLoop;
use screen::Screen;
use sensors::disk::StatvfsProbe;
use sensors::{EnvSensor, SensorKind};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    if cfg!(not(unix)) {
        eprintln!("{} platform not supported", std::env::consts::OS);
        std::process::exit(1);
    }

    // Load configuration
    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            let config = Config::load(&path)
                .with_context(|| format!("Failed to load configuration from {}", path))?;
            info!("Loaded configuration from: {}", path);
            config
        }
        None => Config::default(),
    };

    // SENSOR_TYPE overrides the configured sensor variant
    if let Ok(value) = std::env::var("SENSOR_TYPE") {
        config.sensor = value;
    }

    // No display, no purpose: unlike sensors, the panel has no stub mode
    let display = OledDevice::open(&config.i2c.bus)
        .context("OLED display unavailable (is the module wired to the I2C bus?)")?;

    let kind = SensorKind::from_identifier(&config.sensor);
    let sensor = EnvSensor::open(kind, &config.i2c.bus).with_context(|| {
        format!("Failed to open {kind} sensor (set SENSOR_TYPE=none to run without hardware)")
    })?;
    info!("Sensor variant: {}", sensor.kind());

    let screen = match config.font.as_deref() {
        Some(font) => {
            let path = resolve_font_path(font);
            info!("Loading font from {}", path.display());
            Screen::from_font_file(&path)?
        }
        None => Screen::new(),
    };

    let interval = Duration::from_secs(config.interval);
    info!(
        "Polling every {}s, disk usage from {}",
        config.interval, config.disk_path
    );

    let mut poll = PollLoop::new(
        display,
        sensor,
        StatvfsProbe,
        screen,
        PathBuf::from(&config.disk_path),
        interval,
    );

    // Run until interrupted; the loop itself never returns
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = poll.run() => {}
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    // Interruption is a normal shutdown: blank the panel, release it,
    // and exit 0
    let display = poll.display_mut();
    if let Err(e) = display.clear().and_then(|_| display.power_off()) {
        warn!("Failed to release display: {}", e);
    }

    Ok(())
}

/// Resolves a configured font path; relative paths are taken from the
/// executable's directory.
fn resolve_font_path(font: &str) -> PathBuf {
    let path = Path::new(font);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(path)))
        .unwrap_or_else(|| path.to_path_buf())
}
