//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sensor variant identifier: "bme280", "bmp280", or "none".
    /// Overridden by the SENSOR_TYPE environment variable.
    #[serde(default = "default_sensor")]
    pub sensor: String,

    /// Poll interval between render cycles, in seconds.
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Filesystem path probed for disk usage.
    #[serde(default = "default_disk_path")]
    pub disk_path: String,

    /// Optional TTF font path, resolved relative to the executable.
    /// When unset the bundled DejaVu Sans Mono is used.
    #[serde(default)]
    pub font: Option<String>,

    /// I2C configuration.
    #[serde(default)]
    pub i2c: I2cConfig,
}

/// I2C bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I2cConfig {
    /// Bus device path, or "auto" to probe the usual buses.
    #[serde(default = "default_i2c_bus")]
    pub bus: String,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            bus: default_i2c_bus(),
        }
    }
}

// Default value functions
fn default_sensor() -> String {
    "bme280".to_string()
}

fn default_interval() -> u64 {
    5
}

fn default_disk_path() -> String {
    "/".to_string()
}

fn default_i2c_bus() -> String {
    "auto".to_string()
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensor: default_sensor(),
            interval: default_interval(),
            disk_path: default_disk_path(),
            font: None,
            i2c: I2cConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sensor, "bme280");
        assert_eq!(config.interval, 5);
        assert_eq!(config.disk_path, "/");
        assert_eq!(config.i2c.bus, "auto");
        assert!(config.font.is_none());
    }

    #[test]
    fn test_parse_partial() {
        let config: Config = toml::from_str(
            r#"
            sensor = "none"

            [i2c]
            bus = "/dev/i2c-3"
            "#,
        )
        .unwrap();
        assert_eq!(config.sensor, "none");
        assert_eq!(config.interval, 5);
        assert_eq!(config.i2c.bus, "/dev/i2c-3");
    }

    #[test]
    fn test_parse_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.sensor, "bme280");
    }

    #[test]
    fn test_shipped_default_config() {
        let config: Config =
            toml::from_str(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(config.sensor, Config::default().sensor);
        assert_eq!(config.interval, Config::default().interval);
        assert_eq!(config.i2c.bus, Config::default().i2c.bus);
    }
}
