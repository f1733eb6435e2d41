//! Growlab Hardware Library
//!
//! Provides hardware access for the growlab monitor: an SSD1306 128x64
//! OLED display and Bosch BMP280/BME280 environmental sensors, both on
//! the Linux I2C bus.

pub mod bosch;
pub mod error;
pub mod oled;

pub use bosch::{BoschSensor, Chip, Measurements};
pub use error::{Error, Result};
pub use oled::{Framebuffer, OledDevice};

/// OLED display dimensions
pub const OLED_WIDTH: u16 = 128;
pub const OLED_HEIGHT: u16 = 64;

/// I2C buses probed when a device path is set to "auto".
pub const I2C_BUS_CANDIDATES: [&str; 2] = ["/dev/i2c-1", "/dev/i2c-0"];

/// Expands a configured bus path into the list of buses to probe.
pub(crate) fn bus_candidates(bus: &str) -> Vec<String> {
    if bus == "auto" {
        I2C_BUS_CANDIDATES.iter().map(|b| b.to_string()).collect()
    } else {
        vec![bus.to_string()]
    }
}
