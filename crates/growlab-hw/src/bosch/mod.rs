//! Bosch environmental sensor module.
//!
//! Drives the BMP280 (temperature/pressure) and BME280
//! (temperature/pressure/humidity) over Linux I2C. The two chips share a
//! register map; the BME280 adds humidity trim and data registers.

mod calibration;
mod device;

pub use calibration::Calibration;
pub use device::BoschSensor;

use std::fmt;

/// Supported sensor chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    Bmp280,
    Bme280,
}

impl Chip {
    /// The chip id reported by register 0xD0.
    pub fn id(&self) -> u8 {
        match self {
            Chip::Bmp280 => 0x58,
            Chip::Bme280 => 0x60,
        }
    }

    /// Whether the chip carries a humidity sensing element.
    pub fn has_humidity(&self) -> bool {
        matches!(self, Chip::Bme280)
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chip::Bmp280 => write!(f, "BMP280"),
            Chip::Bme280 => write!(f, "BME280"),
        }
    }
}

/// One compensated measurement set.
#[derive(Debug, Clone, Copy)]
pub struct Measurements {
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Pressure in hectopascals.
    pub pressure: f64,
    /// Relative humidity in percent; `None` on chips without a humidity
    /// element.
    pub humidity: Option<f64>,
}
