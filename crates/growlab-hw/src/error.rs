//! Error types for the growlab hardware library.

use thiserror::Error;

use crate::bosch::Chip;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when interacting with the hardware.
#[derive(Error, Debug)]
pub enum Error {
    /// No SSD1306 display responded on any probed bus.
    #[error("OLED display not found on {0}")]
    DisplayNotFound(String),

    /// No sensor with the expected chip id responded on any probed bus.
    #[error("{chip} sensor not found on {bus}")]
    SensorNotFound { chip: Chip, bus: String },

    /// A device answered at the sensor address but with the wrong chip id.
    #[error("unexpected chip id {actual:#04x} (expected {expected:#04x})")]
    UnexpectedChipId { expected: u8, actual: u8 },

    /// I2C transport error.
    #[error("I2C error: {0}")]
    I2c(#[from] i2cdev::linux::LinuxI2CError),

    /// A block read returned fewer bytes than requested.
    #[error("short I2C read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
}
