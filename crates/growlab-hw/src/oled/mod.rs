//! OLED display module.
//!
//! Drives an SSD1306 128x64 monochrome OLED over Linux I2C.

mod device;
mod protocol;

pub mod framebuffer;

pub use device::OledDevice;
pub use framebuffer::Framebuffer;
