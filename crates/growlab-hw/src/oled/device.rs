//! OLED device communication via Linux I2C.

use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use tracing::{debug, info};

use crate::{bus_candidates, Error, Result};

use super::framebuffer::Framebuffer;
use super::protocol::{addressing_frame, command_frame, data_frames, init_sequence, Command};

/// I2C addresses at which SSD1306 modules commonly answer.
pub const OLED_ADDRESSES: [u16; 2] = [0x3C, 0x3D];

/// SSD1306 OLED display controller.
pub struct OledDevice {
    i2c: LinuxI2CDevice,
}

impl OledDevice {
    /// Opens the display on the given I2C bus, or probes the usual buses
    /// when `bus` is `"auto"`. The panel is initialized and switched on.
    pub fn open(bus: &str) -> Result<Self> {
        for candidate in bus_candidates(bus) {
            for addr in OLED_ADDRESSES {
                match Self::open_at(&candidate, addr) {
                    Ok(device) => {
                        info!("OLED display opened on {} at {:#04x}", candidate, addr);
                        return Ok(device);
                    }
                    Err(e) => {
                        debug!("no display on {} at {:#04x}: {}", candidate, addr, e);
                    }
                }
            }
        }
        Err(Error::DisplayNotFound(bus.to_string()))
    }

    fn open_at(bus: &str, addr: u16) -> Result<Self> {
        let mut i2c = LinuxI2CDevice::new(bus, addr)?;
        // The init write doubles as the presence probe: an absent device
        // NAKs the first byte.
        i2c.write(&init_sequence())?;
        let mut device = Self { i2c };
        device.redraw(&Framebuffer::new())?;
        Ok(device)
    }

    /// Pushes a complete framebuffer to the display.
    ///
    /// The addressing window is reset first, so the data stream always
    /// fills the panel RAM from the top-left corner; the previous frame
    /// stays visible until the write completes.
    pub fn redraw(&mut self, framebuffer: &Framebuffer) -> Result<()> {
        self.i2c.write(&addressing_frame())?;
        for frame in data_frames(framebuffer.data()) {
            self.i2c.write(&frame)?;
        }
        debug!("full redraw completed ({} bytes)", framebuffer.data().len());
        Ok(())
    }

    /// Clears the display to all-off pixels.
    pub fn clear(&mut self) -> Result<()> {
        self.redraw(&Framebuffer::new())
    }

    /// Switches the panel off. Called on shutdown to release the display
    /// in a known state.
    pub fn power_off(&mut self) -> Result<()> {
        self.i2c.write(&command_frame(Command::DisplayOff))?;
        info!("OLED display powered off");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Hardware tests are skipped by default
    #[test]
    #[ignore]
    fn test_device_open() {
        let device = OledDevice::open("auto");
        assert!(device.is_ok());
    }
}
