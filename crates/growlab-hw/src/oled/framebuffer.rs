//! 1-bpp framebuffer in SSD1306 page layout.
//!
//! The display RAM is organized as 8 horizontal pages of 128 columns.
//! Each byte holds one column of a page, least significant bit on top,
//! so pixel (x, y) lives at byte `(y / 8) * 128 + x`, bit `y % 8`.

use crate::{OLED_HEIGHT, OLED_WIDTH};

/// Size of the packed pixel buffer in bytes.
pub const BUFFER_SIZE: usize = OLED_WIDTH as usize * OLED_HEIGHT as usize / 8;

/// Monochrome framebuffer for the 128x64 display.
#[derive(Clone)]
pub struct Framebuffer {
    data: Vec<u8>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Creates a new framebuffer initialized to all-off.
    pub fn new() -> Self {
        Self {
            data: vec![0; BUFFER_SIZE],
        }
    }

    /// Returns the width of the framebuffer.
    pub fn width(&self) -> u16 {
        OLED_WIDTH
    }

    /// Returns the height of the framebuffer.
    pub fn height(&self) -> u16 {
        OLED_HEIGHT
    }

    /// Returns a reference to the packed pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Switches every pixel off.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Sets or clears a pixel. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: u16, y: u16, on: bool) {
        if x < OLED_WIDTH && y < OLED_HEIGHT {
            let idx = (y as usize / 8) * OLED_WIDTH as usize + x as usize;
            let bit = 1u8 << (y % 8);
            if on {
                self.data[idx] |= bit;
            } else {
                self.data[idx] &= !bit;
            }
        }
    }

    /// Gets a pixel at the given coordinates.
    pub fn get_pixel(&self, x: u16, y: u16) -> Option<bool> {
        if x < OLED_WIDTH && y < OLED_HEIGHT {
            let idx = (y as usize / 8) * OLED_WIDTH as usize + x as usize;
            Some(self.data[idx] & (1 << (y % 8)) != 0)
        } else {
            None
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_packing() {
        let mut fb = Framebuffer::new();

        fb.set_pixel(0, 0, true);
        assert_eq!(fb.data()[0], 0b0000_0001);

        // (5, 10) is page 1, bit 2
        fb.set_pixel(5, 10, true);
        assert_eq!(fb.data()[128 + 5], 0b0000_0100);
        assert_eq!(fb.get_pixel(5, 10), Some(true));

        fb.set_pixel(5, 10, false);
        assert_eq!(fb.get_pixel(5, 10), Some(false));
    }

    #[test]
    fn test_bounds() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(128, 0, true);
        fb.set_pixel(0, 64, true);
        assert!(fb.data().iter().all(|&b| b == 0));
        assert_eq!(fb.get_pixel(128, 0), None);
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(64, 32, true);
        fb.clear();
        assert_eq!(fb.get_pixel(64, 32), Some(false));
        assert_eq!(fb.data().len(), BUFFER_SIZE);
    }
}
