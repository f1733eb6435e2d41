//! Drawing surface for the display framebuffer.

use growlab_hw::Framebuffer;
use tiny_skia::{Color, Pixmap};

use super::text::TextRenderer;

/// Luminance at or above this maps to an on pixel in the 1-bpp output.
const LUMA_CUTOFF: u16 = 128;

/// Canvas for composing a frame before it is packed for the panel.
pub struct Canvas {
    width: u32,
    height: u32,
    pixmap: Pixmap,
    text_renderer: TextRenderer,
}

impl Canvas {
    /// Creates a new canvas.
    pub fn new(width: u32, height: u32, text_renderer: TextRenderer) -> Self {
        let pixmap = Pixmap::new(width, height).expect("Failed to create pixmap");
        Self {
            width,
            height,
            pixmap,
            text_renderer,
        }
    }

    /// Returns the canvas dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Clears the canvas to black.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::BLACK);
    }

    /// Draws white text with its top edge at the given position.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, size: f32) {
        self.text_renderer
            .draw_text(&mut self.pixmap, x, y, text, size);
    }

    /// Thresholds the canvas into the monochrome framebuffer.
    pub fn render_to_framebuffer(&self, fb: &mut Framebuffer) {
        for (i, pixel) in self.pixmap.pixels().iter().enumerate() {
            let x = (i as u32 % self.width) as u16;
            let y = (i as u32 / self.width) as u16;
            let luma =
                (pixel.red() as u16 + pixel.green() as u16 + pixel.blue() as u16) / 3;
            fb.set_pixel(x, y, luma >= LUMA_CUTOFF);
        }
    }
}
