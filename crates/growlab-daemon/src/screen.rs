//! Fixed five-line screen layout.
//!
//! Layout (128x64):
//! ```text
//! Time: 18:45:12
//! Temp: 23.5 C
//! Humidity: 48.2%
//! Pressure: 1006.5 hPa
//! SD:  476M 42%
//! ```

use std::path::Path;

use anyhow::Result;
use growlab_hw::{Framebuffer, OLED_HEIGHT, OLED_WIDTH};

use crate::rendering::{Canvas, TextRenderer};
use crate::sensors::disk::{humanize_bytes, DiskStats};
use crate::sensors::Reading;

/// Display-safe substitute for an unavailable measurement.
const PLACEHOLDER: &str = "n/a";

const FONT_SIZE: f32 = 10.0;

/// Top edge of each of the five lines.
const LINE_YS: [i32; 5] = [0, 13, 26, 39, 52];

/// Renders readings into complete frames for the display.
pub struct Screen {
    canvas: Canvas,
    frame: Framebuffer,
}

impl Screen {
    /// Creates a screen using the bundled font.
    pub fn new() -> Self {
        Self::with_renderer(TextRenderer::new())
    }

    /// Creates a screen with a font loaded from a TTF file.
    pub fn from_font_file(path: &Path) -> Result<Self> {
        Ok(Self::with_renderer(TextRenderer::from_file(path)?))
    }

    fn with_renderer(text_renderer: TextRenderer) -> Self {
        Self {
            canvas: Canvas::new(OLED_WIDTH as u32, OLED_HEIGHT as u32, text_renderer),
            frame: Framebuffer::new(),
        }
    }

    /// Formats the five display lines, in fixed order: time, temperature,
    /// humidity, pressure, disk. Pure, so layout tests need no display.
    pub fn lines(reading: &Reading, disk: Option<&DiskStats>) -> [String; 5] {
        [
            format!("Time: {}", reading.time),
            format!("Temp: {} C", format_measurement(reading.temperature, 3)),
            format!("Humidity: {}%", format_measurement(reading.humidity, 3)),
            format!("Pressure: {} hPa", format_measurement(reading.pressure, 5)),
            match disk {
                Some(stats) => format!(
                    "SD:  {} {:.0}%",
                    humanize_bytes(stats.used_bytes),
                    stats.percent
                ),
                None => format!("SD:  {}", PLACEHOLDER),
            },
        ]
    }

    /// Composes one complete frame from a reading and disk stats.
    pub fn render(&mut self, reading: &Reading, disk: Option<&DiskStats>) -> &Framebuffer {
        self.canvas.clear();
        for (line, y) in Self::lines(reading, disk).iter().zip(LINE_YS) {
            self.canvas.draw_text(0, y, line, FONT_SIZE);
        }
        self.canvas.render_to_framebuffer(&mut self.frame);
        &self.frame
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a measurement to the given number of significant digits, or the
/// placeholder when the measurement is absent.
fn format_measurement(value: Option<f64>, significant: i32) -> String {
    let Some(value) = value else {
        return PLACEHOLDER.to_string();
    };
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let magnitude = if value == 0.0 {
        0
    } else {
        value.abs().log10().floor() as i32
    };
    let decimals = (significant - 1 - magnitude).max(0) as usize;
    format!("{value:.decimals$}")
}
