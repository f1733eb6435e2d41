//! Text rendering using fontdue.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use fontdue::{Font, FontSettings};
use tiny_skia::Pixmap;

/// Bundled DejaVu Sans Mono font.
const FONT_DATA: &[u8] = include_bytes!("../../fonts/DejaVuSansMono.ttf");

/// Glyph coverage at or above this counts as an on pixel. The target is a
/// 1-bit panel, so anti-aliased edges are snapped rather than blended.
const COVERAGE_CUTOFF: u8 = 128;

/// Text renderer rasterizing white-on-black glyphs for the mono display.
pub struct TextRenderer {
    font: Font,
}

impl TextRenderer {
    /// Creates a text renderer with the bundled font.
    pub fn new() -> Self {
        let font = Font::from_bytes(FONT_DATA, FontSettings::default())
            .expect("Failed to load bundled font");
        Self { font }
    }

    /// Creates a text renderer from a TTF file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font file {}", path.display()))?;
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| anyhow!("Failed to parse font file {}: {}", path.display(), e))?;
        Ok(Self { font })
    }

    /// Draws text onto a pixmap at the specified position.
    ///
    /// `y` is the top edge of the line. Pixels are either full white or
    /// left untouched; the canvas thresholds the pixmap into the 1-bpp
    /// framebuffer afterwards.
    pub fn draw_text(&self, pixmap: &mut Pixmap, x: i32, y: i32, text: &str, size: f32) {
        let mut cursor_x = x;

        for ch in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, size);

            for glyph_y in 0..metrics.height {
                for glyph_x in 0..metrics.width {
                    if bitmap[glyph_y * metrics.width + glyph_x] < COVERAGE_CUTOFF {
                        continue;
                    }
                    let px = cursor_x + metrics.xmin + glyph_x as i32;
                    let py =
                        y + (size as i32 - metrics.ymin - metrics.height as i32) + glyph_y as i32;

                    if px >= 0
                        && py >= 0
                        && (px as u32) < pixmap.width()
                        && (py as u32) < pixmap.height()
                    {
                        let idx = (py as u32 * pixmap.width() + px as u32) as usize * 4;
                        pixmap.data_mut()[idx..idx + 4].copy_from_slice(&[255, 255, 255, 255]);
                    }
                }
            }

            cursor_x += metrics.advance_width as i32;
        }
    }

    /// Returns the width of text when rendered at the specified size.
    pub fn text_width(&self, text: &str, size: f32) -> i32 {
        text.chars()
            .map(|ch| {
                let (metrics, _) = self.font.rasterize(ch, size);
                metrics.advance_width as i32
            })
            .sum()
    }

}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}
