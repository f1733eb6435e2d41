//! Frame rendering for the monochrome OLED.

mod canvas;
mod text;

pub use canvas::Canvas;
pub use text::TextRenderer;
