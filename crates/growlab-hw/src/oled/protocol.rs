//! SSD1306 command encoding.
//!
//! Every I2C write starts with a control byte: 0x00 introduces a command
//! stream, 0x40 introduces display RAM data. Commands and their operands
//! follow the SSD1306 datasheet.

use crate::{OLED_HEIGHT, OLED_WIDTH};

/// Control byte introducing a command stream.
pub const CONTROL_COMMAND: u8 = 0x00;

/// Control byte introducing a data stream.
pub const CONTROL_DATA: u8 = 0x40;

/// Display RAM pages (8 pixel rows each).
pub const PAGE_COUNT: usize = OLED_HEIGHT as usize / 8;

/// Payload bytes carried per data write.
pub const DATA_CHUNK: usize = 32;

/// SSD1306 commands used by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    DisplayOff = 0xAE,
    DisplayOn = 0xAF,
    SetClockDivide = 0xD5,
    SetMultiplex = 0xA8,
    SetDisplayOffset = 0xD3,
    SetStartLine = 0x40,
    ChargePump = 0x8D,
    MemoryMode = 0x20,
    SegmentRemap = 0xA1,
    ComScanDecrement = 0xC8,
    SetComPins = 0xDA,
    SetContrast = 0x81,
    SetPrecharge = 0xD9,
    SetVcomDetect = 0xDB,
    ResumeFromRam = 0xA4,
    NormalDisplay = 0xA6,
    ColumnAddress = 0x21,
    PageAddress = 0x22,
}

/// Builds the power-on initialization sequence for a 128x64 panel.
pub fn init_sequence() -> Vec<u8> {
    vec![
        CONTROL_COMMAND,
        Command::DisplayOff as u8,
        Command::SetClockDivide as u8,
        0x80,
        Command::SetMultiplex as u8,
        (OLED_HEIGHT - 1) as u8,
        Command::SetDisplayOffset as u8,
        0x00,
        Command::SetStartLine as u8,
        Command::ChargePump as u8,
        0x14, // internal charge pump enabled
        Command::MemoryMode as u8,
        0x00, // horizontal addressing
        Command::SegmentRemap as u8,
        Command::ComScanDecrement as u8,
        Command::SetComPins as u8,
        0x12,
        Command::SetContrast as u8,
        0xCF,
        Command::SetPrecharge as u8,
        0xF1,
        Command::SetVcomDetect as u8,
        0x40,
        Command::ResumeFromRam as u8,
        Command::NormalDisplay as u8,
        Command::DisplayOn as u8,
    ]
}

/// Builds the addressing window covering the whole display.
///
/// Must precede the data stream of a full redraw; the RAM pointer wraps
/// within this window, so a complete write always lands as one frame.
pub fn addressing_frame() -> Vec<u8> {
    vec![
        CONTROL_COMMAND,
        Command::ColumnAddress as u8,
        0,
        (OLED_WIDTH - 1) as u8,
        Command::PageAddress as u8,
        0,
        (PAGE_COUNT - 1) as u8,
    ]
}

/// Builds a single-command frame.
pub fn command_frame(command: Command) -> [u8; 2] {
    [CONTROL_COMMAND, command as u8]
}

/// Splits display RAM data into prefixed write frames.
pub fn data_frames(data: &[u8]) -> Vec<Vec<u8>> {
    data.chunks(DATA_CHUNK)
        .map(|chunk| {
            let mut frame = Vec::with_capacity(chunk.len() + 1);
            frame.push(CONTROL_DATA);
            frame.extend_from_slice(chunk);
            frame
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_sequence() {
        let seq = init_sequence();
        assert_eq!(seq[0], CONTROL_COMMAND);
        assert_eq!(seq[1], Command::DisplayOff as u8);
        // The panel is switched on last
        assert_eq!(*seq.last().unwrap(), Command::DisplayOn as u8);
    }

    #[test]
    fn test_addressing_frame() {
        let frame = addressing_frame();
        assert_eq!(
            frame,
            vec![0x00, 0x21, 0, 127, 0x22, 0, 7],
        );
    }

    #[test]
    fn test_command_frame() {
        assert_eq!(command_frame(Command::DisplayOff), [0x00, 0xAE]);
    }

    #[test]
    fn test_data_frames() {
        let data = vec![0xAB; 1024];
        let frames = data_frames(&data);
        assert_eq!(frames.len(), 1024 / DATA_CHUNK);
        for frame in &frames {
            assert_eq!(frame[0], CONTROL_DATA);
            assert_eq!(frame.len(), DATA_CHUNK + 1);
        }

        // A trailing partial chunk keeps its size
        let frames = data_frames(&[0u8; 40]);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].len(), 8 + 1);
    }
}
