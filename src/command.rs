//! SSD1306 command set
//!
//! Every command starts with an opcode byte sent in a control burst, followed by
//! a fixed number of parameter bytes in the same burst. The parameter count is a
//! property of the opcode, so it lives next to each variant in
//! [`Opcode::param_count`]. The display start line is the one exception: it is
//! range-encoded into the low 6 bits of opcodes `0x40..=0x7F` and takes no
//! parameters.
//!
//! ## Bus framing
//!
//! Over I2C every transaction starts with a control byte:
//! - [`CONTROL_COMMAND_STREAM`] (`0x00`): the remaining bytes are commands
//! - [`CONTROL_DATA_STREAM`] (`0x40`): the remaining bytes are GDDRAM data
//!
//! ## Example
//!
//! ```
//! use ssd1306_gfx::command::{decode, Command, Opcode};
//!
//! assert_eq!(decode(0x21), Some(Command::Op(Opcode::SetColumnAddress)));
//! assert_eq!(Opcode::SetColumnAddress.param_count(), 2);
//!
//! // Start line 5 is encoded in the opcode itself
//! assert_eq!(decode(0x45), Some(Command::StartLine(5)));
//!
//! // Unknown opcodes decode to nothing
//! assert_eq!(decode(0xFF), None);
//! ```

/// Control byte announcing a command stream
pub const CONTROL_COMMAND_STREAM: u8 = 0x00;

/// Control byte announcing a data stream
pub const CONTROL_DATA_STREAM: u8 = 0x40;

/// First opcode of the set-start-line range (`0x40 | line`)
pub const SET_START_LINE: u8 = 0x40;

/// Mask selecting the start line inside a set-start-line opcode
pub const START_LINE_MASK: u8 = 0x3F;

/// Maximum number of parameter bytes any opcode takes
pub const MAX_PARAMS: usize = 6;

/// Number of display clocks per row (2 + 2 + 50 phase clocks)
pub const DISPLAY_CLOCKS_PER_ROW: u32 = 54;

/// Oscillator frequencies in kHz, indexed by the 4-bit frequency code of
/// [`Opcode::SetDisplayClockDivider`]
pub const OSC_FREQUENCY_KHZ: [u16; 16] = [
    270, 279, 289, 298, 314, 326, 337, 352, 372, 391, 409, 431, 451, 477, 506, 536,
];

/// Power-on reset value of the oscillator frequency code
pub const DEFAULT_OSC_FREQUENCY: u8 = 0x8;

/// SSD1306 opcodes
///
/// Only opcodes that take parameters or change observable controller state
/// are listed; anything else is treated as unknown by the emulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Memory addressing mode: `[mode]` (0 = horizontal, 1 = vertical, 2 = page)
    SetMemoryAddressingMode = 0x20,
    /// Column window: `[start, end]`
    SetColumnAddress = 0x21,
    /// Page window: `[start, end]`
    SetPageAddress = 0x22,
    /// Continuous right scroll: `[0x00, start_page, interval, end_page, 0x00, 0xFF]`
    RightHorizontalScroll = 0x26,
    /// Continuous left scroll: `[0x00, start_page, interval, end_page, 0x00, 0xFF]`
    LeftHorizontalScroll = 0x27,
    /// Vertical and right scroll: `[0x00, start_page, interval, end_page, vertical_offset]`
    VerticalRightScroll = 0x29,
    /// Vertical and left scroll: `[0x00, start_page, interval, end_page, vertical_offset]`
    VerticalLeftScroll = 0x2A,
    /// Stop scrolling
    DeactivateScroll = 0x2E,
    /// Start scrolling with the last configured parameters
    ActivateScroll = 0x2F,
    /// Contrast: `[level]`
    SetContrast = 0x81,
    /// Charge pump: `[0x14 on | 0x10 off]`
    ChargePump = 0x8D,
    /// Column 0 mapped to SEG0
    SegmentRemapNormal = 0xA0,
    /// Column 127 mapped to SEG0
    SegmentRemapInverse = 0xA1,
    /// Vertical scroll area: `[start_row, num_rows]`
    SetVerticalScrollArea = 0xA3,
    /// Display follows RAM content
    EntireDisplayOnResume = 0xA4,
    /// All pixels on regardless of RAM content
    EntireDisplayOn = 0xA5,
    /// Set bit = pixel on
    NormalDisplay = 0xA6,
    /// Set bit = pixel off
    InverseDisplay = 0xA7,
    /// Multiplex ratio: `[rows - 1]`
    SetMultiplexRatio = 0xA8,
    /// Panel off (sleep)
    DisplayOff = 0xAE,
    /// Panel on
    DisplayOn = 0xAF,
    /// COM scan from COM0 to COM[N-1]
    ComScanIncrement = 0xC0,
    /// COM scan from COM[N-1] to COM0
    ComScanDecrement = 0xC8,
    /// Vertical shift: `[offset]`
    SetDisplayOffset = 0xD3,
    /// Clock: `[osc << 4 | divide_ratio]`
    SetDisplayClockDivider = 0xD5,
    /// Pre-charge period: `[phase2 << 4 | phase1]`
    SetPrechargePeriod = 0xD9,
    /// COM pins hardware configuration: `[config]`
    SetComPins = 0xDA,
    /// VCOMH deselect level: `[level]`
    SetVcomhDeselect = 0xDB,
    /// No operation
    Nop = 0xE3,
}

impl Opcode {
    /// Number of parameter bytes following this opcode
    pub const fn param_count(self) -> usize {
        match self {
            Self::SetMemoryAddressingMode => 1,
            Self::SetColumnAddress => 2,
            Self::SetPageAddress => 2,
            Self::RightHorizontalScroll | Self::LeftHorizontalScroll => 6,
            Self::VerticalRightScroll | Self::VerticalLeftScroll => 5,
            Self::DeactivateScroll | Self::ActivateScroll => 0,
            Self::SetContrast => 1,
            Self::ChargePump => 1,
            Self::SegmentRemapNormal | Self::SegmentRemapInverse => 0,
            Self::SetVerticalScrollArea => 2,
            Self::EntireDisplayOnResume | Self::EntireDisplayOn => 0,
            Self::NormalDisplay | Self::InverseDisplay => 0,
            Self::SetMultiplexRatio => 1,
            Self::DisplayOff | Self::DisplayOn => 0,
            Self::ComScanIncrement | Self::ComScanDecrement => 0,
            Self::SetDisplayOffset => 1,
            Self::SetDisplayClockDivider => 1,
            Self::SetPrechargePeriod => 1,
            Self::SetComPins => 1,
            Self::SetVcomhDeselect => 1,
            Self::Nop => 0,
        }
    }

    /// Opcode byte as sent on the bus
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Look up an opcode byte
    ///
    /// Returns `None` for unknown bytes and for the start-line range, which is
    /// handled by [`decode`].
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x20 => Self::SetMemoryAddressingMode,
            0x21 => Self::SetColumnAddress,
            0x22 => Self::SetPageAddress,
            0x26 => Self::RightHorizontalScroll,
            0x27 => Self::LeftHorizontalScroll,
            0x29 => Self::VerticalRightScroll,
            0x2A => Self::VerticalLeftScroll,
            0x2E => Self::DeactivateScroll,
            0x2F => Self::ActivateScroll,
            0x81 => Self::SetContrast,
            0x8D => Self::ChargePump,
            0xA0 => Self::SegmentRemapNormal,
            0xA1 => Self::SegmentRemapInverse,
            0xA3 => Self::SetVerticalScrollArea,
            0xA4 => Self::EntireDisplayOnResume,
            0xA5 => Self::EntireDisplayOn,
            0xA6 => Self::NormalDisplay,
            0xA7 => Self::InverseDisplay,
            0xA8 => Self::SetMultiplexRatio,
            0xAE => Self::DisplayOff,
            0xAF => Self::DisplayOn,
            0xC0 => Self::ComScanIncrement,
            0xC8 => Self::ComScanDecrement,
            0xD3 => Self::SetDisplayOffset,
            0xD5 => Self::SetDisplayClockDivider,
            0xD9 => Self::SetPrechargePeriod,
            0xDA => Self::SetComPins,
            0xDB => Self::SetVcomhDeselect,
            0xE3 => Self::Nop,
            _ => return None,
        })
    }
}

/// A decoded opcode byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Set display start line (`0x40..=0x7F`), applied immediately
    StartLine(u8),
    /// Regular opcode, followed by [`Opcode::param_count`] parameter bytes
    Op(Opcode),
}

/// Decode an opcode byte
pub const fn decode(byte: u8) -> Option<Command> {
    if byte >= SET_START_LINE && byte <= SET_START_LINE | START_LINE_MASK {
        return Some(Command::StartLine(byte & START_LINE_MASK));
    }
    match Opcode::from_byte(byte) {
        Some(op) => Some(Command::Op(op)),
        None => None,
    }
}

/// GDDRAM addressing mode selected by [`Opcode::SetMemoryAddressingMode`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum AddressingMode {
    /// Column advances first, then page
    #[default]
    Horizontal = 0x0,
    /// Page advances first, then column
    Vertical = 0x1,
    /// Column advances within the column window, page never changes
    Page = 0x2,
}

impl AddressingMode {
    /// Decode the mode parameter byte (only the low two bits are significant)
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0b11 {
            0x0 => Some(Self::Horizontal),
            0x1 => Some(Self::Vertical),
            0x2 => Some(Self::Page),
            _ => None,
        }
    }
}

/// Scroll step interval, encoded as a 3-bit time-interval code
///
/// Variant names give the panel's frame count per step. The software
/// controller steps at its own rates, listed in
/// [`SCROLL_FRAME_INTERVAL`](crate::emulator::SCROLL_FRAME_INTERVAL).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ScrollInterval {
    /// Code `0b000`
    #[default]
    Frames5 = 0b000,
    /// Code `0b001`
    Frames64 = 0b001,
    /// Code `0b010`
    Frames128 = 0b010,
    /// Code `0b011`
    Frames256 = 0b011,
    /// Code `0b100`
    Frames3 = 0b100,
    /// Code `0b101`
    Frames4 = 0b101,
    /// Code `0b110`
    Frames25 = 0b110,
    /// Code `0b111`
    Frames2 = 0b111,
}

impl ScrollInterval {
    /// 3-bit code sent as the interval parameter
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Direction of the horizontal part of a scroll
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Content moves towards higher columns
    #[default]
    Right,
    /// Content moves towards lower columns
    Left,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_opcode_round_trips_through_from_byte() {
        for byte in 0..=u8::MAX {
            if let Some(op) = Opcode::from_byte(byte) {
                assert_eq!(op.byte(), byte);
                assert!(op.param_count() <= MAX_PARAMS);
            }
        }
    }

    #[test]
    fn test_start_line_range() {
        assert_eq!(decode(0x40), Some(Command::StartLine(0)));
        assert_eq!(decode(0x7F), Some(Command::StartLine(63)));
        assert_eq!(decode(0x3F), None);
        assert_eq!(decode(0x80), None);
    }

    #[test]
    fn test_scroll_param_counts() {
        assert_eq!(Opcode::RightHorizontalScroll.param_count(), 6);
        assert_eq!(Opcode::VerticalLeftScroll.param_count(), 5);
        assert_eq!(Opcode::SetVerticalScrollArea.param_count(), 2);
        assert_eq!(Opcode::ActivateScroll.param_count(), 0);
    }

    #[test]
    fn test_addressing_mode_from_bits() {
        assert_eq!(AddressingMode::from_bits(0), Some(AddressingMode::Horizontal));
        assert_eq!(AddressingMode::from_bits(1), Some(AddressingMode::Vertical));
        assert_eq!(AddressingMode::from_bits(2), Some(AddressingMode::Page));
        assert_eq!(AddressingMode::from_bits(3), None);
        assert_eq!(AddressingMode::from_bits(0xFE), Some(AddressingMode::Page));
    }
}
