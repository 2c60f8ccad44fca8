//! Software SSD1306
//!
//! [`Emulator`] decodes the same command and data byte stream a real panel
//! receives and keeps its own GDDRAM, so drawing code can be exercised on the
//! host. It implements [`Transport`], which makes `Device<Emulator>` a complete
//! simulation:
//!
//! ```
//! use ssd1306_gfx::{Builder, Color, Device, Emulator, PanelType};
//!
//! let config = match Builder::new().panel(PanelType::Ssd1306_128x64).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let mut device = Device::new(Emulator::new(128, 64), config);
//! if device.init().is_err() {
//!     return;
//! }
//!
//! device.framebuffer_mut().write_pixel(3, 9, Color::White);
//! let _ = device.refresh(false);
//!
//! assert!(device.transport().get_pixel(3, 9));
//! assert!(device.transport().registers().display_on);
//! ```
//!
//! ## Decoder
//!
//! Command bytes run through a two-state machine: an opcode either applies at
//! once or waits for its [`Opcode::param_count`] parameter bytes, which may
//! arrive over several bursts. Start-line opcodes (`0x40..=0x7F`) apply
//! immediately. Unknown opcodes are logged and skipped.
//!
//! ## Scrolling
//!
//! Scrolling is frame based. Each [`Emulator::tick`] is one panel frame; once
//! the frame counter exceeds the configured interval, every page in the scroll
//! range rotates by one column. Diagonal scrolls also advance a vertical
//! offset that [`Emulator::get_pixel`] applies when reading.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use log::{trace, warn};

use crate::command::{
    AddressingMode, Command, DEFAULT_OSC_FREQUENCY, DISPLAY_CLOCKS_PER_ROW, MAX_PARAMS,
    OSC_FREQUENCY_KHZ, Opcode, ScrollDirection, decode,
};
use crate::config::{MAX_COLUMNS, MAX_ROWS, MIN_ROWS};
use crate::interface::Transport;

/// Frames per scroll step, indexed by the 3-bit interval code
///
/// These are the emulator's own step rates and do not follow the frame
/// counts in the [`ScrollInterval`](crate::command::ScrollInterval) variant
/// names: code `0b001` (`Frames64`) steps every 33 ticks, for instance.
pub const SCROLL_FRAME_INTERVAL: [u32; 8] = [6, 32, 64, 128, 3, 4, 5, 2];

/// Power-on contrast
const DEFAULT_CONTRAST: u8 = 0x7F;
/// Power-on pre-charge period
const DEFAULT_PRECHARGE: u8 = 0x22;
/// Power-on VCOMH deselect level
const DEFAULT_VCOMH: u8 = 0x20;
/// Power-on COM pins configuration
const DEFAULT_COM_PINS: u8 = 0x12;

/// Decoder state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Decoder {
    AwaitingOpcode,
    AwaitingParams(Opcode),
}

/// Kind of the configured scroll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollMode {
    /// Columns rotate, rows stay
    Horizontal(ScrollDirection),
    /// Columns rotate and the scroll area moves vertically
    Diagonal(ScrollDirection),
}

impl ScrollMode {
    /// Horizontal direction of either mode
    pub fn direction(self) -> ScrollDirection {
        match self {
            Self::Horizontal(direction) | Self::Diagonal(direction) => direction,
        }
    }
}

/// Scroll configuration and progress
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollState {
    /// Whether scrolling is active
    pub enabled: bool,
    /// Last configured scroll, `None` before any setup
    pub mode: Option<ScrollMode>,
    /// First scrolled page
    pub page_start: u8,
    /// Last scrolled page (inclusive)
    pub page_end: u8,
    /// 3-bit interval code, see [`SCROLL_FRAME_INTERVAL`]
    pub interval: u8,
    /// Rows the scroll area moves per step (diagonal only)
    pub vertical_increment: u8,
    /// First row of the vertical scroll area
    pub vertical_start: u8,
    /// Number of rows in the vertical scroll area
    pub vertical_rows: u8,
    /// Current vertical offset inside the scroll area
    pub vertical_offset: u8,
    /// Frames since the last step
    pub frame_counter: u32,
}

impl ScrollState {
    fn new(rows: u16) -> Self {
        Self {
            enabled: false,
            mode: None,
            page_start: 0,
            page_end: 0,
            interval: 0,
            vertical_increment: 0,
            vertical_start: 0,
            vertical_rows: rows as u8,
            vertical_offset: 0,
            frame_counter: 0,
        }
    }

    fn is_diagonal(&self) -> bool {
        self.enabled && matches!(self.mode, Some(ScrollMode::Diagonal(_)))
    }
}

/// Controller registers that do not affect GDDRAM addressing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registers {
    /// Panel switched on (`0xAF`)
    pub display_on: bool,
    /// Set bit = pixel off (`0xA7`)
    pub inverse: bool,
    /// All pixels on regardless of RAM (`0xA5`)
    pub entire_display_on: bool,
    /// Contrast level
    pub contrast: u8,
    /// Display start line
    pub start_line: u8,
    /// Vertical display offset
    pub display_offset: u8,
    /// Column 127 mapped to SEG0 (`0xA1`)
    pub segment_remap: bool,
    /// COM scan from COM[N-1] to COM0 (`0xC8`)
    pub com_scan_reversed: bool,
    /// Charge pump enabled
    pub charge_pump: bool,
    /// Pre-charge period byte
    pub precharge: u8,
    /// VCOMH deselect level byte
    pub vcomh: u8,
    /// COM pins configuration byte
    pub com_pins: u8,
    /// Multiplex ratio as sent (rows - 1)
    pub multiplex_ratio: u8,
    /// 4-bit oscillator frequency code
    pub osc_frequency: u8,
    /// 4-bit clock divide ratio (divider - 1)
    pub clock_divide: u8,
}

impl Registers {
    fn new(rows: u16) -> Self {
        Self {
            display_on: false,
            inverse: false,
            entire_display_on: false,
            contrast: DEFAULT_CONTRAST,
            start_line: 0,
            display_offset: 0,
            segment_remap: false,
            com_scan_reversed: false,
            charge_pump: false,
            precharge: DEFAULT_PRECHARGE,
            vcomh: DEFAULT_VCOMH,
            com_pins: DEFAULT_COM_PINS,
            multiplex_ratio: (rows - 1) as u8,
            osc_frequency: DEFAULT_OSC_FREQUENCY,
            clock_divide: 0,
        }
    }
}

/// GDDRAM address window and cursor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressState {
    /// Cursor movement rule
    pub mode: AddressingMode,
    /// First column of the window
    pub column_start: u8,
    /// Last column of the window (inclusive)
    pub column_end: u8,
    /// Column cursor
    pub column: u8,
    /// Row cursor, reset by a column window change
    pub row: u8,
    /// First page of the window
    pub page_start: u8,
    /// Last page of the window (inclusive)
    pub page_end: u8,
    /// Page cursor
    pub page: u8,
}

impl AddressState {
    fn new(width: u16, rows: u16) -> Self {
        Self {
            mode: AddressingMode::Horizontal,
            column_start: 0,
            column_end: (width - 1) as u8,
            column: 0,
            row: 0,
            page_start: 0,
            page_end: (rows / 8 - 1) as u8,
            page: 0,
        }
    }

    /// Move the cursor past one written byte
    fn advance(&mut self) {
        match self.mode {
            AddressingMode::Horizontal => {
                self.column = self.column.wrapping_add(1);
                if self.column > self.column_end {
                    self.column = self.column_start;
                    self.page = self.page.wrapping_add(1);
                    if self.page > self.page_end {
                        self.page = self.page_start;
                    }
                }
            }
            AddressingMode::Vertical => {
                self.page = self.page.wrapping_add(1);
                if self.page > self.page_end {
                    self.page = self.page_start;
                    self.column = self.column.wrapping_add(1);
                    if self.column > self.column_end {
                        self.column = self.column_start;
                    }
                }
            }
            AddressingMode::Page => {
                self.column = self.column.wrapping_add(1);
                if self.column > self.column_end {
                    self.column = self.column_start;
                }
            }
        }
    }
}

/// Emulated SSD1306 controller
#[derive(Clone, Debug)]
pub struct Emulator {
    /// Width given at construction, restored by `reset`
    initial_width: u16,
    /// Height given at construction, restored by `reset`
    initial_height: u16,
    width: u16,
    height: u16,
    /// GDDRAM, `height / 8` pages of `width` bytes
    buffer: Vec<u8>,
    decoder: Decoder,
    params: [u8; MAX_PARAMS],
    param_len: usize,
    registers: Registers,
    address: AddressState,
    scroll: ScrollState,
    cycle_time_ms: u32,
    /// Time of the next frame for [`Emulator::advance`]
    next_frame_ms: u64,
}

impl Emulator {
    /// Create a powered-off controller
    ///
    /// The width is clamped to `1..=128`; the height is rounded down to whole
    /// pages and clamped to `16..=64`.
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.clamp(1, MAX_COLUMNS);
        let height = clamp_rows(height);
        let mut emulator = Self {
            initial_width: width,
            initial_height: height,
            width,
            height,
            buffer: Vec::new(),
            decoder: Decoder::AwaitingOpcode,
            params: [0; MAX_PARAMS],
            param_len: 0,
            registers: Registers::new(height),
            address: AddressState::new(width, height),
            scroll: ScrollState::new(height),
            cycle_time_ms: 0,
            next_frame_ms: 0,
        };
        emulator.reset();
        emulator
    }

    /// Return to the power-on state and clear GDDRAM
    pub fn reset(&mut self) {
        self.width = self.initial_width;
        self.height = self.initial_height;
        self.decoder = Decoder::AwaitingOpcode;
        self.param_len = 0;
        self.registers = Registers::new(self.height);
        self.address = AddressState::new(self.width, self.height);
        self.scroll = ScrollState::new(self.height);
        self.next_frame_ms = 0;
        self.update_cycle_time();
        self.alloc();
    }

    fn alloc(&mut self) {
        self.buffer = vec![0; usize::from(self.width) * usize::from(self.height) / 8];
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels; follows the multiplex ratio
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Raw GDDRAM, page-major
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Non-addressing registers
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Address window and cursor
    pub fn address(&self) -> &AddressState {
        &self.address
    }

    /// Scroll configuration and progress
    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    /// Frame period derived from the clock registers
    pub fn cycle_time_ms(&self) -> u32 {
        self.cycle_time_ms
    }

    /// GDDRAM bit at `(x, y)`, `false` off-screen
    ///
    /// During a diagonal scroll, rows inside the vertical scroll area are read
    /// shifted by the current vertical offset.
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return false;
        }

        let mut y = y;
        let start = i32::from(self.scroll.vertical_start);
        let rows = i32::from(self.scroll.vertical_rows);
        if self.scroll.is_diagonal() && rows > 0 && y >= start && y < start + rows {
            y = start + (y - start + i32::from(self.scroll.vertical_offset)) % rows;
        }

        let index = x as usize + (y as usize / 8) * usize::from(self.width);
        self.buffer
            .get(index)
            .is_some_and(|byte| byte & (1 << (y & 7)) != 0)
    }

    /// Whether the panel shows `(x, y)` lit
    ///
    /// Applies display on/off, entire-display-on and inverse mode on top of
    /// [`get_pixel`](Self::get_pixel).
    pub fn is_lit(&self, x: i32, y: i32) -> bool {
        let registers = &self.registers;
        if !registers.display_on {
            return false;
        }
        if registers.entire_display_on {
            return true;
        }
        self.get_pixel(x, y) != registers.inverse
    }

    /// Feed command bytes
    pub fn write_commands(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_command(byte);
        }
    }

    fn write_command(&mut self, byte: u8) {
        match self.decoder {
            Decoder::AwaitingOpcode => match decode(byte) {
                Some(Command::StartLine(line)) => {
                    trace!("start line {}", line);
                    self.registers.start_line = line;
                }
                Some(Command::Op(op)) if op.param_count() == 0 => {
                    trace!("{:?}", op);
                    self.apply(op, &[]);
                }
                Some(Command::Op(op)) => {
                    self.param_len = 0;
                    self.decoder = Decoder::AwaitingParams(op);
                }
                None => warn!("unknown opcode {:#04x}", byte),
            },
            Decoder::AwaitingParams(op) => {
                self.params[self.param_len] = byte;
                self.param_len += 1;
                if self.param_len >= op.param_count() {
                    let params = self.params;
                    let params = &params[..self.param_len];
                    trace!("{:?} {:02x?}", op, params);
                    self.decoder = Decoder::AwaitingOpcode;
                    self.param_len = 0;
                    self.apply(op, params);
                }
            }
        }
    }

    fn apply(&mut self, op: Opcode, p: &[u8]) {
        let param = |i: usize| p.get(i).copied().unwrap_or(0);
        match op {
            Opcode::SetMemoryAddressingMode => match AddressingMode::from_bits(param(0)) {
                Some(mode) => self.address.mode = mode,
                None => warn!("invalid addressing mode {:#04x}", param(0)),
            },
            Opcode::SetColumnAddress => {
                self.address.column_start = param(0);
                self.address.column_end = param(1);
                self.address.column = param(0);
                self.address.row = 0;
            }
            Opcode::SetPageAddress => {
                self.address.page_start = param(0);
                self.address.page_end = param(1);
                self.address.page = param(0);
            }
            Opcode::RightHorizontalScroll => {
                self.setup_scroll(ScrollMode::Horizontal(ScrollDirection::Right), p);
            }
            Opcode::LeftHorizontalScroll => {
                self.setup_scroll(ScrollMode::Horizontal(ScrollDirection::Left), p);
            }
            Opcode::VerticalRightScroll => {
                self.setup_scroll(ScrollMode::Diagonal(ScrollDirection::Right), p);
            }
            Opcode::VerticalLeftScroll => {
                self.setup_scroll(ScrollMode::Diagonal(ScrollDirection::Left), p);
            }
            Opcode::ActivateScroll => {
                self.scroll.frame_counter = 0;
                self.scroll.enabled = true;
            }
            Opcode::DeactivateScroll => {
                self.scroll.frame_counter = 0;
                self.scroll.enabled = false;
            }
            Opcode::SetVerticalScrollArea => {
                self.scroll.vertical_start = param(0);
                self.scroll.vertical_rows = param(1);
            }
            Opcode::SetContrast => self.registers.contrast = param(0),
            Opcode::ChargePump => self.registers.charge_pump = param(0) & 0x04 != 0,
            Opcode::SegmentRemapNormal => self.registers.segment_remap = false,
            Opcode::SegmentRemapInverse => self.registers.segment_remap = true,
            Opcode::EntireDisplayOnResume => self.registers.entire_display_on = false,
            Opcode::EntireDisplayOn => self.registers.entire_display_on = true,
            Opcode::NormalDisplay => self.registers.inverse = false,
            Opcode::InverseDisplay => self.registers.inverse = true,
            Opcode::SetMultiplexRatio => {
                self.registers.multiplex_ratio = param(0);
                self.height = clamp_rows(u16::from(param(0)) + 1);
                self.address.page = self.address.page.min((self.height / 8 - 1) as u8);
                self.update_cycle_time();
                self.alloc();
            }
            Opcode::DisplayOff => self.registers.display_on = false,
            Opcode::DisplayOn => self.registers.display_on = true,
            Opcode::ComScanIncrement => self.registers.com_scan_reversed = false,
            Opcode::ComScanDecrement => self.registers.com_scan_reversed = true,
            Opcode::SetDisplayOffset => self.registers.display_offset = param(0) & 0x3F,
            Opcode::SetDisplayClockDivider => {
                self.registers.osc_frequency = param(0) >> 4;
                self.registers.clock_divide = param(0) & 0x0F;
                self.update_cycle_time();
            }
            Opcode::SetPrechargePeriod => self.registers.precharge = param(0),
            Opcode::SetComPins => self.registers.com_pins = param(0),
            Opcode::SetVcomhDeselect => self.registers.vcomh = param(0),
            Opcode::Nop => {}
        }
    }

    fn setup_scroll(&mut self, mode: ScrollMode, p: &[u8]) {
        let param = |i: usize| p.get(i).copied().unwrap_or(0);
        self.scroll.mode = Some(mode);
        self.scroll.page_start = param(1) & 0x07;
        self.scroll.interval = param(2) & 0x07;
        self.scroll.page_end = param(3) & 0x07;
        self.scroll.vertical_increment = match mode {
            ScrollMode::Diagonal(_) => param(4) & 0x3F,
            ScrollMode::Horizontal(_) => 0,
        };
        self.scroll.vertical_offset = 0;
    }

    fn update_cycle_time(&mut self) {
        let osc_hz = 1000.0 * f32::from(OSC_FREQUENCY_KHZ[usize::from(self.registers.osc_frequency & 0x0F)]);
        let ticks = (u32::from(self.registers.clock_divide) + 1)
            * u32::from(self.height)
            * DISPLAY_CLOCKS_PER_ROW;
        let frequency = osc_hz / ticks as f32;
        self.cycle_time_ms = if frequency > 0.0 {
            (1000.0 / frequency) as u32
        } else {
            0
        };
    }

    /// Store GDDRAM bytes at the cursor, advancing it per addressing mode
    ///
    /// Bytes whose cursor lies outside the pixel store are dropped but still
    /// advance the cursor.
    pub fn write_data(&mut self, bytes: &[u8]) {
        let width = usize::from(self.width);
        let pages = usize::from(self.height / 8);
        for &byte in bytes {
            let (column, page) = (usize::from(self.address.column), usize::from(self.address.page));
            if column < width && page < pages {
                self.buffer[page * width + column] = byte;
            }
            self.address.advance();
        }
    }

    /// Run one panel frame
    ///
    /// Steps the scroll when it is active and its interval has elapsed.
    pub fn tick(&mut self) {
        if !self.scroll.enabled {
            return;
        }
        let Some(mode) = self.scroll.mode else {
            return;
        };

        let interval = SCROLL_FRAME_INTERVAL[usize::from(self.scroll.interval & 0x07)];
        self.scroll.frame_counter += 1;
        if self.scroll.frame_counter <= interval {
            return;
        }
        self.scroll.frame_counter = 0;

        if let ScrollMode::Diagonal(_) = mode {
            let rows = self.scroll.vertical_rows;
            if rows != 0 {
                let offset = u16::from(self.scroll.vertical_offset)
                    + u16::from(self.scroll.vertical_increment);
                self.scroll.vertical_offset = (offset % u16::from(rows)) as u8;
            }
        }

        let width = usize::from(self.width);
        let pages = usize::from(self.height / 8);
        let last = usize::from(self.scroll.page_end).min(pages.saturating_sub(1));
        for page in usize::from(self.scroll.page_start)..=last {
            let row = &mut self.buffer[page * width..(page + 1) * width];
            match mode.direction() {
                ScrollDirection::Right => row.rotate_right(1),
                ScrollDirection::Left => row.rotate_left(1),
            }
        }
    }

    /// Run frames up to `now_ms`, paced by [`cycle_time_ms`](Self::cycle_time_ms)
    ///
    /// Returns whether a frame ran. At most one frame runs per call; when the
    /// caller falls behind the schedule restarts from `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_frame_ms {
            return false;
        }
        self.next_frame_ms += u64::from(self.cycle_time_ms.max(1));
        if self.next_frame_ms < now_ms {
            self.next_frame_ms = now_ms;
        }
        self.tick();
        true
    }
}

/// Rows the multiplexer drives for a requested row count
fn clamp_rows(rows: u16) -> u16 {
    (rows / 8 * 8).clamp(MIN_ROWS, MAX_ROWS)
}

impl Transport for Emulator {
    type Error = Infallible;

    fn send_control_buffer(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.write_commands(bytes);
        Ok(())
    }

    fn send_data_buffer(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.write_data(bytes);
        Ok(())
    }

    fn probe(&mut self) -> bool {
        true
    }

    fn max_transfer(&self) -> usize {
        usize::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::command::ScrollInterval;
    use crate::config::{Builder, PanelType};
    use crate::device::Device;

    fn device(panel: PanelType) -> Device<Emulator> {
        let config = Builder::new().panel(panel).build().unwrap();
        let mut device = Device::new(Emulator::new(128, 64), config);
        device.init().unwrap();
        device
    }

    fn assert_mirrors(device: &Device<Emulator>) {
        let fb = device.framebuffer();
        let emulator = device.transport();
        assert_eq!(emulator.height(), fb.height());
        for y in 0..i32::from(fb.height()) {
            for x in 0..i32::from(fb.width()) {
                assert_eq!(emulator.get_pixel(x, y), fb.get_pixel(x, y), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_init_sets_registers() {
        let device = device(PanelType::Ssd1306_128x64);
        let registers = device.transport().registers();
        assert!(registers.display_on);
        assert!(registers.charge_pump);
        assert!(registers.segment_remap);
        assert!(registers.com_scan_reversed);
        assert_eq!(registers.contrast, 0xCF);
        assert_eq!(registers.precharge, 0xF1);
        assert_eq!(registers.multiplex_ratio, 63);
        assert_eq!(device.transport().address().mode, AddressingMode::Horizontal);
    }

    #[test]
    fn test_full_refresh_round_trip() {
        let mut device = device(PanelType::Ssd1306_128x64);
        let fb = device.framebuffer_mut();
        for i in 0..64 {
            fb.write_pixel(i * 2, i, Color::White);
            fb.write_pixel(127 - i, i, Color::White);
        }
        device.refresh(true).unwrap();
        assert_mirrors(&device);
    }

    #[test]
    fn test_partial_refresh_round_trip() {
        let mut device = device(PanelType::Ssd1306_128x64);
        device.framebuffer_mut().write_pixel(5, 5, Color::White);
        device.refresh(false).unwrap();
        device.framebuffer_mut().write_pixel(100, 40, Color::White);
        device.framebuffer_mut().write_pixel(101, 63, Color::White);
        device.framebuffer_mut().write_pixel(5, 5, Color::Black);
        device.refresh(false).unwrap();
        assert_mirrors(&device);
        assert!(device.transport().get_pixel(100, 40));
    }

    #[test]
    fn test_short_panel_shrinks_store() {
        let mut device = device(PanelType::Ssd1306_128x32);
        assert_eq!(device.transport().height(), 32);
        assert_eq!(device.transport().buffer().len(), 512);
        device.framebuffer_mut().write_pixel(127, 31, Color::White);
        device.refresh(true).unwrap();
        assert_mirrors(&device);
    }

    #[test]
    fn test_horizontal_scroll_rotates_after_interval() {
        let mut device = device(PanelType::Ssd1306_128x64);
        for page in 0..8 {
            device.framebuffer_mut().write_pixel(127, page * 8, Color::White);
        }
        device.refresh(true).unwrap();
        device
            .start_horizontal_scrolling(1, 6, ScrollDirection::Right, ScrollInterval::Frames2)
            .unwrap();

        let emulator = device.transport_mut();
        emulator.tick();
        emulator.tick();
        assert!(emulator.get_pixel(127, 8));

        emulator.tick();
        for page in 1..=6 {
            assert!(emulator.get_pixel(0, page * 8), "page {page}");
            assert!(!emulator.get_pixel(127, page * 8));
        }
        assert!(emulator.get_pixel(127, 0));
        assert!(emulator.get_pixel(127, 56));
        assert_eq!(emulator.scroll().frame_counter, 0);
    }

    #[test]
    fn test_left_scroll_wraps_first_column() {
        let mut emulator = Emulator::new(128, 64);
        emulator.write_data(&[0x01]);
        emulator.write_commands(&[0x27, 0x00, 0x00, 0x07, 0x00, 0x00, 0xFF, 0x2F]);
        for _ in 0..3 {
            emulator.tick();
        }
        assert!(emulator.get_pixel(127, 0));
        assert!(!emulator.get_pixel(0, 0));
    }

    #[test]
    fn test_interval_code_one_steps_every_33_ticks() {
        let mut emulator = Emulator::new(128, 64);
        emulator.write_data(&[0x01]);
        emulator.write_commands(&[0x27, 0x00, 0x00, 0x01, 0x00, 0x00, 0xFF, 0x2F]);
        for _ in 0..32 {
            emulator.tick();
        }
        assert!(emulator.get_pixel(0, 0));
        emulator.tick();
        assert!(emulator.get_pixel(127, 0));
        assert!(!emulator.get_pixel(0, 0));
    }

    #[test]
    fn test_diagonal_scroll_offsets_reads() {
        let mut device = device(PanelType::Ssd1306_128x64);
        device.framebuffer_mut().write_pixel(10, 5, Color::White);
        device.refresh(true).unwrap();
        device
            .start_diagonal_scrolling(0, 7, 0, 63, ScrollDirection::Right, ScrollInterval::Frames2, 1)
            .unwrap();

        let emulator = device.transport_mut();
        assert_eq!(emulator.scroll().vertical_rows, 64);
        assert_eq!(emulator.scroll().vertical_increment, 1);
        for _ in 0..3 {
            emulator.tick();
        }
        assert_eq!(emulator.scroll().vertical_offset, 1);
        assert!(emulator.get_pixel(11, 4));
        assert!(!emulator.get_pixel(11, 5));

        emulator.write_commands(&[0x2E]);
        assert!(emulator.get_pixel(11, 5));
    }

    #[test]
    fn test_no_scroll_without_activation() {
        let mut emulator = Emulator::new(128, 64);
        emulator.write_data(&[0xFF]);
        emulator.write_commands(&[0x26, 0x00, 0x00, 0x07, 0x07, 0x00, 0xFF]);
        for _ in 0..10 {
            emulator.tick();
        }
        assert!(emulator.get_pixel(0, 0));
    }

    #[test]
    fn test_horizontal_addressing_wraps_window() {
        let mut emulator = Emulator::new(128, 64);
        emulator.write_commands(&[0x20, 0x00, 0x21, 126, 127, 0x22, 0, 1]);
        emulator.write_data(&[1, 2, 3, 4, 5]);
        let buffer = emulator.buffer();
        assert_eq!(buffer[126], 5);
        assert_eq!(buffer[127], 2);
        assert_eq!(buffer[128 + 126], 3);
        assert_eq!(buffer[128 + 127], 4);
        assert_eq!(emulator.address().column, 127);
        assert_eq!(emulator.address().page, 0);
    }

    #[test]
    fn test_vertical_addressing_wraps_window() {
        let mut emulator = Emulator::new(128, 64);
        emulator.write_commands(&[0x20, 0x01, 0x21, 0, 1, 0x22, 0, 1]);
        emulator.write_data(&[1, 2, 3, 4, 5]);
        let buffer = emulator.buffer();
        assert_eq!(buffer[0], 5);
        assert_eq!(buffer[128], 2);
        assert_eq!(buffer[1], 3);
        assert_eq!(buffer[129], 4);
    }

    #[test]
    fn test_page_addressing_stays_on_page() {
        let mut emulator = Emulator::new(128, 64);
        emulator.write_commands(&[0x20, 0x02, 0x21, 10, 11, 0x22, 3, 3]);
        emulator.write_data(&[0xA, 0xB, 0xC]);
        let buffer = emulator.buffer();
        assert_eq!(buffer[3 * 128 + 10], 0xC);
        assert_eq!(buffer[3 * 128 + 11], 0xB);
        assert_eq!(buffer[4 * 128 + 10], 0);
        assert_eq!(emulator.address().page, 3);
    }

    #[test]
    fn test_params_may_span_bursts() {
        let mut emulator = Emulator::new(128, 64);
        emulator.write_commands(&[0x81]);
        assert_eq!(emulator.registers().contrast, 0x7F);
        emulator.write_commands(&[0x33, 0xA7]);
        assert_eq!(emulator.registers().contrast, 0x33);
        assert!(emulator.registers().inverse);
    }

    #[test]
    fn test_unknown_opcode_is_skipped() {
        let mut emulator = Emulator::new(128, 64);
        emulator.write_commands(&[0xFF, 0x81, 0x10, 0x45]);
        assert_eq!(emulator.registers().contrast, 0x10);
        assert_eq!(emulator.registers().start_line, 5);
    }

    #[test]
    fn test_multiplex_ratio_reallocates() {
        let mut emulator = Emulator::new(128, 64);
        emulator.write_data(&[0xFF]);
        emulator.write_commands(&[0xA8, 0x1F]);
        assert_eq!(emulator.height(), 32);
        assert!(emulator.buffer().iter().all(|b| *b == 0));

        emulator.write_commands(&[0xA8, 0x05]);
        assert_eq!(emulator.height(), 16);
        emulator.write_commands(&[0xA8, 0x24]);
        assert_eq!(emulator.height(), 32);
    }

    #[test]
    fn test_cycle_time_follows_clock_registers() {
        let mut emulator = Emulator::new(128, 64);
        // 372 kHz / (64 * 54) = 107.6 Hz
        assert_eq!(emulator.cycle_time_ms(), 9);
        // 536 kHz / (2 * 64 * 54) = 77.5 Hz
        emulator.write_commands(&[0xD5, 0xF1]);
        assert_eq!(emulator.registers().osc_frequency, 0xF);
        assert_eq!(emulator.registers().clock_divide, 0x1);
        assert_eq!(emulator.cycle_time_ms(), 12);
    }

    #[test]
    fn test_advance_paces_frames() {
        let mut emulator = Emulator::new(128, 64);
        assert!(emulator.advance(0));
        assert!(!emulator.advance(5));
        assert!(emulator.advance(9));
        // Behind schedule: the next frame is due immediately, then paced again
        assert!(emulator.advance(100));
        assert!(emulator.advance(100));
        assert!(!emulator.advance(105));
        assert!(emulator.advance(109));
    }

    #[test]
    fn test_panel_view_applies_display_modes() {
        let mut emulator = Emulator::new(128, 64);
        emulator.write_data(&[0x01]);
        assert!(!emulator.is_lit(0, 0));
        emulator.write_commands(&[0xAF]);
        assert!(emulator.is_lit(0, 0));
        assert!(!emulator.is_lit(0, 1));
        emulator.write_commands(&[0xA7]);
        assert!(!emulator.is_lit(0, 0));
        assert!(emulator.is_lit(0, 1));
        emulator.write_commands(&[0xA5]);
        assert!(emulator.is_lit(0, 0));
    }

    #[test]
    fn test_reset_restores_power_on_state() {
        let mut emulator = Emulator::new(128, 64);
        emulator.write_commands(&[0xAF, 0x81, 0x01, 0xA8, 0x0F, 0x20, 0x02]);
        emulator.write_data(&[0xFF]);
        emulator.reset();
        assert_eq!(emulator.height(), 64);
        assert_eq!(emulator.registers(), &Registers::new(64));
        assert_eq!(emulator.address(), &AddressState::new(128, 64));
        assert!(emulator.buffer().iter().all(|b| *b == 0));
    }
}
