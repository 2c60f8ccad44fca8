//! Panel driver: framebuffer ownership and refresh protocol
//!
//! [`Device`] owns a [`FrameBuffer`] and a [`Transport`]. Drawing happens in
//! memory; [`Device::refresh`] turns buffer contents plus dirty state into the
//! shortest command/data sequence that brings the panel up to date.
//!
//! ## Refresh encoding
//!
//! Full refresh (forced, or dirty tracking disabled):
//!
//! ```text
//! 0x21 0 width-1       column window
//! 0x22 0 pages-1       page window
//! <buffer>             data, split into max_transfer() chunks
//! ```
//!
//! Partial refresh, for every unlocked page with a non-empty region:
//!
//! ```text
//! 0x21 left right
//! 0x22 page page
//! <buffer[page * width + left ..= page * width + right]>
//! ```

use log::{debug, error, info};

use crate::command::{
    DISPLAY_CLOCKS_PER_ROW, OSC_FREQUENCY_KHZ, Opcode, SET_START_LINE, ScrollDirection,
    ScrollInterval,
};
use crate::config::{Config, PanelType};
use crate::error::Error;
use crate::framebuffer::{BufferGuard, FrameBuffer};
use crate::interface::Transport;

/// Result alias for device operations
pub type DeviceResult<T> = core::result::Result<(), Error<T>>;

/// Charge pump parameter: enable
const CHARGE_PUMP_ON: u8 = 0x14;
/// Charge pump parameter: disable
const CHARGE_PUMP_OFF: u8 = 0x10;

/// SSD1306 driver
pub struct Device<T>
where
    T: Transport,
{
    /// Bus transport
    transport: T,
    /// Panel configuration
    config: Config,
    /// Pixel store and dirty regions
    framebuffer: FrameBuffer,
    /// Whether `init` completed
    initialized: bool,
}

impl<T> Device<T>
where
    T: Transport,
{
    /// Create a new driver; nothing is sent until [`init`](Self::init)
    pub fn new(transport: T, config: Config) -> Self {
        let mut framebuffer = FrameBuffer::new(config.dimensions);
        framebuffer.set_partial_updates(config.partial_updates);
        Self {
            transport,
            config,
            framebuffer,
            initialized: false,
        }
    }

    /// Probe the controller and run the power-up sequence
    ///
    /// Ends with a cleared screen, a full refresh and the panel switched on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotResponding`] if the controller does not answer the
    /// presence probe, or [`Error::Interface`] if a later transfer fails.
    pub fn init(&mut self) -> DeviceResult<T> {
        self.framebuffer.clear_regions();

        if !self.transport.probe() {
            error!("display not responding on the bus");
            return Err(Error::NotResponding);
        }

        let panel = self.config.panel;
        let rows = self.config.dimensions.height;

        self.command(Opcode::DisplayOff, &[])?;
        self.command(
            Opcode::SetDisplayClockDivider,
            &[self.config.clock_divider_byte()],
        )?;
        self.command(Opcode::SetMultiplexRatio, &[(rows - 1) as u8])?;
        self.command(Opcode::SetDisplayOffset, &[0x00])?;
        self.transport
            .send_control(SET_START_LINE)
            .map_err(Error::Interface)?;

        if panel == PanelType::Ssd1306_128x32 {
            self.command(Opcode::ChargePump, &[CHARGE_PUMP_ON])?;
        }

        self.command(Opcode::SetMemoryAddressingMode, &[0x00])?;
        self.command(Opcode::SegmentRemapInverse, &[])?;
        self.command(Opcode::ComScanDecrement, &[])?;
        self.command(Opcode::SetComPins, &[panel.com_pins()])?;
        self.command(Opcode::SetContrast, &[self.config.contrast])?;
        self.command(Opcode::SetPrechargePeriod, &[self.config.precharge])?;
        self.command(Opcode::SetVcomhDeselect, &[self.config.vcomh])?;

        if panel == PanelType::Ssd1306_128x64 {
            self.command(Opcode::ChargePump, &[CHARGE_PUMP_ON])?;
        }

        self.command(Opcode::DeactivateScroll, &[])?;
        self.command(Opcode::EntireDisplayOnResume, &[])?;
        self.command(Opcode::NormalDisplay, &[])?;

        self.framebuffer.clear();
        self.refresh(true)?;

        self.command(Opcode::DisplayOn, &[])?;
        self.initialized = true;

        info!(
            "display initialized: {}x{} @ {} Hz",
            self.width(),
            self.height(),
            self.frequency() as u32
        );
        Ok(())
    }

    /// Switch the panel off and disable the charge pump
    pub fn term(&mut self) -> DeviceResult<T> {
        self.command(Opcode::DisplayOff, &[])?;
        self.command(Opcode::ChargePump, &[CHARGE_PUMP_OFF])?;
        self.initialized = false;
        Ok(())
    }

    /// Whether [`init`](Self::init) completed and [`term`](Self::term) has not been called
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.framebuffer.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.framebuffer.height()
    }

    /// Number of 8-row pages
    pub fn pages(&self) -> usize {
        self.framebuffer.pages()
    }

    /// Clear the buffer to black and mark everything dirty
    pub fn clear(&mut self) {
        self.framebuffer.clear();
    }

    /// Panel frame rate in Hz derived from the clock configuration
    ///
    /// `osc / ((divide_ratio + 1) * rows * 54)`
    pub fn frequency(&self) -> f32 {
        let osc_hz = 1000.0 * f32::from(OSC_FREQUENCY_KHZ[(self.config.osc_frequency & 0x0F) as usize]);
        let ticks = u32::from(self.config.clock_divide & 0x0F) + 1;
        let ticks = ticks * u32::from(self.height()) * DISPLAY_CLOCKS_PER_ROW;
        osc_hz / ticks as f32
    }

    /// Send the buffer to the panel
    ///
    /// With `force`, or with dirty tracking disabled, the whole buffer is sent.
    /// Otherwise only the dirty span of each unlocked page is sent. All dirty
    /// regions are empty afterwards.
    ///
    /// Each page is addressed with a column window and a page window, then
    /// its bytes follow as data, split to fit the transport's transfer size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if a transfer fails. Pages not yet sent
    /// keep their dirty regions.
    ///
    /// # Example
    ///
    /// ```
    /// # use ssd1306_gfx::{Builder, Color, Device, Emulator, PanelType};
    /// # let Ok(config) = Builder::new().panel(PanelType::Ssd1306_128x64).build() else { return };
    /// let mut device = Device::new(Emulator::new(128, 64), config);
    /// # if device.init().is_err() { return; }
    /// device.framebuffer_mut().write_pixel(10, 20, Color::White);
    /// assert!(device.framebuffer().is_dirty());
    ///
    /// # if device.refresh(false).is_err() { return; }
    /// assert!(!device.framebuffer().is_dirty());
    /// assert!(device.transport().get_pixel(10, 20));
    /// ```
    pub fn refresh(&mut self, force: bool) -> DeviceResult<T> {
        if force || !self.framebuffer.partial_updates() {
            let last_column = (self.width() - 1) as u8;
            let last_page = (self.pages() - 1) as u8;
            self.command(Opcode::SetColumnAddress, &[0, last_column])?;
            self.command(Opcode::SetPageAddress, &[0, last_page])?;
            let chunk = self.transport.max_transfer().max(1);
            for bytes in self.framebuffer.as_bytes().chunks(chunk) {
                self.transport
                    .send_data_buffer(bytes)
                    .map_err(Error::Interface)?;
            }
            debug!("full refresh: {} bytes", self.framebuffer.as_bytes().len());
        } else {
            let mut sent = 0usize;
            for page in 0..self.pages() {
                sent += self.send_page(page, false)?;
            }
            if sent > 0 {
                debug!("partial refresh: {} bytes", sent);
            }
        }
        self.framebuffer.clear_regions();
        Ok(())
    }

    /// Send a single page
    ///
    /// Without `force` the page is skipped when it is locked or clean, and only
    /// its dirty span is sent. With `force` the whole page is sent.
    /// Out-of-range pages send nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if a transfer fails.
    ///
    /// # Example
    ///
    /// ```
    /// # use ssd1306_gfx::{Builder, Color, Device, Emulator, PanelType};
    /// # let Ok(config) = Builder::new().panel(PanelType::Ssd1306_128x64).build() else { return };
    /// let mut device = Device::new(Emulator::new(128, 64), config);
    /// # if device.init().is_err() { return; }
    /// device.framebuffer_mut().write_pixel(0, 0, Color::White);
    /// device.framebuffer_mut().write_pixel(0, 63, Color::White);
    ///
    /// // Only page 0 goes out; page 7 stays dirty
    /// # if device.refresh_page(0, false).is_err() { return; }
    /// assert!(device.transport().get_pixel(0, 0));
    /// assert!(!device.transport().get_pixel(0, 63));
    /// assert!(device.framebuffer().is_dirty());
    /// ```
    pub fn refresh_page(&mut self, page: usize, force: bool) -> DeviceResult<T> {
        self.send_page(page, force)?;
        Ok(())
    }

    fn send_page(&mut self, page: usize, force: bool) -> Result<usize, Error<T>> {
        let Some(region) = self.framebuffer.region(page).copied() else {
            return Ok(0);
        };
        let span = if force {
            Some((0, (self.width() - 1) as u8))
        } else if region.locked {
            None
        } else {
            region.span()
        };
        let Some((left, right)) = span else {
            return Ok(0);
        };

        self.command(Opcode::SetColumnAddress, &[left, right])?;
        self.command(Opcode::SetPageAddress, &[page as u8, page as u8])?;

        let width = self.width() as usize;
        let start = page * width + left as usize;
        let end = page * width + right as usize;
        let chunk = self.transport.max_transfer().max(1);
        for bytes in self.framebuffer.as_bytes()[start..=end].chunks(chunk) {
            self.transport
                .send_data_buffer(bytes)
                .map_err(Error::Interface)?;
        }

        self.framebuffer.clear_region(page);
        Ok(end - start + 1)
    }

    /// Enable or disable dirty tracking; enabling empties all regions
    pub fn set_partial_updates(&mut self, enable: bool) {
        self.framebuffer.set_partial_updates(enable);
    }

    /// Whether dirty tracking is enabled
    pub fn partial_updates(&self) -> bool {
        self.framebuffer.partial_updates()
    }

    /// Include or exclude a page from non-forced refreshes
    pub fn lock_page(&mut self, page: usize, lock: bool) {
        self.framebuffer.lock_page(page, lock);
    }

    /// Select inverse (set bit = dark) or normal display
    pub fn invert_display(&mut self, invert: bool) -> DeviceResult<T> {
        let op = if invert {
            Opcode::InverseDisplay
        } else {
            Opcode::NormalDisplay
        };
        self.command(op, &[])
    }

    /// Set the display start line, clamped to `0..height`
    pub fn set_vertical_offset(&mut self, offset: i32) -> DeviceResult<T> {
        let line = offset.clamp(0, i32::from(self.height()) - 1) as u8;
        self.transport
            .send_control(SET_START_LINE | line)
            .map_err(Error::Interface)
    }

    /// Replace the start of the buffer with `data` and mark everything dirty
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if `data` is larger than the
    /// framebuffer.
    pub fn update_buffer(&mut self, data: &[u8]) -> DeviceResult<T> {
        let required = self.framebuffer.as_bytes().len();
        if data.len() > required {
            return Err(Error::BufferSizeMismatch {
                required,
                provided: data.len(),
            });
        }
        self.framebuffer.copy_from(data);
        Ok(())
    }

    /// Start continuous horizontal scrolling of pages `start_page..=end_page`
    ///
    /// Scrolling is deactivated first, as the controller requires.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if a transfer fails.
    ///
    /// # Example
    ///
    /// ```
    /// # use ssd1306_gfx::{Builder, Device, Emulator, PanelType, ScrollDirection, ScrollInterval};
    /// # let Ok(config) = Builder::new().panel(PanelType::Ssd1306_128x64).build() else { return };
    /// let mut device = Device::new(Emulator::new(128, 64), config);
    /// # if device.init().is_err() { return; }
    /// let started =
    ///     device.start_horizontal_scrolling(0, 7, ScrollDirection::Left, ScrollInterval::Frames2);
    /// assert!(started.is_ok());
    /// assert!(device.transport().scroll().enabled);
    /// ```
    pub fn start_horizontal_scrolling(
        &mut self,
        start_page: u8,
        end_page: u8,
        direction: ScrollDirection,
        interval: ScrollInterval,
    ) -> DeviceResult<T> {
        self.stop_scrolling()?;
        let op = match direction {
            ScrollDirection::Right => Opcode::RightHorizontalScroll,
            ScrollDirection::Left => Opcode::LeftHorizontalScroll,
        };
        self.command(
            op,
            &[0x00, start_page, interval.code(), end_page, 0x00, 0xFF],
        )?;
        self.command(Opcode::ActivateScroll, &[])
    }

    /// Start continuous diagonal scrolling
    ///
    /// Pages `start_page..=end_page` move one column per step while rows
    /// `start_row..=end_row` move up by `vertical_offset` rows. A negative
    /// offset moves down. An offset of zero degrades to horizontal scrolling.
    pub fn start_diagonal_scrolling(
        &mut self,
        start_page: u8,
        end_page: u8,
        start_row: u8,
        end_row: u8,
        direction: ScrollDirection,
        interval: ScrollInterval,
        vertical_offset: i32,
    ) -> DeviceResult<T> {
        self.stop_scrolling()?;

        let num_rows = (i32::from(end_row) - i32::from(start_row) + 1).max(0);
        let vertical_offset = if vertical_offset < 0 {
            num_rows + vertical_offset
        } else {
            vertical_offset
        };

        self.command(
            Opcode::SetVerticalScrollArea,
            &[start_row, num_rows as u8],
        )?;
        let op = match direction {
            ScrollDirection::Right => Opcode::VerticalRightScroll,
            ScrollDirection::Left => Opcode::VerticalLeftScroll,
        };
        self.command(
            op,
            &[
                0x00,
                start_page,
                interval.code(),
                end_page,
                vertical_offset.clamp(0, 0x3F) as u8,
            ],
        )?;
        self.command(Opcode::ActivateScroll, &[])
    }

    /// Stop hardware scrolling
    pub fn stop_scrolling(&mut self) -> DeviceResult<T> {
        self.command(Opcode::DeactivateScroll, &[])
    }

    /// Run `f` with raw access to the pixel bytes
    ///
    /// The whole screen is marked dirty afterwards.
    pub fn with_buffer<R>(&mut self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let mut guard = self.framebuffer.lock();
        f(&mut *guard)
    }

    /// Raw access guard; the whole screen is marked dirty when it drops
    pub fn lock_buffer(&mut self) -> BufferGuard<'_> {
        self.framebuffer.lock()
    }

    /// The framebuffer
    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    /// The framebuffer, mutably
    pub fn framebuffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.framebuffer
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The transport, mutably
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport
    pub fn release(self) -> T {
        self.transport
    }

    /// Send an opcode and its parameters as one command stream
    fn command(&mut self, op: Opcode, params: &[u8]) -> DeviceResult<T> {
        debug_assert_eq!(params.len(), op.param_count());
        let mut bytes = [0u8; 1 + crate::command::MAX_PARAMS];
        bytes[0] = op.byte();
        let len = 1 + params.len().min(crate::command::MAX_PARAMS);
        bytes[1..len].copy_from_slice(&params[..len - 1]);
        self.transport
            .send_control_buffer(&bytes[..len])
            .map_err(Error::Interface)
    }
}
