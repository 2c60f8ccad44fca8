//! Panel configuration types and builder

pub use crate::error::{BuilderError, MAX_COLUMNS, MAX_ROWS, MIN_ROWS};

use crate::command::DEFAULT_OSC_FREQUENCY;

/// Default 7-bit I2C address of SSD1306 modules (`0x78` in 8-bit notation)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Supported panel types
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum PanelType {
    /// 128x64 pixels, alternative COM pin layout, charge pump enabled late
    #[default]
    Ssd1306_128x64,
    /// 128x32 pixels, sequential COM pin layout, charge pump enabled early
    Ssd1306_128x32,
}

impl PanelType {
    /// Native resolution of the panel
    pub const fn dimensions(self) -> Dimensions {
        match self {
            Self::Ssd1306_128x64 => Dimensions {
                width: 128,
                height: 64,
            },
            Self::Ssd1306_128x32 => Dimensions {
                width: 128,
                height: 32,
            },
        }
    }

    /// COM pins hardware configuration byte for [`Opcode::SetComPins`](crate::command::Opcode::SetComPins)
    pub const fn com_pins(self) -> u8 {
        match self {
            Self::Ssd1306_128x64 => 0x12,
            Self::Ssd1306_128x32 => 0x02,
        }
    }

    /// Contrast used when the builder does not override it
    pub const fn default_contrast(self) -> u8 {
        match self {
            Self::Ssd1306_128x64 => 0xCF,
            Self::Ssd1306_128x32 => 0x2F,
        }
    }
}

/// Panel dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels (columns)
    pub width: u16,
    /// Height in pixels (rows), always a multiple of 8
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - width is 0 or greater than [`MAX_COLUMNS`]
    /// - height is not between [`MIN_ROWS`] and [`MAX_ROWS`]
    /// - height is not a multiple of 8 (one page)
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_COLUMNS {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        if !(MIN_ROWS..=MAX_ROWS).contains(&height) || !height.is_multiple_of(8) {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of 8-row pages
    pub fn pages(&self) -> usize {
        self.height as usize / 8
    }

    /// Framebuffer size in bytes
    pub fn buffer_size(&self) -> usize {
        (self.width as usize * self.height as usize) / 8
    }
}

/// Panel configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Panel type, selects the init sequence variant
    pub panel: PanelType,
    /// Panel dimensions
    pub dimensions: Dimensions,
    /// 7-bit bus address
    pub address: u8,
    /// Contrast register value
    pub contrast: u8,
    /// Oscillator frequency code (upper nibble of the clock divider byte)
    pub osc_frequency: u8,
    /// Clock divide ratio minus one (lower nibble of the clock divider byte)
    pub clock_divide: u8,
    /// Pre-charge period byte
    pub precharge: u8,
    /// VCOMH deselect level byte
    pub vcomh: u8,
    /// Track dirty regions and only send changed bytes on refresh
    pub partial_updates: bool,
    /// Defer `update` requests until the frame loop calls `refresh`
    pub deferred_updates: bool,
}

impl Config {
    /// Byte sent with [`Opcode::SetDisplayClockDivider`](crate::command::Opcode::SetDisplayClockDivider)
    pub fn clock_divider_byte(&self) -> u8 {
        ((self.osc_frequency & 0x0F) << 4) | (self.clock_divide & 0x0F)
    }
}

impl Default for Config {
    fn default() -> Self {
        let panel = PanelType::default();
        Self {
            panel,
            dimensions: panel.dimensions(),
            address: DEFAULT_ADDRESS,
            contrast: panel.default_contrast(),
            osc_frequency: DEFAULT_OSC_FREQUENCY,
            clock_divide: 0x0,
            precharge: 0xF1,
            vcomh: 0x30,
            partial_updates: true,
            deferred_updates: false,
        }
    }
}

/// Builder for constructing panel configuration
///
/// # Example
///
/// ```
/// use ssd1306_gfx::{Builder, PanelType};
///
/// let config = match Builder::new().panel(PanelType::Ssd1306_128x32).address(0x3D).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.dimensions.height, 32);
/// assert_eq!(config.contrast, 0x2F);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    panel: Option<PanelType>,
    dimensions: Option<Dimensions>,
    address: Option<u8>,
    contrast: Option<u8>,
    osc_frequency: Option<u8>,
    clock_divide: Option<u8>,
    precharge: Option<u8>,
    vcomh: Option<u8>,
    partial_updates: Option<bool>,
    deferred_updates: Option<bool>,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the panel type
    pub fn panel(mut self, panel: PanelType) -> Self {
        self.panel = Some(panel);
        self
    }

    /// Override the panel dimensions
    ///
    /// Without an explicit panel type, panels up to 32 rows use the
    /// 128x32 init sequence and taller ones the 128x64 sequence.
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the 7-bit bus address
    pub fn address(mut self, address: u8) -> Self {
        self.address = Some(address);
        self
    }

    /// Set the contrast register value
    pub fn contrast(mut self, contrast: u8) -> Self {
        self.contrast = Some(contrast);
        self
    }

    /// Set the oscillator frequency code (0..=15)
    pub fn osc_frequency(mut self, code: u8) -> Self {
        self.osc_frequency = Some(code & 0x0F);
        self
    }

    /// Set the clock divide ratio minus one (0..=15)
    pub fn clock_divide(mut self, ratio: u8) -> Self {
        self.clock_divide = Some(ratio & 0x0F);
        self
    }

    /// Set the pre-charge period byte
    pub fn precharge(mut self, value: u8) -> Self {
        self.precharge = Some(value);
        self
    }

    /// Set the VCOMH deselect level byte
    pub fn vcomh(mut self, value: u8) -> Self {
        self.vcomh = Some(value);
        self
    }

    /// Enable or disable dirty-region tracking
    pub fn partial_updates(mut self, enable: bool) -> Self {
        self.partial_updates = Some(enable);
        self
    }

    /// Enable or disable deferred updates
    pub fn deferred_updates(mut self, enable: bool) -> Self {
        self.deferred_updates = Some(enable);
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if neither a panel type nor
    /// dimensions were set, and `BuilderError::InvalidAddress` if the address
    /// does not fit in 7 bits.
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self
            .dimensions
            .or_else(|| self.panel.map(PanelType::dimensions))
            .ok_or(BuilderError::MissingDimensions)?;
        let panel = self.panel.unwrap_or(if dimensions.height <= 32 {
            PanelType::Ssd1306_128x32
        } else {
            PanelType::Ssd1306_128x64
        });

        let address = self.address.unwrap_or(DEFAULT_ADDRESS);
        if address > 0x7F {
            return Err(BuilderError::InvalidAddress(address));
        }

        let defaults = Config::default();
        Ok(Config {
            panel,
            dimensions,
            address,
            contrast: self.contrast.unwrap_or(panel.default_contrast()),
            osc_frequency: self.osc_frequency.unwrap_or(defaults.osc_frequency),
            clock_divide: self.clock_divide.unwrap_or(defaults.clock_divide),
            precharge: self.precharge.unwrap_or(defaults.precharge),
            vcomh: self.vcomh.unwrap_or(defaults.vcomh),
            partial_updates: self.partial_updates.unwrap_or(defaults.partial_updates),
            deferred_updates: self.deferred_updates.unwrap_or(defaults.deferred_updates),
        })
    }
}
