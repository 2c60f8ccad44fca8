//! SSD1306 OLED Driver, Drawing Engine and Emulator
//!
//! A driver for SSD1306 monochrome OLED panels (128x64 and 128x32) with a
//! dirty-tracking framebuffer, a clipping drawing engine and a software
//! controller that decodes the same byte stream as the panel.
//!
//! ## Features
//!
//! - `no_std` compatible (needs `alloc`)
//! - `embedded-hal` v1.0 I2C support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Partial refresh: only columns touched since the last refresh are sent
//! - Lines, rectangles, circles, triangles, dithered fills, text and bitmaps
//! - Hardware scroll commands, emulated frame by frame
//! - An oscilloscope-style trace of a sampled signal
//!
//! ## Layers
//!
//! | Layer       | Type                      | Role                                    |
//! |-------------|---------------------------|-----------------------------------------|
//! | Transport   | [`Transport`]             | Byte sink: [`I2cInterface`], [`Emulator`] |
//! | Driver      | [`Device`]                | Framebuffer, init sequence, refresh     |
//! | Drawing     | [`Display`]               | Primitives, text, bitmaps, updates      |
//! | Frame loop  | [`app::Runner`]           | Calls an [`app::Application`] per frame |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};
//! use ssd1306_gfx::{Builder, Display, I2cInterface, PanelType};
//!
//! # struct MockI2c;
//! # impl embedded_hal::i2c::ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c<SevenBitAddress> for MockI2c {
//! #     fn transaction(
//! #         &mut self,
//! #         _address: u8,
//! #         _operations: &mut [Operation<'_>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # let i2c = MockI2c;
//! let config = match Builder::new().panel(PanelType::Ssd1306_128x64).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let interface = I2cInterface::new(i2c, config.address);
//!
//! let mut display = Display::new(interface, config);
//! if display.init().is_err() {
//!     return;
//! }
//!
//! display.draw_string(0, 0, "Hello");
//! display.draw_line(0, 10, 127, 63);
//! let _ = display.update(false);
//! ```

#![no_std]

extern crate alloc;

/// Frame loop harness
pub mod app;
/// Monochrome bitmaps and rectangles
pub mod bitmap;
/// Drawing colors
pub mod color;
/// SSD1306 command definitions
pub mod command;
/// Panel configuration types and builder
pub mod config;
/// Panel driver and refresh protocol
pub mod device;
/// Drawing engine
pub mod display;
/// Intensity dithering
pub mod dither;
/// Software SSD1306 controller
pub mod emulator;
/// Error types for the driver
pub mod error;
/// Glyph fonts
pub mod font;
/// Pixel store with dirty tracking
pub mod framebuffer;
/// Bus transport abstraction
pub mod interface;
/// Scrolling signal trace
pub mod oscilloscope;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use bitmap::{Bitmap, Rect};
pub use color::Color;
pub use command::{ScrollDirection, ScrollInterval};
pub use config::{Builder, Config, DEFAULT_ADDRESS, Dimensions, MAX_COLUMNS, MAX_ROWS, PanelType};
pub use device::{Device, DeviceResult};
pub use display::{Display, UpdateState};
pub use dither::Dithering;
pub use emulator::Emulator;
pub use error::{BuilderError, Error};
pub use font::Font;
pub use framebuffer::{BufferGuard, FrameBuffer, PageRegion};
pub use interface::{I2cInterface, MAX_I2C_TRANSACTION_LEN, Transport};
pub use oscilloscope::Oscilloscope;
