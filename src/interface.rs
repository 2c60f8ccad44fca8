//! Bus transport abstraction
//!
//! This module provides the [`Transport`] trait, the byte sink the driver
//! writes commands and pixel data into, and [`I2cInterface`], its
//! implementation for an embedded-hal v1.0 I2C bus.
//!
//! ## Framing
//!
//! The SSD1306 distinguishes commands from GDDRAM data by the control byte
//! that opens each I2C transaction:
//!
//! ```text
//! [address] 0x00 opcode params...   (command stream)
//! [address] 0x40 pixel bytes...     (data stream)
//! ```
//!
//! Commands and data are never mixed in one transaction.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};
//! use ssd1306_gfx::{I2cInterface, Transport};
//! # use core::convert::Infallible;
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
//! let mut interface = I2cInterface::new(MockI2c, 0x3C);
//!
//! if interface.probe() {
//!     // Display off
//!     let _ = interface.send_control(0xAE);
//!     // Eight lit rows in the first column
//!     let _ = interface.send_data(0xFF);
//! }
//! ```

use core::fmt::Debug;
use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};

use crate::command::{CONTROL_COMMAND_STREAM, CONTROL_DATA_STREAM, Opcode};

/// Maximum bytes per I2C transaction including the control byte
pub const MAX_I2C_TRANSACTION_LEN: usize = 32;

/// Byte sink for SSD1306 commands and GDDRAM data
///
/// The [`Device`](crate::device::Device) encodes everything it needs through
/// this trait, so the same refresh code drives real hardware through
/// [`I2cInterface`] or the software [`Emulator`](crate::emulator::Emulator).
///
/// ## Implementing
///
/// Only the buffer variants and [`probe`](Transport::probe) are required.
/// Buffers handed to the `*_buffer` methods never exceed
/// [`max_transfer`](Transport::max_transfer) bytes when they come from the
/// driver's refresh path.
pub trait Transport {
    /// Error type for bus operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send a single command or parameter byte
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    fn send_control(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.send_control_buffer(&[byte])
    }

    /// Send a run of command and parameter bytes as one command stream
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    fn send_control_buffer(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Send a single GDDRAM byte
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    fn send_data(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.send_data_buffer(&[byte])
    }

    /// Send a run of GDDRAM bytes as one data stream
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    fn send_data_buffer(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Check whether the controller answers on the bus
    fn probe(&mut self) -> bool;

    /// Largest payload (excluding the control byte) a single transaction carries
    fn max_transfer(&self) -> usize;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn send_control(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).send_control(byte)
    }

    fn send_control_buffer(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).send_control_buffer(bytes)
    }

    fn send_data(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).send_data(byte)
    }

    fn send_data_buffer(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).send_data_buffer(bytes)
    }

    fn probe(&mut self) -> bool {
        (**self).probe()
    }

    fn max_transfer(&self) -> usize {
        (**self).max_transfer()
    }
}

/// [`Transport`] over an embedded-hal v1.0 I2C bus
///
/// ## Type Parameters
///
/// * `I2C` - Bus implementing [`I2c`] with 7-bit addressing
///
/// ## Example
///
/// ```rust,no_run
/// use ssd1306_gfx::{Builder, Device, I2cInterface, PanelType};
/// # use core::convert::Infallible;
/// # use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};
/// # struct MockI2c;
/// # impl embedded_hal::i2c::ErrorType for MockI2c { type Error = Infallible; }
/// # impl I2c<SevenBitAddress> for MockI2c {
/// #     fn transaction(
/// #         &mut self,
/// #         _address: u8,
/// #         _operations: &mut [Operation<'_>],
/// #     ) -> Result<(), Self::Error> {
/// #         Ok(())
/// #     }
/// # }
/// let config = match Builder::new().panel(PanelType::Ssd1306_128x64).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let interface = I2cInterface::new(MockI2c, config.address);
/// let mut device = Device::new(interface, config);
/// let _ = device.init();
/// ```
pub struct I2cInterface<I2C> {
    /// I2C bus
    i2c: I2C,
    /// 7-bit device address
    address: SevenBitAddress,
}

impl<I2C> I2cInterface<I2C>
where
    I2C: I2c<SevenBitAddress>,
{
    /// Create a new interface for the controller at `address` (7-bit)
    pub fn new(i2c: I2C, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    /// Get the 7-bit device address
    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Release the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_stream(&mut self, control: u8, bytes: &[u8]) -> Result<(), I2C::Error> {
        for chunk in bytes.chunks(MAX_I2C_TRANSACTION_LEN - 1) {
            self.i2c.transaction(
                self.address,
                &mut [Operation::Write(&[control]), Operation::Write(chunk)],
            )?;
        }
        Ok(())
    }
}

impl<I2C> Transport for I2cInterface<I2C>
where
    I2C: I2c<SevenBitAddress>,
{
    type Error = I2C::Error;

    fn send_control_buffer(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.write_stream(CONTROL_COMMAND_STREAM, bytes)
    }

    fn send_data_buffer(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.write_stream(CONTROL_DATA_STREAM, bytes)
    }

    fn probe(&mut self) -> bool {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND_STREAM, Opcode::Nop.byte()])
            .is_ok()
    }

    fn max_transfer(&self) -> usize {
        MAX_I2C_TRANSACTION_LEN - 1
    }
}
