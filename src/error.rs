//! Error types for the driver
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors while talking to the panel
//!
//! Drawing never fails: out-of-range coordinates and degenerate shapes are
//! silently clipped away, so none of the drawing calls return a `Result`.
//!
//! ## Example
//!
//! ```
//! use ssd1306_gfx::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Height must be a whole number of pages
//! let result = Dimensions::new(128, 60);
//! assert!(result.is_err());
//! ```

use crate::interface::Transport;

/// Maximum number of segment outputs (columns) of the SSD1306
pub const MAX_COLUMNS: u16 = 128;

/// Maximum number of common outputs (rows) of the SSD1306
pub const MAX_ROWS: u16 = 64;

/// Minimum number of rows the multiplexer can drive
pub const MIN_ROWS: u16 = 16;

/// Errors that can occur when interacting with the panel
///
/// Generic over the transport so the underlying bus error can be matched on.
#[derive(Debug)]
pub enum Error<T: Transport> {
    /// Transport error
    ///
    /// Wraps the error reported by the [`Transport`] implementation.
    Interface(T::Error),
    /// The controller did not acknowledge its address during init
    NotResponding,
    /// A raw buffer handed to the driver has the wrong size
    BufferSizeMismatch {
        /// Framebuffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

impl<T: Transport> core::fmt::Display for Error<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::NotResponding => write!(f, "Display not responding"),
            Self::BufferSizeMismatch { required, provided } => write!(
                f,
                "Buffer size mismatch: required {required} bytes, provided {provided}"
            ),
        }
    }
}

impl<T: Transport + core::fmt::Debug> core::error::Error for Error<T> {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Neither a panel type nor explicit dimensions were given
    ///
    /// Call [`Builder::panel`](crate::config::Builder::panel) or
    /// [`Builder::dimensions`](crate::config::Builder::dimensions) before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels
        width: u16,
        /// Height in pixels
        height: u16,
    },
    /// The bus address does not fit in 7 bits
    InvalidAddress(u8),
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Panel type or dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (max {MAX_COLUMNS}x{MAX_ROWS}, height must be a multiple of 8 and at least {MIN_ROWS})"
            ),
            Self::InvalidAddress(address) => {
                write!(f, "Invalid 7-bit bus address 0x{address:02X}")
            }
        }
    }
}

impl core::error::Error for BuilderError {}
