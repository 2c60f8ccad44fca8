//! Drawing colors for monochrome OLED panels
//!
//! The SSD1306 stores one bit per pixel: a set bit lights the pixel, a cleared
//! bit leaves it dark. Drawing operations additionally support toggling a
//! pixel ([`Color::Invert`]) and skipping it ([`Color::Transparent`]).
//!
//! | Color         | Effect on the pixel bit |
//! |---------------|-------------------------|
//! | `Black`       | cleared (`&= !mask`)    |
//! | `White`       | set (`\|= mask`)        |
//! | `Invert`      | toggled (`^= mask`)     |
//! | `Transparent` | untouched               |
//!
//! ## Example
//!
//! ```
//! use ssd1306_gfx::Color;
//!
//! let mut byte = 0b0000_0000u8;
//! Color::White.apply(&mut byte, 0x01);
//! assert_eq!(byte, 0x01);
//!
//! Color::Invert.apply(&mut byte, 0x03);
//! assert_eq!(byte, 0x02);
//!
//! Color::Transparent.apply(&mut byte, 0xFF);
//! assert_eq!(byte, 0x02);
//! ```

/// Drawing color
///
/// `Transparent` is a write marker used for text and bitmap backgrounds; it is
/// never stored in the framebuffer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Pixel off
    #[default]
    Black,
    /// Pixel on (white, blue or yellow depending on the panel)
    White,
    /// Toggle the pixel (XOR)
    Invert,
    /// Leave the pixel untouched
    Transparent,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU8;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Self::Black,
            embedded_graphics_core::pixelcolor::BinaryColor::On => Self::White,
        }
    }
}

impl Color {
    /// Apply this color to the bits selected by `mask` in `byte`
    #[inline]
    pub fn apply(self, byte: &mut u8, mask: u8) {
        match self {
            Self::Black => *byte &= !mask,
            Self::White => *byte |= mask,
            Self::Invert => *byte ^= mask,
            Self::Transparent => {}
        }
    }

    /// Get the byte value that fills a whole page byte with this color
    ///
    /// Returns `None` for colors that depend on the existing content
    /// ([`Color::Invert`], [`Color::Transparent`]).
    ///
    /// ```
    /// use ssd1306_gfx::Color;
    ///
    /// assert_eq!(Color::Black.fill_byte(), Some(0x00));
    /// assert_eq!(Color::White.fill_byte(), Some(0xFF));
    /// assert_eq!(Color::Invert.fill_byte(), None);
    /// ```
    pub fn fill_byte(self) -> Option<u8> {
        match self {
            Self::Black => Some(0x00),
            Self::White => Some(0xFF),
            Self::Invert | Self::Transparent => None,
        }
    }

    /// Whether drawing with this color modifies the framebuffer at all
    pub fn is_opaque(self) -> bool {
        self != Self::Transparent
    }
}

impl From<bool> for Color {
    fn from(on: bool) -> Self {
        if on { Self::White } else { Self::Black }
    }
}
