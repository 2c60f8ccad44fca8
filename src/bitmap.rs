//! Monochrome bitmaps with an optional alpha plane
//!
//! Pixels are stored row by row, MSB first. With an alpha plane every pixel
//! byte is followed by the alpha byte covering the same 8 pixels:
//!
//! ```text
//! 1 bpp:  P0 P1 P2 ...          (P = 8 pixels)
//! 2 bpp:  P0 A0 P1 A1 P2 A2 ... (A = alpha of the same 8 pixels)
//! ```
//!
//! A set alpha bit means the pixel is drawn; a cleared one leaves the
//! destination untouched.

use alloc::borrow::Cow;
use alloc::vec;

use crate::framebuffer::FrameBuffer;

/// Inclusive rectangle in pixel coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// Leftmost column
    pub left: i32,
    /// Topmost row
    pub top: i32,
    /// Rightmost column (inclusive)
    pub right: i32,
    /// Bottom row (inclusive)
    pub bottom: i32,
}

impl Rect {
    /// Create a rectangle from inclusive corners, normalizing their order
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            left: x1.min(x2),
            top: y1.min(y2),
            right: x1.max(x2),
            bottom: y1.max(y2),
        }
    }

    /// Create a rectangle from its top-left corner and size
    ///
    /// A zero size yields an empty rectangle.
    pub fn with_size(x: i32, y: i32, width: u16, height: u16) -> Self {
        let (left, right) = span(x, width);
        let (top, bottom) = span(y, height);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width in pixels, 0 when empty
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left).saturating_add(1).max(0)
    }

    /// Height in pixels, 0 when empty
    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top).saturating_add(1).max(0)
    }

    /// Whether the rectangle contains no pixel
    pub fn is_empty(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// Intersection with another rectangle (possibly empty)
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }
}

/// Inclusive bounds of `len` pixels from `start`; `len == 0` gives `end < start`
fn span(start: i32, len: u16) -> (i32, i32) {
    if len == 0 {
        let start = start.max(i32::MIN + 1);
        (start, start - 1)
    } else {
        (start, start.saturating_add(i32::from(len) - 1))
    }
}

/// Pixel source for blits
///
/// The pixel data is either borrowed (e.g. a `static` asset) or owned.
#[derive(Clone, Debug)]
pub struct Bitmap<'a> {
    width: u16,
    height: u16,
    bytes_per_line: u16,
    alpha: bool,
    data: Cow<'a, [u8]>,
}

impl<'a> Bitmap<'a> {
    /// Borrow a 1 bpp bitmap
    pub fn new(width: u16, height: u16, data: &'a [u8]) -> Self {
        Self::from_raw(width, height, width.div_ceil(8), false, data)
    }

    /// Borrow a 2 bpp bitmap (interleaved pixel and alpha bytes)
    pub fn with_alpha(width: u16, height: u16, data: &'a [u8]) -> Self {
        Self::from_raw(width, height, width.div_ceil(8) * 2, true, data)
    }

    /// Borrow pixel data with an explicit line stride
    pub fn from_raw(
        width: u16,
        height: u16,
        bytes_per_line: u16,
        alpha: bool,
        data: &'a [u8],
    ) -> Self {
        Self {
            width,
            height,
            bytes_per_line,
            alpha,
            data: Cow::Borrowed(data),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per line, including alpha bytes
    pub fn bytes_per_line(&self) -> u16 {
        self.bytes_per_line
    }

    /// 1, or 2 with an alpha plane
    pub fn bits_per_pixel(&self) -> u8 {
        if self.alpha { 2 } else { 1 }
    }

    /// Whether an alpha plane is present
    pub fn has_alpha(&self) -> bool {
        self.alpha
    }

    /// Whether the pixel data is owned
    pub fn is_owned(&self) -> bool {
        matches!(self.data, Cow::Owned(_))
    }

    /// Raw pixel bytes
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Raw pixel bytes, mutably
    ///
    /// Borrowed data is copied into an owned buffer first.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.data.to_mut()
    }

    /// Full-size rectangle at the origin
    pub fn bounds(&self) -> Rect {
        Rect::with_size(0, 0, self.width, self.height)
    }

    /// Byte offset of the pixel byte holding `(x, y)`
    #[inline]
    fn offset(&self, x: u16, y: u16) -> usize {
        y as usize * self.bytes_per_line as usize
            + (x as usize / 8) * usize::from(self.bits_per_pixel())
    }

    /// Pixel bit at `(x, y)`, `false` outside the bitmap
    pub fn pixel(&self, x: u16, y: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data
            .get(self.offset(x, y))
            .is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0)
    }

    /// Alpha bit at `(x, y)`; always `true` without an alpha plane
    pub fn alpha(&self, x: u16, y: u16) -> bool {
        if !self.alpha {
            return x < self.width && y < self.height;
        }
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data
            .get(self.offset(x, y) + 1)
            .is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0)
    }

    /// Set or clear the pixel bit at `(x, y)`
    pub fn set_pixel(&mut self, x: u16, y: u16, on: bool) {
        self.set_bit(x, y, 0, on);
    }

    /// Set or clear the alpha bit at `(x, y)`; ignored without an alpha plane
    pub fn set_alpha(&mut self, x: u16, y: u16, opaque: bool) {
        if self.alpha {
            self.set_bit(x, y, 1, opaque);
        }
    }

    fn set_bit(&mut self, x: u16, y: u16, plane: usize, on: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = self.offset(x, y) + plane;
        let mask = 0x80 >> (x % 8);
        if let Some(byte) = self.data.to_mut().get_mut(index) {
            if on {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }
}

impl Bitmap<'static> {
    /// Allocate a cleared, owned bitmap
    pub fn owned(width: u16, height: u16, alpha: bool) -> Self {
        let bits_per_pixel: u16 = if alpha { 2 } else { 1 };
        let bytes_per_line = width.div_ceil(8) * bits_per_pixel;
        Self {
            width,
            height,
            bytes_per_line,
            alpha,
            data: Cow::Owned(vec![0; bytes_per_line as usize * height as usize]),
        }
    }
}

impl From<&FrameBuffer> for Bitmap<'static> {
    /// Snapshot the framebuffer into a row-major 1 bpp bitmap
    fn from(framebuffer: &FrameBuffer) -> Self {
        let mut bitmap = Self::owned(framebuffer.width(), framebuffer.height(), false);
        for y in 0..framebuffer.height() {
            for x in 0..framebuffer.width() {
                if framebuffer.get_pixel(i32::from(x), i32::from(y)) {
                    bitmap.set_pixel(x, y, true);
                }
            }
        }
        bitmap
    }
}
