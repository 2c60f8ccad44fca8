//! Packed 1-bit framebuffer with per-page dirty tracking
//!
//! The buffer mirrors SSD1306 GDDRAM: `height / 8` pages, each `width` bytes
//! long. Byte `page * width + x` holds the 8 pixels of column `x` in that page,
//! bit 0 being the topmost row.
//!
//! ```text
//!          col 0   col 1   ...  col w-1
//! page 0 [ b0..b7 ][ b0..b7 ]  [ b0..b7 ]   rows 0..=7
//! page 1 [ b0..b7 ][ b0..b7 ]  [ b0..b7 ]   rows 8..=15
//! ...
//! ```
//!
//! Every page carries a [`PageRegion`], the inclusive column span written
//! since the last refresh. Refresh only needs to send those bytes.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use crate::color::Color;
use crate::config::Dimensions;

/// Dirty column span of one page
///
/// Empty when `left > right`; the canonical empty region is
/// `left = u8::MAX, right = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRegion {
    /// First dirty column (inclusive)
    pub left: u8,
    /// Last dirty column (inclusive)
    pub right: u8,
    /// Locked pages are skipped by non-forced refreshes
    pub locked: bool,
}

impl PageRegion {
    const EMPTY: Self = Self {
        left: u8::MAX,
        right: 0,
        locked: false,
    };

    /// Whether no column of this page is dirty
    pub fn is_empty(&self) -> bool {
        self.left > self.right
    }

    /// Dirty span as an inclusive range, if any
    pub fn span(&self) -> Option<(u8, u8)> {
        (!self.is_empty()).then_some((self.left, self.right))
    }

    fn extend(&mut self, left: u8, right: u8) {
        self.left = self.left.min(left);
        self.right = self.right.max(right);
    }

    fn reset(&mut self) {
        self.left = Self::EMPTY.left;
        self.right = Self::EMPTY.right;
    }
}

impl Default for PageRegion {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Pixel store plus dirty-region table
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    dimensions: Dimensions,
    buffer: Vec<u8>,
    regions: Vec<PageRegion>,
    partial_updates: bool,
}

impl FrameBuffer {
    /// Allocate a cleared buffer with empty dirty regions
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            buffer: vec![0; dimensions.buffer_size()],
            regions: vec![PageRegion::EMPTY; dimensions.pages()],
            partial_updates: true,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.dimensions.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.dimensions.height
    }

    /// Number of 8-row pages
    pub fn pages(&self) -> usize {
        self.regions.len()
    }

    /// Buffer dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Raw GDDRAM-ordered bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Bytes of one page, `None` if the page does not exist
    pub fn page(&self, page: usize) -> Option<&[u8]> {
        let width = self.width() as usize;
        self.buffer.get(page * width..(page + 1) * width)
    }

    /// Whether `(x, y)` lies inside the buffer
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < i32::from(self.width()) && y < i32::from(self.height())
    }

    /// Byte index and bit mask of an on-screen pixel
    #[inline]
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if !self.contains(x, y) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some(((y / 8) * self.width() as usize + x, 1 << (y % 8)))
    }

    /// Write one pixel and mark it dirty
    ///
    /// Coordinates outside the buffer are ignored.
    pub fn write_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some((index, mask)) = self.locate(x, y) else {
            return;
        };
        color.apply(&mut self.buffer[index], mask);
        self.mark_point(x, y);
    }

    /// Read one pixel, `false` when off-screen
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        self.locate(x, y)
            .is_some_and(|(index, mask)| self.buffer[index] & mask != 0)
    }

    /// Mutable access to the byte holding column `x` of `page`
    ///
    /// The caller is responsible for marking the column dirty.
    #[inline]
    pub(crate) fn byte_mut(&mut self, x: usize, page: usize) -> Option<&mut u8> {
        let width = self.width() as usize;
        if x >= width {
            return None;
        }
        self.buffer.get_mut(page * width + x)
    }

    /// Fill the whole buffer with `byte` and mark everything dirty
    pub fn fill(&mut self, byte: u8) {
        self.buffer.fill(byte);
        self.mark_all();
    }

    /// Clear to black and mark everything dirty
    pub fn clear(&mut self) {
        self.fill(0x00);
    }

    /// Copy `data` over the start of the buffer and mark everything dirty
    ///
    /// Returns the number of bytes copied.
    pub fn copy_from(&mut self, data: &[u8]) -> usize {
        let len = data.len().min(self.buffer.len());
        self.buffer[..len].copy_from_slice(&data[..len]);
        self.mark_all();
        len
    }

    /// Enable or disable dirty tracking
    ///
    /// Enabling starts from a clean slate: all regions are emptied.
    pub fn set_partial_updates(&mut self, enable: bool) {
        self.partial_updates = enable;
        if enable {
            self.clear_regions();
        }
    }

    /// Whether dirty tracking is enabled
    pub fn partial_updates(&self) -> bool {
        self.partial_updates
    }

    /// Dirty region of `page`
    pub fn region(&self, page: usize) -> Option<&PageRegion> {
        self.regions.get(page)
    }

    /// Whether any unlocked page has pending changes
    pub fn is_dirty(&self) -> bool {
        self.regions.iter().any(|r| !r.locked && !r.is_empty())
    }

    /// Empty every page's dirty region, keeping lock flags
    pub fn clear_regions(&mut self) {
        self.regions.iter_mut().for_each(PageRegion::reset);
    }

    pub(crate) fn clear_region(&mut self, page: usize) {
        if let Some(region) = self.regions.get_mut(page) {
            region.reset();
        }
    }

    /// Include or exclude a page from non-forced refreshes
    ///
    /// The dirty region is left as is. Out-of-range pages are ignored.
    pub fn lock_page(&mut self, page: usize, lock: bool) {
        if let Some(region) = self.regions.get_mut(page) {
            region.locked = lock;
        }
    }

    /// Whether `page` is locked
    pub fn is_page_locked(&self, page: usize) -> bool {
        self.regions.get(page).is_some_and(|r| r.locked)
    }

    /// Union `[x_start, x_end]` into the dirty region of `page`
    ///
    /// The span is clamped to the buffer width; inverted or fully off-screen
    /// spans are ignored.
    pub fn mark_page(&mut self, x_start: i32, x_end: i32, page: usize) {
        if !self.partial_updates || page >= self.regions.len() {
            return;
        }
        let Some((left, right)) = self.clamp_span(x_start, x_end) else {
            return;
        };
        self.regions[page].extend(left, right);
    }

    /// Mark a single pixel dirty
    pub fn mark_point(&mut self, x: i32, y: i32) {
        if !self.contains(x, y) {
            return;
        }
        self.mark_page(x, x, y as usize / 8);
    }

    /// Mark a horizontal run on row `y` dirty
    pub fn mark_row(&mut self, x_start: i32, x_end: i32, y: i32) {
        if y < 0 || y >= i32::from(self.height()) {
            return;
        }
        self.mark_page(x_start, x_end, y as usize / 8);
    }

    /// Mark the rectangle `[x_start, x_end] x [y_start, y_end]` dirty
    ///
    /// Both spans are inclusive and clamped to the buffer.
    pub fn mark_region(&mut self, x_start: i32, x_end: i32, y_start: i32, y_end: i32) {
        if !self.partial_updates {
            return;
        }
        let Some((top, bottom)) = clamp(y_start, y_end, i32::from(self.height())) else {
            return;
        };
        let Some((left, right)) = self.clamp_span(x_start, x_end) else {
            return;
        };
        for page in (top / 8) as usize..=(bottom / 8) as usize {
            self.regions[page].extend(left, right);
        }
    }

    /// Mark the entire buffer dirty
    pub fn mark_all(&mut self) {
        self.mark_region(0, i32::from(self.width()) - 1, 0, i32::from(self.height()) - 1);
    }

    fn clamp_span(&self, x_start: i32, x_end: i32) -> Option<(u8, u8)> {
        clamp(x_start, x_end, i32::from(self.width())).map(|(l, r)| (l as u8, r as u8))
    }

    /// Raw mutable access that re-marks the whole screen dirty when dropped
    pub fn lock(&mut self) -> BufferGuard<'_> {
        BufferGuard { framebuffer: self }
    }
}

/// Clamp the inclusive span `[start, end]` to `0..limit`
fn clamp(start: i32, end: i32, limit: i32) -> Option<(i32, i32)> {
    if end < start || start >= limit || end < 0 {
        return None;
    }
    Some((start.max(0), end.min(limit - 1)))
}

/// Scoped raw access to the pixel bytes
///
/// Dereferences to the GDDRAM-ordered byte slice. Since arbitrary bytes may
/// change, the whole screen is marked dirty when the guard goes out of scope.
pub struct BufferGuard<'a> {
    framebuffer: &'a mut FrameBuffer,
}

impl Deref for BufferGuard<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.framebuffer.buffer
    }
}

impl DerefMut for BufferGuard<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.framebuffer.buffer
    }
}

impl Drop for BufferGuard<'_> {
    fn drop(&mut self) {
        self.framebuffer.mark_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelType;

    fn buffer() -> FrameBuffer {
        FrameBuffer::new(PanelType::Ssd1306_128x64.dimensions())
    }

    #[test]
    fn test_new_buffer_is_clean() {
        let fb = buffer();
        assert_eq!(fb.as_bytes().len(), 1024);
        assert_eq!(fb.pages(), 8);
        assert!(!fb.is_dirty());
        assert!(fb.region(0).unwrap().is_empty());
    }

    #[test]
    fn test_write_pixel_sets_bit_and_marks_page() {
        let mut fb = buffer();
        fb.write_pixel(5, 10, Color::White);
        assert_eq!(fb.as_bytes()[128 + 5], 0b0000_0100);
        assert!(fb.get_pixel(5, 10));
        assert_eq!(fb.region(1).unwrap().span(), Some((5, 5)));
        assert!(fb.region(0).unwrap().is_empty());
    }

    #[test]
    fn test_write_pixel_off_screen_is_ignored() {
        let mut fb = buffer();
        fb.write_pixel(-1, 0, Color::White);
        fb.write_pixel(0, 64, Color::White);
        fb.write_pixel(128, 3, Color::White);
        assert!(fb.as_bytes().iter().all(|b| *b == 0));
        assert!(!fb.is_dirty());
    }

    #[test]
    fn test_invert_pixel_toggles() {
        let mut fb = buffer();
        fb.write_pixel(0, 0, Color::Invert);
        assert!(fb.get_pixel(0, 0));
        fb.write_pixel(0, 0, Color::Invert);
        assert!(!fb.get_pixel(0, 0));
    }

    #[test]
    fn test_mark_region_clamps_and_spans_pages() {
        let mut fb = buffer();
        fb.mark_region(-10, 200, 6, 17);
        for page in 0..=2 {
            assert_eq!(fb.region(page).unwrap().span(), Some((0, 127)));
        }
        assert!(fb.region(3).unwrap().is_empty());
    }

    #[test]
    fn test_mark_region_inverted_or_off_screen_is_noop() {
        let mut fb = buffer();
        fb.mark_region(10, 5, 0, 7);
        fb.mark_region(0, 5, 7, 0);
        fb.mark_region(128, 200, 0, 7);
        fb.mark_region(0, 5, 64, 80);
        fb.mark_row(0, 5, -1);
        assert!(!fb.is_dirty());
    }

    #[test]
    fn test_regions_union() {
        let mut fb = buffer();
        fb.mark_row(20, 30, 0);
        fb.mark_row(5, 10, 3);
        assert_eq!(fb.region(0).unwrap().span(), Some((5, 30)));
    }

    #[test]
    fn test_disabled_tracking_ignores_marks() {
        let mut fb = buffer();
        fb.set_partial_updates(false);
        fb.write_pixel(3, 3, Color::White);
        assert!(fb.region(0).unwrap().is_empty());
        assert!(fb.get_pixel(3, 3));
    }

    #[test]
    fn test_enabling_tracking_clears_regions() {
        let mut fb = buffer();
        fb.write_pixel(3, 3, Color::White);
        fb.set_partial_updates(true);
        assert!(!fb.is_dirty());
    }

    #[test]
    fn test_lock_page_keeps_region() {
        let mut fb = buffer();
        fb.write_pixel(3, 3, Color::White);
        fb.lock_page(0, true);
        assert!(fb.is_page_locked(0));
        assert_eq!(fb.region(0).unwrap().span(), Some((3, 3)));
        assert!(!fb.is_dirty());
        fb.lock_page(99, true);
    }

    #[test]
    fn test_guard_marks_everything_on_drop() {
        let mut fb = buffer();
        {
            let mut raw = fb.lock();
            raw[0] = 0xFF;
        }
        assert_eq!(fb.as_bytes()[0], 0xFF);
        for page in 0..fb.pages() {
            assert_eq!(fb.region(page).unwrap().span(), Some((0, 127)));
        }
    }

    #[test]
    fn test_copy_from_truncates() {
        let mut fb = buffer();
        let data = [0xAAu8; 2000];
        assert_eq!(fb.copy_from(&data), 1024);
        assert_eq!(fb.copy_from(&data[..10]), 10);
    }
}
