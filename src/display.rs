//! Drawing engine
//!
//! [`Display`] wraps a [`Device`] and draws into its framebuffer. Every
//! primitive clips against the screen and marks the touched columns dirty, so a
//! later [`Display::refresh`] sends only what changed. Drawing never fails:
//! degenerate or fully off-screen geometry is silently ignored.
//!
//! Shapes use the foreground color; text and bitmaps also paint zero bits with
//! the background color unless it is [`Color::Transparent`].
//!
//! ## Deferred updates
//!
//! With deferred updates enabled, [`Display::update`] only records that a
//! refresh is wanted; the frame loop calls [`Display::refresh`] once per frame
//! to send it. Without, `update` refreshes immediately.
//!
//! ## Example
//!
//! ```
//! use ssd1306_gfx::{Builder, Color, Display, Emulator, PanelType};
//!
//! let config = match Builder::new().panel(PanelType::Ssd1306_128x64).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let mut display = Display::new(Emulator::new(128, 64), config);
//! if display.init().is_err() {
//!     return;
//! }
//!
//! display.set_foreground(Color::White);
//! display.draw_rectangle(0, 0, 127, 63);
//! display.fill_circle(64, 32, 10);
//! display.draw_string(4, 4, "hello");
//! let _ = display.update(false);
//!
//! assert!(display.device().transport().get_pixel(64, 32));
//! ```

use crate::bitmap::{Bitmap, Rect};
use crate::color::Color;
use crate::command::{ScrollDirection, ScrollInterval};
use crate::config::{Config, MAX_COLUMNS};
use crate::device::{Device, DeviceResult};
use crate::dither::{Dithering, dithered};
use crate::font::{self, Font};
use crate::framebuffer::{BufferGuard, FrameBuffer};
use crate::interface::Transport;

/// Pending refresh requested through [`Display::update`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum UpdateState {
    /// Nothing to send
    #[default]
    Idle,
    /// Send the dirty regions
    Needed,
    /// Send the whole buffer
    Forced,
}

/// Drawing surface over a [`Device`]
pub struct Display<T>
where
    T: Transport,
{
    /// Panel driver owning the framebuffer
    device: Device<T>,
    /// Color for shapes and set glyph/bitmap bits
    foreground: Color,
    /// Color for cleared glyph/bitmap bits
    background: Color,
    /// Current font
    font: Option<&'static Font>,
    /// Threshold pattern for dithered drawing
    dithering: Dithering,
    /// Whether `update` defers to `refresh`
    deferred_updates: bool,
    /// Pending deferred refresh
    update_state: UpdateState,
}

impl<T> Display<T>
where
    T: Transport,
{
    /// Create a drawing surface; call [`init`](Self::init) before refreshing
    pub fn new(transport: T, config: Config) -> Self {
        let deferred_updates = config.deferred_updates;
        Self {
            device: Device::new(transport, config),
            foreground: Color::White,
            background: Color::Black,
            font: font::builtin(0),
            dithering: Dithering::Ordered,
            deferred_updates,
            update_state: UpdateState::Idle,
        }
    }

    /// Initialize the panel
    ///
    /// Deferred updates are switched off and the first built-in font is
    /// selected; a frame loop turns deferral back on once the application
    /// has set itself up.
    pub fn init(&mut self) -> DeviceResult<T> {
        self.device.init()?;
        self.deferred_updates = false;
        self.update_state = UpdateState::Idle;
        self.set_builtin_font(0);
        Ok(())
    }

    /// Width in pixels
    pub fn width(&self) -> i32 {
        i32::from(self.device.width())
    }

    /// Height in pixels
    pub fn height(&self) -> i32 {
        i32::from(self.device.height())
    }

    /// The underlying driver
    pub fn device(&self) -> &Device<T> {
        &self.device
    }

    /// The underlying driver, mutably
    pub fn device_mut(&mut self) -> &mut Device<T> {
        &mut self.device
    }

    /// Give back the driver
    pub fn release(self) -> Device<T> {
        self.device
    }

    fn fb(&mut self) -> &mut FrameBuffer {
        self.device.framebuffer_mut()
    }

    // Colors

    /// Set the foreground color, returning the previous one
    pub fn set_foreground(&mut self, color: Color) -> Color {
        core::mem::replace(&mut self.foreground, color)
    }

    /// Current foreground color
    pub fn foreground(&self) -> Color {
        self.foreground
    }

    /// Set the background color, returning the previous one
    pub fn set_background(&mut self, color: Color) -> Color {
        core::mem::replace(&mut self.background, color)
    }

    /// Current background color
    pub fn background(&self) -> Color {
        self.background
    }

    // Pixels and lines

    /// Clear the buffer to black
    pub fn clear(&mut self) {
        self.device.clear();
    }

    /// Draw one pixel in the foreground color
    pub fn draw_pixel(&mut self, x: i32, y: i32) {
        let color = self.foreground;
        self.draw_pixel_color(x, y, color);
    }

    /// Draw one pixel in `color`
    pub fn draw_pixel_color(&mut self, x: i32, y: i32, color: Color) {
        if color.is_opaque() {
            self.fb().write_pixel(x, y, color);
        }
    }

    /// Read one pixel from the buffer
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        self.device.framebuffer().get_pixel(x, y)
    }

    /// Draw a horizontal line from `(x, y)` to `(x2, y)` inclusive
    pub fn draw_horizontal_line(&mut self, x: i32, y: i32, x2: i32) {
        let color = self.foreground;
        self.hline(x, y, x2, color);
    }

    fn hline(&mut self, x: i32, y: i32, x2: i32, color: Color) {
        let Some((left, right)) = self.clip_row(x, y, x2) else {
            return;
        };
        if !color.is_opaque() {
            return;
        }
        let page = y as usize / 8;
        let mask = 1u8 << (y & 7);
        let fb = self.fb();
        for col in left..=right {
            if let Some(byte) = fb.byte_mut(col as usize, page) {
                color.apply(byte, mask);
            }
        }
        fb.mark_row(left, right, y);
    }

    /// Sort and clip a horizontal run, `None` when nothing is visible
    fn clip_row(&self, x: i32, y: i32, x2: i32) -> Option<(i32, i32)> {
        let (left, right) = (x.min(x2), x.max(x2));
        if y < 0 || y >= self.height() || right < 0 || left >= self.width() {
            return None;
        }
        Some((left.max(0), right.min(self.width() - 1)))
    }

    /// Draw a vertical line from `(x, y)` to `(x, y2)` inclusive
    pub fn draw_vertical_line(&mut self, x: i32, y: i32, y2: i32) {
        let color = self.foreground;
        self.vline(x, y, y2, color);
    }

    fn vline(&mut self, x: i32, y: i32, y2: i32, color: Color) {
        let (top, bottom) = (y.min(y2), y.max(y2));
        if x < 0 || x >= self.width() || bottom < 0 || top >= self.height() {
            return;
        }
        if !color.is_opaque() {
            return;
        }
        let top = top.max(0);
        let bottom = bottom.min(self.height() - 1);

        let (first_page, last_page) = (top / 8, bottom / 8);
        let fb = self.fb();
        for page in first_page..=last_page {
            let mut mask = 0xFFu8;
            if page == first_page {
                mask &= 0xFF << (top & 7);
            }
            if page == last_page {
                mask &= 0xFF >> (7 - (bottom & 7));
            }
            if let Some(byte) = fb.byte_mut(x as usize, page as usize) {
                color.apply(byte, mask);
            }
        }
        fb.mark_region(x, x, top, bottom);
    }

    /// Draw a line between two points inclusive
    ///
    /// Axis-aligned lines take the byte-wise paths. Other lines step along the
    /// longer axis and interpolate the shorter one in 16.16 fixed point.
    ///
    /// Points outside the screen are clipped pixel by pixel.
    ///
    /// # Example
    ///
    /// ```
    /// # use ssd1306_gfx::{Builder, Display, Emulator, PanelType};
    /// # let Ok(config) = Builder::new().panel(PanelType::Ssd1306_128x64).build() else { return };
    /// let mut display = Display::new(Emulator::new(128, 64), config);
    /// display.draw_line(0, 0, 7, 3);
    /// assert!(display.get_pixel(0, 0));
    /// assert!(display.get_pixel(7, 3));
    ///
    /// // A zero-length line is a single pixel
    /// display.draw_line(50, 50, 50, 50);
    /// assert!(display.get_pixel(50, 50));
    /// ```
    pub fn draw_line(&mut self, x: i32, y: i32, x2: i32, y2: i32) {
        if x == x2 {
            self.draw_vertical_line(x, y, y2);
            return;
        }
        if y == y2 {
            self.draw_horizontal_line(x, y, x2);
            return;
        }
        let color = self.foreground;
        if !color.is_opaque() {
            return;
        }

        let (x, y, x2, y2) = (i64::from(x), i64::from(y), i64::from(x2), i64::from(y2));
        let mut short_len = y2 - y;
        let mut long_len = x2 - x;
        let steep = short_len.abs() > long_len.abs();
        if steep {
            core::mem::swap(&mut short_len, &mut long_len);
        }
        let step = (short_len << 16) / long_len;
        let dir = long_len.signum();

        // Start of the shorter axis, with rounding bias
        let (mut major, minor_start) = if steep { (y, x) } else { (x, y) };
        let end = major + long_len;
        let mut minor = 0x8000 + (minor_start << 16);

        let fb = self.fb();
        loop {
            let (px, py) = if steep {
                (minor >> 16, major)
            } else {
                (major, minor >> 16)
            };
            if let (Ok(px), Ok(py)) = (i32::try_from(px), i32::try_from(py)) {
                fb.write_pixel(px, py, color);
            }
            if major == end {
                break;
            }
            major += dir;
            minor += step * dir;
        }
    }

    // Rectangles

    /// Draw a rectangle outline with inclusive corners
    pub fn draw_rectangle(&mut self, x: i32, y: i32, x2: i32, y2: i32) {
        let rect = Rect::new(x, y, x2, y2);
        if rect.top == rect.bottom {
            self.draw_horizontal_line(rect.left, rect.top, rect.right);
            return;
        }
        if rect.left == rect.right {
            self.draw_vertical_line(rect.left, rect.top, rect.bottom);
            return;
        }
        self.draw_horizontal_line(rect.left, rect.top, rect.right);
        self.draw_horizontal_line(rect.left, rect.bottom, rect.right);
        if rect.bottom - rect.top > 1 {
            self.draw_vertical_line(rect.left, rect.top + 1, rect.bottom - 1);
            self.draw_vertical_line(rect.right, rect.top + 1, rect.bottom - 1);
        }
    }

    /// Fill a rectangle with inclusive corners
    pub fn fill_rectangle(&mut self, x: i32, y: i32, x2: i32, y2: i32) {
        let rect = Rect::new(x, y, x2, y2);
        let left = rect.left.max(0);
        let right = rect.right.min(self.width() - 1);
        for col in left..=right {
            self.draw_vertical_line(col, rect.top, rect.bottom);
        }
    }

    // Circles

    /// Draw a circle outline (midpoint algorithm); radius 0 draws nothing
    pub fn draw_circle(&mut self, x0: i32, y0: i32, r: i32) {
        if r <= 0 || self.circle_off_screen(x0, y0, r) {
            return;
        }
        let color = self.foreground;
        let fb = self.fb();
        let mut plot = |dx: i32, dy: i32| {
            fb.write_pixel(x0.saturating_add(dx), y0.saturating_add(dy), color);
        };

        midpoint_octant(r, |x, y| {
            if y == 0 {
                plot(x, 0);
                plot(-x, 0);
                plot(0, x);
                plot(0, -x);
            } else {
                plot(x, y);
                plot(-x, y);
                plot(x, -y);
                plot(-x, -y);
                // On the diagonal the mirrored octant is the same pixel
                if x != y {
                    plot(y, x);
                    plot(-y, x);
                    plot(y, -x);
                    plot(-y, -x);
                }
            }
        });
    }

    /// Fill a circle; radius 0 draws nothing
    ///
    /// The disk is drawn as one vertical span per screen column, so every
    /// pixel is written exactly once and [`Color::Invert`] toggles it once.
    ///
    /// # Example
    ///
    /// ```
    /// # use ssd1306_gfx::Color;
    /// # use ssd1306_gfx::{Builder, Display, Emulator, PanelType};
    /// # let Ok(config) = Builder::new().panel(PanelType::Ssd1306_128x64).build() else { return };
    /// let mut display = Display::new(Emulator::new(128, 64), config);
    /// display.fill_circle(64, 32, 10);
    /// assert!(display.get_pixel(64, 32));
    ///
    /// // Inverting the same disk clears it again
    /// display.set_foreground(Color::Invert);
    /// display.fill_circle(64, 32, 10);
    /// assert!(!display.get_pixel(64, 32));
    /// assert!(!display.get_pixel(64, 22));
    /// ```
    pub fn fill_circle(&mut self, x0: i32, y0: i32, r: i32) {
        if r <= 0 || self.circle_off_screen(x0, y0, r) {
            return;
        }

        // Half height of the span in each screen column, -1 = not covered
        let mut spans = [-1i32; MAX_COLUMNS as usize];
        let width = self.width();
        let mut cover = |dx: i32, half: i32| {
            for col in [x0.saturating_sub(dx), x0.saturating_add(dx)] {
                if (0..width).contains(&col) {
                    let span = &mut spans[col as usize];
                    *span = (*span).max(half);
                }
            }
        };

        midpoint_octant(r, |x, y| {
            cover(x, y);
            cover(y, x);
        });

        let color = self.foreground;
        for (col, half) in spans.iter().take(width as usize).enumerate() {
            if *half >= 0 {
                self.vline(
                    col as i32,
                    y0.saturating_sub(*half),
                    y0.saturating_add(*half),
                    color,
                );
            }
        }
    }

    fn circle_off_screen(&self, x0: i32, y0: i32, r: i32) -> bool {
        x0.saturating_add(r) < 0
            || y0.saturating_add(r) < 0
            || x0.saturating_sub(r) >= self.width()
            || y0.saturating_sub(r) >= self.height()
    }

    // Triangles

    /// Draw a triangle outline
    pub fn draw_triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        self.draw_line(x1, y1, x2, y2);
        self.draw_line(x2, y2, x3, y3);
        self.draw_line(x3, y3, x1, y1);
    }

    /// Fill a triangle in the foreground color
    pub fn fill_triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        let color = self.foreground;
        self.scan_triangle([(x1, y1), (x2, y2), (x3, y3)], |display, ax, y, bx| {
            display.hline(ax, y, bx, color);
        });
    }

    /// Fill a triangle with a dithered intensity (0..=255)
    pub fn fill_dithered_triangle(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        intensity: i32,
    ) {
        self.scan_triangle([(x1, y1), (x2, y2), (x3, y3)], |display, ax, y, bx| {
            display.draw_dithered_horizontal_line(ax, y, bx, intensity);
        });
    }

    /// Scan-convert a triangle into horizontal spans
    ///
    /// Vertices are sorted by y; each row interpolates the long edge and the
    /// current short edge. Spans are clamped against the previous row so thin
    /// slivers leave no gaps.
    fn scan_triangle(
        &mut self,
        mut v: [(i32, i32); 3],
        mut span: impl FnMut(&mut Self, i32, i32, i32),
    ) {
        v.sort_by_key(|p| p.1);
        let [(x1, y1), (x2, y2), (x3, y3)] = v.map(|(x, y)| (i64::from(x), i64::from(y)));

        let total_height = (y3 - y1) + 1;
        let mut last_min = -1i64;
        let mut last_max = i64::from(self.width());
        let start = (-y1).max(0);

        for i in start..total_height {
            let second_half = i > y2 - y1 || y2 == y1;
            let segment_height = if second_half { y3 - y2 } else { y2 - y1 };
            if segment_height < 1 {
                continue;
            }

            let alpha = i as f64 / total_height as f64;
            let beta = (i - if second_half { y2 - y1 } else { 0 }) as f64 / segment_height as f64;
            let mut ax = x1 + ((x3 - x1) as f64 * alpha) as i64;
            let mut bx = if second_half {
                x2 + ((x3 - x2) as f64 * beta) as i64
            } else {
                x1 + ((x2 - x1) as f64 * beta) as i64
            };
            if ax > bx {
                core::mem::swap(&mut ax, &mut bx);
            }

            ax = ax.min(last_max);
            bx = bx.max(last_min);

            let row = y1 + i;
            span(self, clamp_i32(ax), clamp_i32(row), clamp_i32(bx));
            if row >= i64::from(self.height()) {
                break;
            }

            last_min = ax;
            last_max = bx;
        }
    }

    // Dithering and patterns

    /// Select unordered (pseudo-random) or ordered (Bayer) dithering
    pub fn enable_unordered_dithering(&mut self, enable: bool) {
        self.dithering = if enable {
            Dithering::Unordered
        } else {
            Dithering::Ordered
        };
    }

    /// Whether pixel `(x, y)` is lit at `intensity` with the current dithering
    pub fn get_dithered_color(&self, x: i32, y: i32, intensity: i32) -> bool {
        dithered(self.dithering, x, y, intensity)
    }

    /// Draw a horizontal line with a dithered intensity (0..=255)
    ///
    /// Pixels are set or cleared regardless of the foreground color.
    pub fn draw_dithered_horizontal_line(&mut self, x: i32, y: i32, x2: i32, intensity: i32) {
        let Some((left, right)) = self.clip_row(x, y, x2) else {
            return;
        };
        let mode = self.dithering;
        let page = y as usize / 8;
        let mask = 1u8 << (y & 7);
        let fb = self.fb();
        for col in left..=right {
            let color = Color::from(dithered(mode, col, y, intensity));
            if let Some(byte) = fb.byte_mut(col as usize, page) {
                color.apply(byte, mask);
            }
        }
        fb.mark_row(left, right, y);
    }

    /// Draw a horizontal line with a repeating 32-bit pattern, MSB first
    ///
    /// The pattern starts at the left end of the line. All-zero draws
    /// nothing, all-ones draws a plain line in the foreground color.
    pub fn draw_pattern_horizontal_line(&mut self, x: i32, y: i32, x2: i32, pattern: u32) {
        if pattern == 0 {
            return;
        }
        if pattern == u32::MAX {
            self.draw_horizontal_line(x, y, x2);
            return;
        }
        let Some((left, right)) = self.clip_row(x, y, x2) else {
            return;
        };
        let origin = x.min(x2);
        let page = y as usize / 8;
        let mask = 1u8 << (y & 7);
        let fb = self.fb();
        for col in left..=right {
            let bit = (col - origin).rem_euclid(32) as u32;
            let color = Color::from(pattern & (1 << (31 - bit)) != 0);
            if let Some(byte) = fb.byte_mut(col as usize, page) {
                color.apply(byte, mask);
            }
        }
        fb.mark_row(left, right, y);
    }

    /// Fill a rectangle with a dithered intensity (0..=255)
    pub fn fill_dithered_rectangle(&mut self, x: i32, y: i32, x2: i32, y2: i32, intensity: i32) {
        let rect = Rect::new(x, y, x2, y2);
        let top = rect.top.max(0);
        let bottom = rect.bottom.min(self.height() - 1);
        for row in top..=bottom {
            self.draw_dithered_horizontal_line(rect.left, row, rect.right, intensity);
        }
    }

    // Text

    /// Current font
    pub fn font(&self) -> Option<&'static Font> {
        self.font
    }

    /// Select a font, returning the previous one
    pub fn set_font(&mut self, font: &'static Font) -> Option<&'static Font> {
        self.font.replace(font)
    }

    /// Select a built-in font by index; unknown indices keep the current font
    pub fn set_builtin_font(&mut self, index: usize) -> Option<&'static Font> {
        match font::builtin(index) {
            Some(font) => self.set_font(font),
            None => self.font,
        }
    }

    /// Draw one character with its top-left corner at `(x, y)`
    ///
    /// Returns the character width. Characters missing from the font are
    /// drawn as a space.
    pub fn draw_char(&mut self, x: i32, y: i32, c: char) -> i32 {
        let Some(font) = self.font else {
            return 0;
        };
        let Some(glyph) = font.glyph(c) else {
            return 0;
        };
        let (fg, bg) = (self.foreground, self.background);
        let bg = match bg {
            Color::Black | Color::White => Some(bg),
            Color::Invert | Color::Transparent => None,
        };

        let fb = self.fb();
        for j in 0..glyph.height {
            for i in 0..glyph.width {
                let (px, py) = (x.saturating_add(i32::from(i)), y.saturating_add(i32::from(j)));
                if glyph.pixel(i, j) {
                    if fg.is_opaque() {
                        fb.write_pixel(px, py, fg);
                    }
                } else if let Some(bg) = bg {
                    fb.write_pixel(px, py, bg);
                }
            }
        }
        i32::from(glyph.width)
    }

    /// Draw a string, returning its width
    ///
    /// Characters are separated by the font's gap; no gap follows the last one.
    /// Characters outside the font's range are drawn as spaces. The returned
    /// width matches [`measure_string`](Self::measure_string).
    ///
    /// # Example
    ///
    /// ```
    /// # use ssd1306_gfx::{Builder, Display, Emulator, PanelType};
    /// # let Ok(config) = Builder::new().panel(PanelType::Ssd1306_128x64).build() else { return };
    /// let mut display = Display::new(Emulator::new(128, 64), config);
    /// let width = display.draw_string(0, 0, "Hi!");
    /// assert_eq!(width, display.measure_string("Hi!"));
    /// // Three 5 pixel glyphs and two 1 pixel gaps
    /// assert_eq!(width, 17);
    /// ```
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str) -> i32 {
        let Some(font) = self.font else {
            return 0;
        };
        let mut cursor = x;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            cursor = cursor.saturating_add(self.draw_char(cursor, y, c));
            if chars.peek().is_some() {
                cursor = cursor.saturating_add(i32::from(font.gap));
            }
        }
        cursor.saturating_sub(x)
    }

    /// Width `text` would take when drawn with the current font
    pub fn measure_string(&self, text: &str) -> i32 {
        self.font.map_or(0, |font| font.measure(text))
    }

    // Bitmaps

    /// Blit a bitmap with its top-left corner at `(x, y)`
    ///
    /// `src_rect` selects a sub-rectangle of the bitmap (the whole bitmap when
    /// `None`); it must lie inside the bitmap. Set bits are drawn in the
    /// foreground color and cleared bits in the background color. With
    /// `enable_alpha` and an alpha plane, pixels whose alpha bit is clear are
    /// skipped. Only the visible destination rectangle is marked dirty.
    ///
    /// # Example
    ///
    /// ```
    /// # use ssd1306_gfx::{Bitmap, Rect};
    /// # use ssd1306_gfx::{Builder, Display, Emulator, PanelType};
    /// # let Ok(config) = Builder::new().panel(PanelType::Ssd1306_128x64).build() else { return };
    /// let mut display = Display::new(Emulator::new(128, 64), config);
    /// // 8x2, rows are MSB first: a full row over a hollow one
    /// let bitmap = Bitmap::new(8, 2, &[0xFF, 0x81]);
    /// display.draw_bitmap(&bitmap, None, 10, 10, false);
    /// assert!(display.get_pixel(13, 10));
    /// assert!(!display.get_pixel(13, 11));
    ///
    /// // Only the right half, placed at the origin
    /// display.draw_bitmap(&bitmap, Some(Rect::new(4, 0, 7, 1)), 0, 0, false);
    /// assert!(display.get_pixel(3, 1));
    /// assert!(!display.get_pixel(0, 1));
    /// ```
    pub fn draw_bitmap(
        &mut self,
        bitmap: &Bitmap<'_>,
        src_rect: Option<Rect>,
        x: i32,
        y: i32,
        enable_alpha: bool,
    ) {
        let bounds = bitmap.bounds();
        let src = src_rect.unwrap_or(bounds);
        if src.is_empty() || src.intersect(&bounds) != src {
            return;
        }

        let dest = Rect::with_size(x, y, src.width() as u16, src.height() as u16);
        let visible = dest.intersect(&self.screen());
        if visible.is_empty() {
            return;
        }

        let enable_alpha = enable_alpha && bitmap.has_alpha();
        let (fg, bg) = (self.foreground, self.background);
        let fb = self.fb();
        for dy in visible.top..=visible.bottom {
            let sy = (src.top + dy - dest.top) as u16;
            for dx in visible.left..=visible.right {
                let sx = (src.left + dx - dest.left) as u16;
                if enable_alpha && !bitmap.alpha(sx, sy) {
                    continue;
                }
                let color = if bitmap.pixel(sx, sy) { fg } else { bg };
                apply_pixel(fb, dx, dy, color);
            }
        }
        fb.mark_region(visible.left, visible.right, visible.top, visible.bottom);
    }

    /// Blit `src_rect` of a bitmap scaled into `dest_rect` (nearest neighbour)
    pub fn draw_stretch_bitmap(
        &mut self,
        bitmap: &Bitmap<'_>,
        src_rect: Rect,
        dest_rect: Rect,
        enable_alpha: bool,
    ) {
        if src_rect.is_empty() || dest_rect.is_empty() {
            return;
        }
        let visible = dest_rect.intersect(&self.screen());
        if visible.is_empty() {
            return;
        }

        let (src_w, src_h) = (i64::from(src_rect.width()), i64::from(src_rect.height()));
        let (dest_w, dest_h) = (i64::from(dest_rect.width()), i64::from(dest_rect.height()));
        let enable_alpha = enable_alpha && bitmap.has_alpha();
        let (fg, bg) = (self.foreground, self.background);
        let (bitmap_w, bitmap_h) = (i64::from(bitmap.width()), i64::from(bitmap.height()));

        let fb = self.fb();
        for dy in visible.top..=visible.bottom {
            let sy = i64::from(src_rect.top) + i64::from(dy - dest_rect.top) * src_h / dest_h;
            if !(0..bitmap_h).contains(&sy) {
                continue;
            }
            for dx in visible.left..=visible.right {
                let sx = i64::from(src_rect.left) + i64::from(dx - dest_rect.left) * src_w / dest_w;
                if !(0..bitmap_w).contains(&sx) {
                    continue;
                }
                let (sx, sy) = (sx as u16, sy as u16);
                if enable_alpha && !bitmap.alpha(sx, sy) {
                    continue;
                }
                let color = if bitmap.pixel(sx, sy) { fg } else { bg };
                apply_pixel(fb, dx, dy, color);
            }
        }
        fb.mark_region(visible.left, visible.right, visible.top, visible.bottom);
    }

    fn screen(&self) -> Rect {
        Rect::new(0, 0, self.width() - 1, self.height() - 1)
    }

    // Scrolling

    /// See [`Device::start_horizontal_scrolling`]
    pub fn start_horizontal_scrolling(
        &mut self,
        start_page: u8,
        end_page: u8,
        direction: ScrollDirection,
        interval: ScrollInterval,
    ) -> DeviceResult<T> {
        self.device
            .start_horizontal_scrolling(start_page, end_page, direction, interval)
    }

    /// See [`Device::start_diagonal_scrolling`]
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
        self.device.start_diagonal_scrolling(
            start_page,
            end_page,
            start_row,
            end_row,
            direction,
            interval,
            vertical_offset,
        )
    }

    /// Stop hardware scrolling
    pub fn stop_scrolling(&mut self) -> DeviceResult<T> {
        self.device.stop_scrolling()
    }

    // Updates

    /// Request that the panel shows the buffer
    ///
    /// With deferred updates the request is recorded for the next
    /// [`refresh`](Self::refresh); a pending forced request is never
    /// downgraded. Otherwise the panel is refreshed immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`](crate::Error::Interface) if an immediate
    /// refresh fails. Deferred requests never fail.
    ///
    /// # Example
    ///
    /// ```
    /// # use ssd1306_gfx::UpdateState;
    /// # use ssd1306_gfx::{Builder, Display, Emulator, PanelType};
    /// # let Ok(config) = Builder::new().panel(PanelType::Ssd1306_128x64).build() else { return };
    /// let mut display = Display::new(Emulator::new(128, 64), config);
    /// # if display.init().is_err() { return; }
    /// display.set_deferred_update(true);
    /// display.draw_pixel(5, 5);
    /// # if display.update(true).is_err() { return; }
    /// # if display.update(false).is_err() { return; }
    /// assert_eq!(display.update_state(), UpdateState::Forced);
    /// assert!(!display.device().transport().get_pixel(5, 5));
    ///
    /// # if display.refresh().is_err() { return; }
    /// assert_eq!(display.update_state(), UpdateState::Idle);
    /// assert!(display.device().transport().get_pixel(5, 5));
    /// ```
    pub fn update(&mut self, force: bool) -> DeviceResult<T> {
        if self.deferred_updates {
            let wanted = if force {
                UpdateState::Forced
            } else {
                UpdateState::Needed
            };
            self.update_state = self.update_state.max(wanted);
            Ok(())
        } else {
            self.update_state = UpdateState::Idle;
            self.device.refresh(force)
        }
    }

    /// Send a pending deferred update, if any
    ///
    /// A frame loop calls this once per frame so that any number of
    /// [`update`](Self::update) calls cost a single transfer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`](crate::Error::Interface) if a transfer
    /// fails; the pending request is dropped either way.
    pub fn refresh(&mut self) -> DeviceResult<T> {
        let state = core::mem::take(&mut self.update_state);
        match state {
            UpdateState::Idle => Ok(()),
            UpdateState::Needed => self.device.refresh(false),
            UpdateState::Forced => self.device.refresh(true),
        }
    }

    /// Pending deferred update
    pub fn update_state(&self) -> UpdateState {
        self.update_state
    }

    /// Enable or disable dirty tracking
    pub fn set_partial_update(&mut self, enable: bool) {
        self.device.set_partial_updates(enable);
    }

    /// Whether dirty tracking is enabled
    pub fn partial_update(&self) -> bool {
        self.device.partial_updates()
    }

    /// Enable or disable deferred updates
    pub fn set_deferred_update(&mut self, deferred: bool) {
        self.deferred_updates = deferred;
    }

    /// Whether deferred updates are enabled
    pub fn deferred_update(&self) -> bool {
        self.deferred_updates
    }

    /// Include or exclude a page from non-forced refreshes
    pub fn lock_page(&mut self, page: usize, lock: bool) {
        self.device.lock_page(page, lock);
    }

    /// Run `f` with raw access to the pixel bytes; marks everything dirty
    pub fn with_buffer<R>(&mut self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        self.device.with_buffer(f)
    }

    /// Raw access guard; marks everything dirty when dropped
    pub fn lock_buffer(&mut self) -> BufferGuard<'_> {
        self.device.lock_buffer()
    }
}

/// Write a pixel unless `color` is transparent
#[inline]
fn apply_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: Color) {
    if !color.is_opaque() {
        return;
    }
    if let Some(byte) = fb.byte_mut(x as usize, y as usize / 8) {
        color.apply(byte, 1 << (y & 7));
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Walk one octant of a midpoint circle, from `(r, 0)` to the diagonal
///
/// `(r, 0)` is reported first, then every `(x, y)` with `y >= 1` and
/// `x >= y`. The error term steps by `2 * (y - x + 1)` when `x` moves.
fn midpoint_octant(r: i32, mut f: impl FnMut(i32, i32)) {
    f(r, 0);

    let mut x = i64::from(r);
    let mut y = 1i64;
    let mut err = 1 - x;
    while x >= y {
        f(x as i32, y as i32);
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, PanelType};
    use crate::interface::mock::MockTransport;
    use alloc::vec::Vec;

    fn test_display() -> Display<MockTransport> {
        let config = Builder::new()
            .panel(PanelType::Ssd1306_128x64)
            .build()
            .unwrap();
        Display::new(MockTransport::new(), config)
    }

    fn lit(display: &Display<MockTransport>) -> Vec<(i32, i32)> {
        let mut pixels = Vec::new();
        for y in 0..display.height() {
            for x in 0..display.width() {
                if display.get_pixel(x, y) {
                    pixels.push((x, y));
                }
            }
        }
        pixels
    }

    fn dirty_span(display: &Display<MockTransport>, page: usize) -> Option<(u8, u8)> {
        display.device().framebuffer().region(page).unwrap().span()
    }

    #[test]
    fn test_horizontal_line_marks_one_page() {
        let mut display = test_display();
        display.draw_horizontal_line(50, 20, 10);
        assert_eq!(lit(&display).len(), 41);
        assert_eq!(dirty_span(&display, 2), Some((10, 50)));
        assert_eq!(dirty_span(&display, 1), None);
    }

    #[test]
    fn test_horizontal_line_black_clears_only_its_row() {
        let mut display = test_display();
        display.fill_rectangle(0, 0, 127, 7);
        display.set_foreground(Color::Black);
        display.draw_horizontal_line(0, 3, 127);
        assert!(!display.get_pixel(10, 3));
        assert!(display.get_pixel(10, 2));
        assert!(display.get_pixel(10, 4));
    }

    #[test]
    fn test_horizontal_line_is_clipped() {
        let mut display = test_display();
        display.draw_horizontal_line(-20, 0, 300);
        assert_eq!(lit(&display).len(), 128);
        display.draw_horizontal_line(0, -1, 10);
        display.draw_horizontal_line(0, 64, 10);
        display.draw_horizontal_line(130, 5, 140);
        assert_eq!(lit(&display).len(), 128);
    }

    #[test]
    fn test_vertical_line_spanning_pages() {
        let mut display = test_display();
        display.draw_vertical_line(3, 5, 20);
        let pixels = lit(&display);
        assert_eq!(pixels.len(), 16);
        assert!(pixels.iter().all(|&(x, _)| x == 3));
        let bytes = display.device().framebuffer().as_bytes();
        assert_eq!(bytes[3], 0b1110_0000);
        assert_eq!(bytes[128 + 3], 0xFF);
        assert_eq!(bytes[256 + 3], 0b0001_1111);
        for page in 0..=2 {
            assert_eq!(dirty_span(&display, page), Some((3, 3)));
        }
    }

    #[test]
    fn test_vertical_line_within_one_byte() {
        let mut display = test_display();
        display.draw_vertical_line(0, 2, 4);
        assert_eq!(display.device().framebuffer().as_bytes()[0], 0b0001_1100);
    }

    #[test]
    fn test_vertical_line_clipped_at_top() {
        let mut display = test_display();
        display.draw_vertical_line(7, -10, 2);
        assert_eq!(lit(&display).len(), 3);
    }

    #[test]
    fn test_vertical_line_invert_twice_restores() {
        let mut display = test_display();
        display.draw_vertical_line(9, 0, 40);
        display.set_foreground(Color::Invert);
        display.draw_vertical_line(9, 3, 60);
        display.draw_vertical_line(9, 3, 60);
        assert_eq!(lit(&display).len(), 41);
    }

    #[test]
    fn test_degenerate_line_is_one_pixel() {
        let mut display = test_display();
        display.draw_line(12, 34, 12, 34);
        assert_eq!(lit(&display), alloc::vec![(12, 34)]);
    }

    #[test]
    fn test_diagonal_line() {
        let mut display = test_display();
        display.draw_line(0, 0, 7, 7);
        let pixels = lit(&display);
        assert_eq!(pixels.len(), 8);
        assert!(pixels.iter().all(|&(x, y)| x == y));
    }

    #[test]
    fn test_steep_line_is_connected_and_reversible() {
        let mut forward = test_display();
        forward.draw_line(10, 0, 14, 40);
        let mut rows: Vec<i32> = lit(&forward).iter().map(|&(_, y)| y).collect();
        rows.dedup();
        assert_eq!(rows.len(), 41);

        let mut backward = test_display();
        backward.draw_line(14, 40, 10, 0);
        assert_eq!(lit(&backward).len(), 41);
    }

    #[test]
    fn test_line_partially_off_screen_is_clipped() {
        let mut display = test_display();
        display.draw_line(-10, -10, 200, 50);
        assert!(!lit(&display).is_empty());
        assert!(lit(&display).iter().all(|&(x, y)| (0..128).contains(&x) && (0..64).contains(&y)));
    }

    #[test]
    fn test_rectangle_outline_pixel_count() {
        let mut display = test_display();
        display.draw_rectangle(10, 10, 19, 14);
        assert_eq!(lit(&display).len(), 2 * 10 + 2 * 3);
    }

    #[test]
    fn test_inverted_rectangle_toggles_corners_once() {
        let mut display = test_display();
        display.set_foreground(Color::Invert);
        display.draw_rectangle(10, 10, 19, 14);
        assert!(display.get_pixel(10, 10));
        assert!(display.get_pixel(19, 14));
        assert_eq!(lit(&display).len(), 26);
    }

    #[test]
    fn test_fill_rectangle_normalizes_corners() {
        let mut display = test_display();
        display.fill_rectangle(20, 20, 10, 10);
        assert_eq!(lit(&display).len(), 11 * 11);
    }

    #[test]
    fn test_circle_radius_zero_draws_nothing() {
        let mut display = test_display();
        display.draw_circle(64, 32, 0);
        display.fill_circle(64, 32, 0);
        assert!(lit(&display).is_empty());
        assert!(!display.device().framebuffer().is_dirty());
    }

    #[test]
    fn test_circle_is_symmetric() {
        let mut display = test_display();
        display.draw_circle(64, 32, 10);
        for (x, y) in lit(&display) {
            assert!(display.get_pixel(128 - x, y));
            assert!(display.get_pixel(x, 64 - y));
        }
        assert!(display.get_pixel(54, 32));
        assert!(display.get_pixel(64, 22));
        assert!(!display.get_pixel(64, 32));
    }

    #[test]
    fn test_circle_outline_radius_seven() {
        let mut display = test_display();
        display.draw_circle(64, 32, 7);
        // Octant (7,0) (7,1) (7,2) (7,3) (6,4) (5,5), mirrored
        assert_eq!(lit(&display).len(), 44);
        assert!(display.get_pixel(71, 35));
        assert!(display.get_pixel(70, 36));
        assert!(display.get_pixel(69, 37));
        assert!(display.get_pixel(61, 25));
        assert!(!display.get_pixel(70, 35));
    }

    #[test]
    fn test_inverted_circle_outline_matches_white() {
        let mut white = test_display();
        white.draw_circle(60, 30, 13);
        let mut invert = test_display();
        invert.set_foreground(Color::Invert);
        invert.draw_circle(60, 30, 13);
        assert_eq!(lit(&white), lit(&invert));
    }

    #[test]
    fn test_fill_circle_invert_toggles_every_pixel_once() {
        for r in 1..=30 {
            let mut white = test_display();
            white.fill_circle(64, 32, r);
            let disk = lit(&white);

            // From black: toggled once means lit exactly where the disk is
            let mut invert = test_display();
            invert.set_foreground(Color::Invert);
            invert.fill_circle(64, 32, r);
            assert_eq!(lit(&invert), disk, "radius {r}");

            // From white: toggled once means the disk is cleared, the rest kept
            let mut full = test_display();
            full.fill_rectangle(0, 0, 127, 63);
            full.set_foreground(Color::Invert);
            full.fill_circle(64, 32, r);
            for &(x, y) in &disk {
                assert!(!full.get_pixel(x, y), "radius {r} at ({x}, {y})");
            }
            assert_eq!(lit(&full).len(), 128 * 64 - disk.len());
        }
    }

    #[test]
    fn test_fill_circle_covers_outline() {
        let mut outline = test_display();
        outline.draw_circle(40, 30, 12);
        let mut filled = test_display();
        filled.fill_circle(40, 30, 12);
        for (x, y) in lit(&outline) {
            assert!(filled.get_pixel(x, y));
        }
    }

    #[test]
    fn test_fill_circle_off_screen_marks_nothing() {
        let mut display = test_display();
        display.fill_circle(-50, -50, 10);
        display.fill_circle(500, 32, 100);
        assert!(lit(&display).is_empty());
        assert!(!display.device().framebuffer().is_dirty());
    }

    #[test]
    fn test_fill_triangle_contains_vertices_rows() {
        let mut display = test_display();
        display.fill_triangle(10, 10, 40, 10, 10, 40);
        assert!(display.get_pixel(10, 10));
        assert!(display.get_pixel(20, 20));
        assert!(!display.get_pixel(39, 39));
        for y in 10..=40 {
            assert!(display.get_pixel(10, y), "row {y}");
        }
    }

    #[test]
    fn test_fill_triangle_extreme_vertices() {
        let mut display = test_display();
        display.fill_triangle(0, i32::MIN, 127, i32::MAX, 0, i32::MAX);
        assert!(display.get_pixel(0, 0));
        assert!(display.get_pixel(60, 0));
        assert!(!display.get_pixel(100, 0));
        assert!(display.get_pixel(0, 63));
    }

    #[test]
    fn test_fill_triangle_flat_bottom_and_clipping() {
        let mut display = test_display();
        display.fill_triangle(64, -20, 0, 100, 127, 100);
        assert!(display.get_pixel(64, 0));
        assert!(display.get_pixel(64, 63));
        assert!(display.get_pixel(25, 63));
        assert!(display.get_pixel(100, 63));
        assert!(!display.get_pixel(5, 63));
    }

    #[test]
    fn test_dithered_rectangle_half_intensity() {
        let mut display = test_display();
        display.fill_dithered_rectangle(0, 0, 3, 3, 128);
        assert_eq!(lit(&display).len(), 9);
        assert_eq!(dirty_span(&display, 0), Some((0, 3)));
    }

    #[test]
    fn test_dithered_line_ignores_foreground() {
        let mut display = test_display();
        display.set_foreground(Color::Transparent);
        display.draw_dithered_horizontal_line(0, 0, 15, 255);
        assert_eq!(lit(&display).len(), 16);
        display.draw_dithered_horizontal_line(0, 0, 15, 0);
        assert!(lit(&display).is_empty());
    }

    #[test]
    fn test_unordered_dithering_switch() {
        let mut display = test_display();
        assert!(display.get_dithered_color(0, 0, 1));
        display.enable_unordered_dithering(true);
        assert!(!display.get_dithered_color(0, 0, 1));
    }

    #[test]
    fn test_pattern_line() {
        let mut display = test_display();
        display.draw_pattern_horizontal_line(0, 0, 63, 0xF000_000F);
        let pixels: Vec<i32> = lit(&display).iter().map(|&(x, _)| x).collect();
        assert_eq!(
            pixels,
            alloc::vec![0, 1, 2, 3, 28, 29, 30, 31, 32, 33, 34, 35, 60, 61, 62, 63]
        );
    }

    #[test]
    fn test_pattern_line_extremes() {
        let mut display = test_display();
        display.draw_pattern_horizontal_line(0, 0, 10, 0);
        assert!(!display.device().framebuffer().is_dirty());
        display.draw_pattern_horizontal_line(0, 0, 10, u32::MAX);
        assert_eq!(lit(&display).len(), 11);
    }

    #[test]
    fn test_draw_string_advance_and_measure() {
        let mut display = test_display();
        let width = display.draw_string(0, 0, "AB");
        assert_eq!(width, 11);
        assert_eq!(display.measure_string("AB"), 11);
        assert_eq!(display.draw_string(0, 10, ""), 0);
    }

    #[test]
    fn test_draw_char_background_policy() {
        let mut display = test_display();
        display.fill_rectangle(0, 0, 10, 10);
        display.set_background(Color::Transparent);
        display.draw_char(0, 0, ' ');
        assert_eq!(lit(&display).len(), 121);

        display.set_background(Color::Black);
        display.draw_char(0, 0, ' ');
        assert!(!display.get_pixel(0, 0));
        assert!(!display.get_pixel(4, 6));
        assert!(display.get_pixel(5, 0));
    }

    #[test]
    fn test_long_string_measure_matches_advance() {
        let mut display = test_display();
        let text = "A".repeat(11_000);
        let width = display.measure_string(&text);
        assert_eq!(width, 11_000 * 6 - 1);
        assert_eq!(display.draw_string(0, 0, &text), width);
    }

    #[test]
    fn test_unknown_char_draws_space_width() {
        let mut display = test_display();
        assert_eq!(display.draw_char(0, 0, '\u{263A}'), 5);
        assert!(lit(&display).is_empty());
    }

    #[test]
    fn test_set_builtin_font_out_of_range_keeps_font() {
        let mut display = test_display();
        let current = display.font();
        assert!(current.is_some());
        let _ = display.set_builtin_font(42);
        assert!(core::ptr::eq(display.font().unwrap(), current.unwrap()));
    }

    #[test]
    fn test_bitmap_off_screen_writes_and_marks_nothing() {
        let data = [0xFF; 8];
        let bitmap = Bitmap::new(8, 8, &data);
        let mut display = test_display();
        display.draw_bitmap(&bitmap, None, 200, 0, false);
        display.draw_bitmap(&bitmap, None, -8, 0, false);
        display.draw_bitmap(&bitmap, None, 0, 64, false);
        assert!(lit(&display).is_empty());
        assert!(!display.device().framebuffer().is_dirty());
    }

    #[test]
    fn test_bitmap_partially_visible_marks_visible_part() {
        let data = [0xFF; 8];
        let bitmap = Bitmap::new(8, 8, &data);
        let mut display = test_display();
        display.draw_bitmap(&bitmap, None, 124, -4, false);
        assert_eq!(lit(&display).len(), 4 * 4);
        assert_eq!(dirty_span(&display, 0), Some((124, 127)));
        assert_eq!(dirty_span(&display, 1), None);
    }

    #[test]
    fn test_bitmap_alpha_gates_writes() {
        // 8x1, pixels 1111_0000, alpha 1100_1100
        let data = [0xF0, 0xCC];
        let bitmap = Bitmap::with_alpha(8, 1, &data);
        let mut display = test_display();
        display.fill_rectangle(0, 0, 7, 0);
        display.draw_bitmap(&bitmap, None, 0, 0, true);
        let row: Vec<bool> = (0..8).map(|x| display.get_pixel(x, 0)).collect();
        assert_eq!(
            row,
            [true, true, true, true, false, false, true, true]
        );

        display.draw_bitmap(&bitmap, None, 0, 0, false);
        let row: Vec<bool> = (0..8).map(|x| display.get_pixel(x, 0)).collect();
        assert_eq!(row, [true, true, true, true, false, false, false, false]);
    }

    #[test]
    fn test_bitmap_source_rect() {
        let mut bitmap = Bitmap::owned(16, 16, false);
        bitmap.set_pixel(5, 6, true);
        let mut display = test_display();
        display.set_background(Color::Transparent);
        display.draw_bitmap(&bitmap, Some(Rect::new(4, 4, 7, 7)), 20, 30, false);
        assert_eq!(lit(&display), alloc::vec![(21, 32)]);

        display.draw_bitmap(&bitmap, Some(Rect::new(4, 4, 20, 7)), 20, 30, false);
        assert_eq!(lit(&display).len(), 1);
    }

    #[test]
    fn test_stretch_bitmap_doubles() {
        let data = [0b1000_0000, 0b0000_0000];
        let bitmap = Bitmap::new(2, 2, &data);
        let mut display = test_display();
        display.draw_stretch_bitmap(&bitmap, bitmap.bounds(), Rect::new(10, 10, 13, 13), false);
        assert_eq!(lit(&display), alloc::vec![(10, 10), (11, 10), (10, 11), (11, 11)]);
        assert_eq!(dirty_span(&display, 1), Some((10, 13)));
    }

    #[test]
    fn test_deferred_update_waits_for_refresh() {
        let mut display = test_display();
        display.device_mut().init().unwrap();
        display.device_mut().transport_mut().clear();
        display.set_deferred_update(true);

        display.draw_pixel(0, 0);
        display.update(true).unwrap();
        display.update(false).unwrap();
        assert_eq!(display.update_state(), UpdateState::Forced);
        assert!(display.device().transport().transfers.is_empty());

        display.refresh().unwrap();
        assert_eq!(display.update_state(), UpdateState::Idle);
        assert_eq!(display.device().transport().data_bytes().len(), 1024);

        display.device_mut().transport_mut().clear();
        display.refresh().unwrap();
        assert!(display.device().transport().transfers.is_empty());
    }

    #[test]
    fn test_immediate_update() {
        let mut display = test_display();
        display.init().unwrap();
        display.device_mut().transport_mut().clear();
        display.draw_pixel(5, 5);
        display.update(false).unwrap();
        assert_eq!(display.device().transport().data_bytes(), alloc::vec![0b0010_0000]);
    }
}
