//! Scrolling signal trace
//!
//! [`Oscilloscope`] keeps the most recent samples in a ring and draws them as
//! a connected trace, newest on the right, scaled so the lowest sample seen
//! since the last [`clear`](Oscilloscope::clear) sits on the bottom row of
//! the area and the highest on the top row. A baseline marks zero (clamped to
//! the seen range), and an optional `DATA: n` label shows the latest value.
//!
//! ```
//! use ssd1306_gfx::oscilloscope::Oscilloscope;
//! use ssd1306_gfx::{Builder, Display, Emulator, PanelType};
//!
//! let config = match Builder::new().panel(PanelType::Ssd1306_128x64).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let mut display = Display::new(Emulator::new(128, 64), config);
//!
//! let mut scope = Oscilloscope::new();
//! for i in 0..200 {
//!     scope.add((i * 7) % 50);
//! }
//! assert_eq!(scope.len(), 128);
//!
//! display.clear();
//! scope.draw_in(&mut display, 0, 16, 127, 63, Some((0, 0)));
//! ```

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use log::debug;

use crate::bitmap::Rect;
use crate::display::Display;
use crate::interface::Transport;

/// Samples kept by [`Oscilloscope::new`], one per column of a 128 wide panel
pub const DEFAULT_CAPACITY: usize = 128;

/// Ring of samples with running extremes
#[derive(Clone, Debug)]
pub struct Oscilloscope {
    samples: Vec<i32>,
    /// Slot the next sample goes to
    write: usize,
    len: usize,
    value: i32,
    min: i32,
    max: i32,
}

impl Default for Oscilloscope {
    fn default() -> Self {
        Self::new()
    }
}

impl Oscilloscope {
    /// Oscilloscope holding [`DEFAULT_CAPACITY`] samples
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Oscilloscope holding `capacity` samples (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        debug!("oscilloscope with {} samples", capacity);
        Self {
            samples: vec![0; capacity],
            write: 0,
            len: 0,
            value: 0,
            min: 0,
            max: 0,
        }
    }

    /// Forget all samples and extremes
    pub fn clear(&mut self) {
        self.samples.fill(0);
        self.write = 0;
        self.len = 0;
        self.value = 0;
        self.min = 0;
        self.max = 0;
    }

    /// Record a sample, overwriting the oldest once the ring is full
    pub fn add(&mut self, value: i32) {
        if self.len == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.value = value;

        self.samples[self.write] = value;
        self.write = (self.write + 1) % self.samples.len();
        self.len = (self.len + 1).min(self.samples.len());
    }

    /// Latest sample, 0 before the first one
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Smallest sample since the last clear
    ///
    /// Samples that have rotated out of the ring still count.
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Largest sample since the last clear
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no sample has been added since the last clear
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of samples held
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Held samples, newest first
    pub fn samples(&self) -> impl Iterator<Item = i32> + '_ {
        let capacity = self.samples.len();
        (0..self.len).map(move |age| self.samples[(self.write + capacity - 1 - age) % capacity])
    }

    /// Draw over the whole screen with the label in the top-left corner
    pub fn draw<T>(&self, display: &mut Display<T>)
    where
        T: Transport,
    {
        let (right, bottom) = (display.width() - 1, display.height() - 1);
        self.draw_in(display, 0, 0, right, bottom, Some((0, 0)));
    }

    /// Draw the trace inside the rectangle `(x1, y1)`-`(x2, y2)`
    ///
    /// The newest sample lands in the rightmost column and older ones step
    /// left one column each, as many as fit. `label` places the `DATA: n`
    /// text, drawn with the display's current font and colors.
    pub fn draw_in<T>(
        &self,
        display: &mut Display<T>,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        label: Option<(i32, i32)>,
    ) where
        T: Transport,
    {
        if let Some((x, y)) = label {
            display.draw_string(x, y, &format!("DATA: {}", self.value));
        }
        if self.is_empty() {
            return;
        }

        let area = Rect::new(x1, y1, x2, y2);
        let columns = (area.width() as usize).min(self.samples.len());
        let baseline = self.row(&area, 0i32.clamp(self.min, self.max));
        display.draw_horizontal_line(area.left, baseline, area.right);

        let mut previous: Option<(i32, i32)> = None;
        for (age, sample) in self.samples().take(columns).enumerate() {
            let x = area.right.saturating_sub(age as i32);
            let y = self.row(&area, sample);
            match previous {
                Some((px, py)) => display.draw_line(px, py, x, y),
                None => display.draw_pixel(x, y),
            }
            previous = Some((x, y));
        }
    }

    /// Screen row of `value` inside `area`, top row for the maximum
    fn row(&self, area: &Rect, value: i32) -> i32 {
        let range = i64::from(self.max) - i64::from(self.min);
        if range <= 0 {
            return area.top;
        }
        let span = i64::from(area.height()) - 1;
        let offset = (i64::from(value) - i64::from(self.min)) * span / range;
        (i64::from(area.top) + span - offset) as i32
    }
}
