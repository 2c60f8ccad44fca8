//! Frame loop harness
//!
//! An [`Application`] draws one frame per [`Application::update`] call. The
//! [`Runner`] owns the [`Display`], initializes the panel, derives the frame
//! period from the panel refresh rate and, once the application is set up,
//! switches the display to deferred updates so that each frame reaches the
//! panel in a single [`Display::refresh`].
//!
//! ## Example
//!
//! ```
//! use embedded_hal::delay::DelayNs;
//! use ssd1306_gfx::app::{Application, Frame, Runner};
//! use ssd1306_gfx::{Builder, Display, DeviceResult, Emulator, PanelType};
//!
//! struct Bounce {
//!     x: i32,
//! }
//!
//! impl Application<Emulator> for Bounce {
//!     fn update(&mut self, display: &mut Display<Emulator>, _frame: &Frame) -> DeviceResult<Emulator> {
//!         display.clear();
//!         display.fill_circle(self.x, 32, 4);
//!         self.x = (self.x + 1) % 128;
//!         display.update(false)
//!     }
//!
//!     fn is_running(&self) -> bool {
//!         self.x < 10
//!     }
//! }
//!
//! # struct NoDelay;
//! # impl DelayNs for NoDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! let config = match Builder::new().panel(PanelType::Ssd1306_128x64).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let display = Display::new(Emulator::new(128, 64), config);
//! let mut runner = Runner::new(display, Bounce { x: 0 });
//! if runner.run(&mut NoDelay).is_err() {
//!     return;
//! }
//! assert_eq!(runner.frame().counter, 10);
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::device::DeviceResult;
use crate::display::Display;
use crate::interface::Transport;

/// Frame period used when the panel reports no refresh rate
pub const DEFAULT_PERIOD_MS: u32 = 10;

/// Timing of the frame being drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Frames completed before this one
    pub counter: u32,
    /// Milliseconds since the runner started
    pub time_ms: u64,
    /// Milliseconds since the previous frame
    pub delta_ms: u32,
}

impl Frame {
    /// Seconds since the previous frame
    pub fn delta(&self) -> f32 {
        self.delta_ms as f32 / 1000.0
    }

    /// Seconds since the runner started
    pub fn time(&self) -> f32 {
        self.time_ms as f32 / 1000.0
    }
}

/// Per-frame drawing callbacks
pub trait Application<T>
where
    T: Transport,
{
    /// Called once after the panel is initialized, before the first frame
    ///
    /// Updates requested here are sent immediately.
    fn init(&mut self, display: &mut Display<T>) -> DeviceResult<T> {
        let _ = display;
        Ok(())
    }

    /// Draw one frame
    fn update(&mut self, display: &mut Display<T>, frame: &Frame) -> DeviceResult<T>;

    /// Whether the loop should continue; checked before every frame
    fn is_running(&self) -> bool {
        true
    }
}

/// Drives an [`Application`] at the panel refresh rate
pub struct Runner<T, A>
where
    T: Transport,
    A: Application<T>,
{
    display: Display<T>,
    app: A,
    period_ms: u32,
    frame: Frame,
    last_time_ms: u64,
    started: bool,
}

impl<T, A> Runner<T, A>
where
    T: Transport,
    A: Application<T>,
{
    /// Create a runner; nothing is sent until [`start`](Self::start)
    pub fn new(display: Display<T>, app: A) -> Self {
        Self {
            display,
            app,
            period_ms: DEFAULT_PERIOD_MS,
            frame: Frame::default(),
            last_time_ms: 0,
            started: false,
        }
    }

    /// Initialize the panel and the application
    ///
    /// The frame period becomes one panel refresh (at least 1 ms) and
    /// deferred updates are enabled once [`Application::init`] returns.
    pub fn start(&mut self) -> DeviceResult<T> {
        self.display.init()?;

        let frequency = self.display.device().frequency();
        self.period_ms = if frequency > 0.0 {
            ((1000.0 / frequency) as u32).max(1)
        } else {
            DEFAULT_PERIOD_MS
        };
        info!("frame period {} ms", self.period_ms);

        self.app.init(&mut self.display)?;
        self.display.set_deferred_update(true);
        self.frame = Frame::default();
        self.last_time_ms = 0;
        self.started = true;
        Ok(())
    }

    /// Run one frame at `now_ms` (milliseconds since start)
    ///
    /// Calls [`Application::update`], then sends whatever the frame requested.
    pub fn step(&mut self, now_ms: u64) -> DeviceResult<T> {
        self.frame.time_ms = now_ms;
        self.frame.delta_ms = now_ms.saturating_sub(self.last_time_ms) as u32;
        self.last_time_ms = now_ms;

        self.app.update(&mut self.display, &self.frame)?;
        if self.display.deferred_update() {
            self.display.refresh()?;
        }
        self.frame.counter = self.frame.counter.wrapping_add(1);
        Ok(())
    }

    /// Start if needed, then step frames until the application stops
    ///
    /// Frames are paced with `delay`; time advances by one period per frame.
    pub fn run(&mut self, delay: &mut impl DelayNs) -> DeviceResult<T> {
        if !self.started {
            self.start()?;
        }
        let mut now_ms = self.frame.time_ms;
        while self.app.is_running() {
            self.step(now_ms)?;
            delay.delay_ms(self.period_ms);
            now_ms += u64::from(self.period_ms);
        }
        debug!("application stopped after {} frames", self.frame.counter);
        Ok(())
    }

    /// Frame period in milliseconds
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Override the frame period (at least 1 ms)
    pub fn set_period_ms(&mut self, period_ms: u32) {
        self.period_ms = period_ms.max(1);
    }

    /// Timing of the last frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The display
    pub fn display(&self) -> &Display<T> {
        &self.display
    }

    /// The display, mutably
    pub fn display_mut(&mut self) -> &mut Display<T> {
        &mut self.display
    }

    /// The application
    pub fn app(&self) -> &A {
        &self.app
    }

    /// The application, mutably
    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// Give back the display and the application
    pub fn into_parts(self) -> (Display<T>, A) {
        (self.display, self.app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, PanelType};
    use crate::error::Error;
    use crate::interface::mock::MockTransport;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
        initialized: bool,
        limit: usize,
    }

    impl Application<MockTransport> for Recorder {
        fn init(&mut self, display: &mut Display<MockTransport>) -> DeviceResult<MockTransport> {
            self.initialized = true;
            assert!(!display.deferred_update());
            Ok(())
        }

        fn update(
            &mut self,
            display: &mut Display<MockTransport>,
            frame: &Frame,
        ) -> DeviceResult<MockTransport> {
            self.frames.push(*frame);
            display.draw_pixel(frame.counter as i32, 0);
            display.update(false)
        }

        fn is_running(&self) -> bool {
            self.frames.len() < self.limit
        }
    }

    struct CountingDelay {
        total_ms: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += u64::from(ns / 1_000_000);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += u64::from(ms);
        }
    }

    fn runner(limit: usize) -> Runner<MockTransport, Recorder> {
        let config = Builder::new()
            .panel(PanelType::Ssd1306_128x64)
            .build()
            .unwrap();
        let display = Display::new(MockTransport::new(), config);
        Runner::new(
            display,
            Recorder {
                limit,
                ..Recorder::default()
            },
        )
    }

    #[test]
    fn test_start_derives_period_and_defers() {
        let mut runner = runner(0);
        runner.start().unwrap();
        // 372 kHz / (64 * 54) = 107.6 Hz
        assert_eq!(runner.period_ms(), 9);
        assert!(runner.app().initialized);
        assert!(runner.display().deferred_update());
    }

    #[test]
    fn test_step_refreshes_once_per_frame() {
        let mut runner = runner(1);
        runner.start().unwrap();
        runner.display_mut().device_mut().transport_mut().clear();

        runner.step(0).unwrap();
        assert_eq!(
            runner.display().device().transport().data_bytes(),
            alloc::vec![0x01]
        );
        assert_eq!(runner.frame().counter, 1);
    }

    #[test]
    fn test_run_paces_frames() {
        let mut runner = runner(3);
        let mut delay = CountingDelay { total_ms: 0 };
        runner.run(&mut delay).unwrap();

        let frames = &runner.app().frames;
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].counter, 0);
        assert_eq!(frames[2].time_ms, 18);
        assert_eq!(frames[2].delta_ms, 9);
        assert_eq!(delay.total_ms, 27);
        assert!(runner.display().get_pixel(2, 0));
    }

    #[test]
    fn test_missing_panel_stops_before_first_frame() {
        let mut runner = runner(3);
        runner.display_mut().device_mut().transport_mut().present = false;
        let mut delay = CountingDelay { total_ms: 0 };
        assert!(matches!(runner.run(&mut delay), Err(Error::NotResponding)));
        assert!(runner.app().frames.is_empty());
    }

    #[test]
    fn test_frame_seconds() {
        let frame = Frame {
            counter: 0,
            time_ms: 1500,
            delta_ms: 250,
        };
        assert!((frame.delta() - 0.25).abs() < f32::EPSILON);
        assert!((frame.time() - 1.5).abs() < f32::EPSILON);
    }
}
