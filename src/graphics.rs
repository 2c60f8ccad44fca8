//! Graphics support via embedded-graphics
//!
//! [`Display`] implements [`DrawTarget`] with [`Color`] as its pixel color, so
//! embedded-graphics primitives, text and images draw straight into the
//! framebuffer and get dirty-tracked like the native drawing calls.
//! [`BinaryColor`] converts into [`Color`] for styles written against the
//! common monochrome color type.
//!
//! ## Example
//!
//! ```
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
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
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Color::White))
//!     .draw(&mut display);
//!
//! let _ = Circle::new(Point::new(80, 20), 30)
//!     .into_styled(PrimitiveStyle::with_stroke(Color::Invert, 1))
//!     .draw(&mut display);
//!
//! let _ = Text::new(
//!     "Hello, OLED!",
//!     Point::new(0, 60),
//!     MonoTextStyle::new(&FONT_6X10, Color::White),
//! )
//! .draw(&mut display);
//!
//! // Only the touched columns are sent
//! let _ = display.update(false);
//! ```
//!
//! [`BinaryColor`]: embedded_graphics_core::pixelcolor::BinaryColor

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    prelude::Pixel,
    primitives::Rectangle,
};

use crate::color::Color;
use crate::display::Display;
use crate::interface::Transport;

impl<T> DrawTarget for Display<T>
where
    T: Transport,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.draw_pixel_color(x, y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let previous = self.set_foreground(color);
        self.fill_rectangle(
            area.top_left.x,
            area.top_left.y,
            bottom_right.x,
            bottom_right.y,
        );
        self.set_foreground(previous);
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        match color.fill_byte() {
            Some(byte) => self.device_mut().framebuffer_mut().fill(byte),
            None => {
                let area = self.bounding_box();
                self.fill_solid(&area, color)?;
            }
        }
        Ok(())
    }
}

impl<T> OriginDimensions for Display<T>
where
    T: Transport,
{
    fn size(&self) -> Size {
        Size::new(self.width() as u32, self.height() as u32)
    }
}
