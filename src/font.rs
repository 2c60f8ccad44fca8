//! Bitmap fonts
//!
//! A [`Font`] covers a contiguous character range. Each character has a
//! [`CharDescriptor`] giving its pixel width and the offset of its rows in the
//! shared bitmap. Rows are stored top to bottom, MSB first, `ceil(width / 8)`
//! bytes per row. All characters share the font height.
//!
//! Characters outside the range are drawn as a space.
//!
//! ```
//! use ssd1306_gfx::font::{builtin, GLCD_5X7};
//!
//! assert_eq!(GLCD_5X7.height, 7);
//! assert_eq!(GLCD_5X7.measure("Hi!"), 5 + 1 + 5 + 1 + 5);
//! assert!(builtin(0).is_some());
//! ```

/// Width and bitmap location of one character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharDescriptor {
    /// Character width in pixels
    pub width: u8,
    /// Offset of the first row in [`Font::bitmap`]
    pub offset: u16,
}

/// A proportional or fixed-width bitmap font
#[derive(Debug)]
pub struct Font {
    /// Character height in pixels
    pub height: u8,
    /// Horizontal gap between adjacent characters
    pub gap: u8,
    /// First character covered
    pub first: u8,
    /// Last character covered (inclusive)
    pub last: u8,
    /// One descriptor per character in `first..=last`
    pub descriptors: &'static [CharDescriptor],
    /// Shared glyph rows
    pub bitmap: &'static [u8],
}

/// Resolved glyph of one character
#[derive(Clone, Copy, Debug)]
pub struct Glyph<'a> {
    /// Width in pixels
    pub width: u8,
    /// Height in pixels
    pub height: u8,
    rows: &'a [u8],
}

impl Glyph<'_> {
    /// Bytes per glyph row
    pub fn bytes_per_row(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Whether the pixel at `(x, y)` of the glyph is set
    pub fn pixel(&self, x: u8, y: u8) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y as usize * self.bytes_per_row() + x as usize / 8;
        self.rows
            .get(index)
            .is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0)
    }
}

impl Font {
    /// Descriptor for `c`, falling back to the space character
    pub fn descriptor(&self, c: char) -> Option<&CharDescriptor> {
        let code = u32::from(c);
        let index = if (u32::from(self.first)..=u32::from(self.last)).contains(&code) {
            code - u32::from(self.first)
        } else {
            u32::from(b' ').checked_sub(u32::from(self.first))?
        };
        self.descriptors.get(index as usize)
    }

    /// Glyph for `c`, falling back to the space character
    ///
    /// Returns `None` only if the font has no space either, or the
    /// descriptor points outside the bitmap.
    pub fn glyph(&self, c: char) -> Option<Glyph<'_>> {
        let desc = self.descriptor(c)?;
        let len = (desc.width as usize).div_ceil(8) * self.height as usize;
        let start = desc.offset as usize;
        let rows = self.bitmap.get(start..start + len)?;
        Some(Glyph {
            width: desc.width,
            height: self.height,
            rows,
        })
    }

    /// Advance of a single character, excluding the gap
    pub fn char_width(&self, c: char) -> u16 {
        self.descriptor(c).map_or(0, |d| u16::from(d.width))
    }

    /// Width of `text` when drawn, with a gap between characters but not after the last
    pub fn measure(&self, text: &str) -> i32 {
        let mut width = 0i32;
        for (i, c) in text.chars().enumerate() {
            if i > 0 {
                width = width.saturating_add(i32::from(self.gap));
            }
            width = width.saturating_add(i32::from(self.char_width(c)));
        }
        width
    }
}

/// Classic 5x7 GLCD font, ASCII `0x20..=0x7E`
pub static GLCD_5X7: Font = Font {
    height: 7,
    gap: 1,
    first: 0x20,
    last: 0x7E,
    descriptors: &GLCD_5X7_DESCRIPTORS,
    bitmap: &GLCD_5X7_BITMAP,
};

/// Fonts selectable with [`builtin`]
pub static BUILTIN_FONTS: [&Font; 1] = [&GLCD_5X7];

/// Built-in font by index
pub fn builtin(index: usize) -> Option<&'static Font> {
    BUILTIN_FONTS.get(index).copied()
}

const GLCD_5X7_CHARS: usize = 95;

static GLCD_5X7_DESCRIPTORS: [CharDescriptor; GLCD_5X7_CHARS] = {
    let mut descriptors = [CharDescriptor {
        width: 5,
        offset: 0,
    }; GLCD_5X7_CHARS];
    let mut i = 0;
    while i < GLCD_5X7_CHARS {
        descriptors[i].offset = (i * 7) as u16;
        i += 1;
    }
    descriptors
};

#[rustfmt::skip]
static GLCD_5X7_BITMAP: [u8; GLCD_5X7_CHARS * 7] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // space
    0x20, 0x20, 0x20, 0x20, 0x20, 0x00, 0x20, // !
    0x50, 0x50, 0x50, 0x00, 0x00, 0x00, 0x00, // "
    0x50, 0x50, 0xF8, 0x50, 0xF8, 0x50, 0x50, // #
    0x20, 0x78, 0xA0, 0x70, 0x28, 0xF0, 0x20, // $
    0xC0, 0xC8, 0x10, 0x20, 0x40, 0x98, 0x18, // %
    0x60, 0x90, 0xA0, 0x40, 0xA8, 0x90, 0x68, // &
    0x60, 0x20, 0x40, 0x00, 0x00, 0x00, 0x00, // '
    0x10, 0x20, 0x40, 0x40, 0x40, 0x20, 0x10, // (
    0x40, 0x20, 0x10, 0x10, 0x10, 0x20, 0x40, // )
    0x00, 0x50, 0x20, 0xF8, 0x20, 0x50, 0x00, // *
    0x00, 0x20, 0x20, 0xF8, 0x20, 0x20, 0x00, // +
    0x00, 0x00, 0x00, 0x00, 0x60, 0x20, 0x40, // ,
    0x00, 0x00, 0x00, 0xF8, 0x00, 0x00, 0x00, // -
    0x00, 0x00, 0x00, 0x00, 0x00, 0x60, 0x60, // .
    0x00, 0x08, 0x10, 0x20, 0x40, 0x80, 0x00, // /
    0x70, 0x88, 0x98, 0xA8, 0xC8, 0x88, 0x70, // 0
    0x20, 0x60, 0x20, 0x20, 0x20, 0x20, 0x70, // 1
    0x70, 0x88, 0x08, 0x10, 0x20, 0x40, 0xF8, // 2
    0xF8, 0x10, 0x20, 0x10, 0x08, 0x88, 0x70, // 3
    0x10, 0x30, 0x50, 0x90, 0xF8, 0x10, 0x10, // 4
    0xF8, 0x80, 0xF0, 0x08, 0x08, 0x88, 0x70, // 5
    0x30, 0x40, 0x80, 0xF0, 0x88, 0x88, 0x70, // 6
    0xF8, 0x08, 0x10, 0x20, 0x40, 0x40, 0x40, // 7
    0x70, 0x88, 0x88, 0x70, 0x88, 0x88, 0x70, // 8
    0x70, 0x88, 0x88, 0x78, 0x08, 0x10, 0x60, // 9
    0x00, 0x60, 0x60, 0x00, 0x60, 0x60, 0x00, // :
    0x00, 0x60, 0x60, 0x00, 0x60, 0x20, 0x40, // ;
    0x08, 0x10, 0x20, 0x40, 0x20, 0x10, 0x08, // <
    0x00, 0x00, 0xF8, 0x00, 0xF8, 0x00, 0x00, // =
    0x80, 0x40, 0x20, 0x10, 0x20, 0x40, 0x80, // >
    0x70, 0x88, 0x08, 0x10, 0x20, 0x00, 0x20, // ?
    0x70, 0x88, 0x08, 0x68, 0xA8, 0xA8, 0x70, // @
    0x70, 0x88, 0x88, 0x88, 0xF8, 0x88, 0x88, // A
    0xF0, 0x88, 0x88, 0xF0, 0x88, 0x88, 0xF0, // B
    0x70, 0x88, 0x80, 0x80, 0x80, 0x88, 0x70, // C
    0xE0, 0x90, 0x88, 0x88, 0x88, 0x90, 0xE0, // D
    0xF8, 0x80, 0x80, 0xF0, 0x80, 0x80, 0xF8, // E
    0xF8, 0x80, 0x80, 0xE0, 0x80, 0x80, 0x80, // F
    0x70, 0x88, 0x80, 0x80, 0x98, 0x88, 0x70, // G
    0x88, 0x88, 0x88, 0xF8, 0x88, 0x88, 0x88, // H
    0x70, 0x20, 0x20, 0x20, 0x20, 0x20, 0x70, // I
    0x38, 0x10, 0x10, 0x10, 0x10, 0x90, 0x60, // J
    0x88, 0x90, 0xA0, 0xC0, 0xA0, 0x90, 0x88, // K
    0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0xF8, // L
    0x88, 0xD8, 0xA8, 0x88, 0x88, 0x88, 0x88, // M
    0x88, 0x88, 0xC8, 0xA8, 0x98, 0x88, 0x88, // N
    0x70, 0x88, 0x88, 0x88, 0x88, 0x88, 0x70, // O
    0xF0, 0x88, 0x88, 0xF0, 0x80, 0x80, 0x80, // P
    0x70, 0x88, 0x88, 0x88, 0xA8, 0x90, 0x68, // Q
    0xF0, 0x88, 0x88, 0xF0, 0xA0, 0x90, 0x88, // R
    0x78, 0x80, 0x80, 0x70, 0x08, 0x08, 0xF0, // S
    0xF8, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20, // T
    0x88, 0x88, 0x88, 0x88, 0x88, 0x88, 0x70, // U
    0x88, 0x88, 0x88, 0x88, 0x88, 0x50, 0x20, // V
    0x88, 0x88, 0x88, 0xA8, 0xA8, 0xD8, 0x88, // W
    0x88, 0x88, 0x50, 0x20, 0x50, 0x88, 0x88, // X
    0x88, 0x88, 0x50, 0x20, 0x20, 0x20, 0x20, // Y
    0xF8, 0x08, 0x10, 0x20, 0x40, 0x80, 0xF8, // Z
    0x38, 0x20, 0x20, 0x20, 0x20, 0x20, 0x38, // [
    0x00, 0x80, 0x40, 0x20, 0x10, 0x08, 0x00, // \
    0xE0, 0x20, 0x20, 0x20, 0x20, 0x20, 0xE0, // ]
    0x20, 0x50, 0x88, 0x00, 0x00, 0x00, 0x00, // ^
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, // _
    0x40, 0x20, 0x10, 0x00, 0x00, 0x00, 0x00, // `
    0x00, 0x00, 0x70, 0x08, 0x78, 0x88, 0x78, // a
    0x80, 0x80, 0xB0, 0xC8, 0x88, 0x88, 0xF0, // b
    0x00, 0x00, 0x70, 0x80, 0x80, 0x88, 0x70, // c
    0x08, 0x08, 0x68, 0x98, 0x88, 0x88, 0x78, // d
    0x00, 0x00, 0x70, 0x88, 0xF8, 0x80, 0x70, // e
    0x30, 0x48, 0x40, 0xE0, 0x40, 0x40, 0x40, // f
    0x00, 0x78, 0x88, 0x88, 0x78, 0x08, 0x70, // g
    0x80, 0x80, 0xB0, 0xC8, 0x88, 0x88, 0x88, // h
    0x20, 0x00, 0x60, 0x20, 0x20, 0x20, 0x70, // i
    0x10, 0x00, 0x30, 0x10, 0x10, 0x90, 0x60, // j
    0x80, 0x80, 0x90, 0xA0, 0xC0, 0xA0, 0x90, // k
    0x60, 0x20, 0x20, 0x20, 0x20, 0x20, 0x70, // l
    0x00, 0x00, 0xD0, 0xA8, 0xA8, 0x88, 0x88, // m
    0x00, 0x00, 0xB0, 0xC8, 0x88, 0x88, 0x88, // n
    0x00, 0x00, 0x70, 0x88, 0x88, 0x88, 0x70, // o
    0x00, 0x00, 0xF0, 0x88, 0xF0, 0x80, 0x80, // p
    0x00, 0x00, 0x68, 0x98, 0x78, 0x08, 0x08, // q
    0x00, 0x00, 0xB0, 0xC8, 0x80, 0x80, 0x80, // r
    0x00, 0x00, 0x70, 0x80, 0x70, 0x08, 0xF0, // s
    0x40, 0x40, 0xE0, 0x40, 0x40, 0x48, 0x30, // t
    0x00, 0x00, 0x88, 0x88, 0x88, 0x98, 0x68, // u
    0x00, 0x00, 0x88, 0x88, 0x88, 0x50, 0x20, // v
    0x00, 0x00, 0x88, 0x88, 0xA8, 0xA8, 0x50, // w
    0x00, 0x00, 0x88, 0x50, 0x20, 0x50, 0x88, // x
    0x00, 0x00, 0x88, 0x88, 0x78, 0x08, 0x70, // y
    0x00, 0x00, 0xF8, 0x10, 0x20, 0x40, 0xF8, // z
    0x10, 0x20, 0x20, 0x40, 0x20, 0x20, 0x10, // {
    0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20, // |
    0x40, 0x20, 0x20, 0x10, 0x20, 0x20, 0x40, // }
    0x00, 0x00, 0x40, 0xA8, 0x10, 0x00, 0x00, // ~
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_rows_are_msb_first() {
        let glyph = GLCD_5X7.glyph('|').unwrap();
        assert_eq!(glyph.width, 5);
        for y in 0..7 {
            assert!(glyph.pixel(2, y));
            assert!(!glyph.pixel(0, y));
        }
    }

    #[test]
    fn test_out_of_range_resolves_to_space() {
        let space = GLCD_5X7.descriptor(' ').unwrap();
        assert_eq!(GLCD_5X7.descriptor('\u{7F}'), Some(space));
        assert_eq!(GLCD_5X7.descriptor('\u{e9}'), Some(space));
        let glyph = GLCD_5X7.glyph('\n').unwrap();
        assert!((0..7).all(|y| (0..5).all(|x| !glyph.pixel(x, y))));
    }

    #[test]
    fn test_measure_adds_gap_between_characters_only() {
        assert_eq!(GLCD_5X7.measure(""), 0);
        assert_eq!(GLCD_5X7.measure("A"), 5);
        assert_eq!(GLCD_5X7.measure("AB"), 11);
    }

    #[test]
    fn test_builtin_lookup() {
        assert!(core::ptr::eq(builtin(0).unwrap(), &GLCD_5X7));
        assert!(builtin(1).is_none());
    }

    #[test]
    fn test_letter_a() {
        let glyph = GLCD_5X7.glyph('A').unwrap();
        // top row: .###.
        assert!(!glyph.pixel(0, 0));
        assert!(glyph.pixel(1, 0) && glyph.pixel(2, 0) && glyph.pixel(3, 0));
        // crossbar on row 4
        assert!((0..5).all(|x| glyph.pixel(x, 4)));
    }
}
