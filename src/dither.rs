//! Intensity dithering for a 1-bit panel
//!
//! An 8-bit intensity is turned into on/off per pixel by comparing it to a
//! threshold that depends on the pixel position:
//!
//! - [`Dithering::Ordered`]: 4x4 Bayer matrix scaled to `0..=240`
//! - [`Dithering::Unordered`]: a fixed table of 256 shuffled thresholds
//!
//! Both are pure functions of `(x, y, intensity)`, so redrawing the same shape
//! gives the same pattern.
//!
//! ```
//! use ssd1306_gfx::dither::{dithered, Dithering};
//!
//! assert!(!dithered(Dithering::Ordered, 3, 3, 0));
//! assert!(dithered(Dithering::Ordered, 3, 3, 255));
//! // Bayer threshold of (0, 0) is 0, so any non-zero intensity lights it
//! assert!(dithered(Dithering::Ordered, 0, 0, 1));
//! ```

/// Threshold pattern used by dithered drawing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dithering {
    /// 4x4 Bayer matrix
    #[default]
    Ordered,
    /// Pseudo-random thresholds
    Unordered,
}

/// 4x4 Bayer matrix, row-major
pub const BAYER_4X4: [u8; 16] = [0, 8, 2, 10, 12, 4, 14, 6, 3, 11, 1, 9, 15, 7, 13, 5];

/// Shuffled thresholds `0..=255`, each value exactly once
#[rustfmt::skip]
pub const DITHER_SEED: [u8; 256] = [
    203, 22, 77, 162, 177, 233, 222, 231, 130, 85, 19, 117, 28, 206, 23, 200, 118, 217, 29, 207,
    138, 41, 174, 201, 224, 52, 235, 133, 208, 108, 11, 168, 226, 199, 91, 99, 123, 170, 160, 1,
    83, 111, 150, 102, 161, 8, 127, 53, 13, 253, 164, 70, 191, 244, 4, 49, 68, 135, 112, 82, 96,
    128, 27, 64, 35, 151, 140, 247, 234, 227, 209, 66, 51, 129, 169, 71, 182, 107, 189, 42, 89,
    192, 69, 17, 60, 149, 213, 184, 57, 167, 12, 95, 79, 0, 47, 219, 134, 251, 113, 242, 195, 21,
    45, 147, 54, 121, 171, 176, 109, 10, 202, 126, 14, 50, 6, 122, 146, 241, 238, 30, 198, 196, 72,
    211, 90, 194, 225, 58, 61, 142, 59, 239, 31, 158, 103, 76, 143, 136, 152, 73, 9, 65, 155, 188,
    116, 145, 74, 120, 166, 157, 16, 24, 94, 144, 119, 163, 255, 100, 175, 228, 63, 78, 250, 36, 44,
    173, 104, 179, 221, 88, 232, 114, 204, 220, 141, 86, 5, 67, 80, 110, 214, 40, 187, 223, 252, 26,
    7, 125, 218, 115, 3, 230, 248, 38, 240, 181, 180, 137, 39, 92, 186, 75, 159, 154, 156, 34, 178,
    148, 37, 215, 246, 131, 55, 105, 15, 245, 62, 81, 243, 172, 193, 237, 25, 33, 212, 98, 216, 32,
    236, 46, 183, 197, 18, 185, 249, 101, 48, 210, 20, 87, 124, 43, 106, 93, 132, 153, 139, 84, 205,
    254, 229, 56, 165, 97, 190, 2,
];

/// Whether pixel `(x, y)` is lit at the given intensity
///
/// Intensity 0 is always off and 255 or more always on.
pub fn dithered(mode: Dithering, x: i32, y: i32, intensity: i32) -> bool {
    if intensity <= 0 {
        return false;
    }
    if intensity >= 255 {
        return true;
    }
    let threshold = match mode {
        Dithering::Unordered => {
            let index = x.wrapping_add(13).wrapping_mul(y.wrapping_add(17)).rem_euclid(256);
            i32::from(DITHER_SEED[index as usize])
        }
        Dithering::Ordered => {
            let index = (((y & 0x3) << 2) + (x & 0x3)) as usize;
            i32::from(BAYER_4X4[index]) << 4
        }
    };
    intensity >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_a_permutation() {
        let mut seen = [false; 256];
        for value in DITHER_SEED {
            assert!(!seen[value as usize]);
            seen[value as usize] = true;
        }
    }

    #[test]
    fn test_ordered_half_intensity_lights_half_the_cell() {
        let lit = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .filter(|&(x, y)| dithered(Dithering::Ordered, x, y, 128))
            .count();
        // thresholds 0..=128 step 16 -> 9 of 16
        assert_eq!(lit, 9);
    }

    #[test]
    fn test_ordered_pattern_repeats_every_four_pixels() {
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(
                    dithered(Dithering::Ordered, x, y, 100),
                    dithered(Dithering::Ordered, x + 4, y + 4, 100)
                );
            }
        }
    }

    #[test]
    fn test_unordered_is_deterministic() {
        // (0 + 13) * (0 + 17) = 221 -> DITHER_SEED[221] = 237
        assert!(!dithered(Dithering::Unordered, 0, 0, 236));
        assert!(dithered(Dithering::Unordered, 0, 0, 237));
        assert!(dithered(Dithering::Unordered, -20, -20, 255));
    }

    #[test]
    fn test_unordered_wraps_at_coordinate_limits() {
        // (MIN + 12) * (MIN + 16) wraps to 192 -> DITHER_SEED[192] = 248
        assert!(!dithered(Dithering::Unordered, i32::MAX, i32::MAX, 247));
        assert!(dithered(Dithering::Unordered, i32::MAX, i32::MAX, 248));
        assert!(dithered(Dithering::Ordered, i32::MIN, i32::MIN, 1));
    }

    #[test]
    fn test_extremes() {
        for mode in [Dithering::Ordered, Dithering::Unordered] {
            assert!(!dithered(mode, 5, 7, 0));
            assert!(dithered(mode, 5, 7, 255));
            assert!(dithered(mode, 5, 7, 1000));
        }
    }
}
