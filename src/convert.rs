//! Conversions between the normalized integer precisions used by BC1-3 blocks.

use glam::Vec3A;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct B5G6R5 {
    pub r5: u16,
    pub g6: u16,
    pub b5: u16,
}
impl B5G6R5 {
    #[inline(always)]
    pub fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self::from_u16(u16::from_le_bytes(bytes))
    }
    #[inline(always)]
    pub fn from_u16(u: u16) -> Self {
        Self {
            b5: u & 0x1F,
            g6: (u >> 5) & 0x3F,
            r5: (u >> 11) & 0x1F,
        }
    }
    #[inline(always)]
    pub fn to_u16(self) -> u16 {
        debug_assert!(self.r5 < 32 && self.g6 < 64 && self.b5 < 32);
        (self.r5 << 11) | (self.g6 << 5) | self.b5
    }

    /// Quantizes a color in the range `0..=1` to the nearest 5:6:5 color.
    pub fn from_color_round(color: Vec3A) -> Self {
        Self {
            r5: n5::from_f32(color.x) as u16,
            g6: n6::from_f32(color.y) as u16,
            b5: n5::from_f32(color.z) as u16,
        }
    }

    #[inline(always)]
    pub fn to_n8(self) -> [u8; 3] {
        [
            n5::n8(self.r5 as u8),
            n6::n8(self.g6 as u8),
            n5::n8(self.b5 as u8),
        ]
    }
}

/// Functions for converting **FROM Unorm4** values to other formats.
pub(crate) mod n4 {
    #[inline(always)]
    pub const fn n8(x: u8) -> u8 {
        debug_assert!(x <= 15);
        x * 17
    }
    /// Rounds a Unorm8 value to the nearest Unorm4 value.
    #[inline(always)]
    pub const fn from_n8(x: u8) -> u8 {
        ((x as u16 * 15 + 127) / 255) as u8
    }
}

/// Functions for converting **FROM Unorm5** values to other formats.
pub(crate) mod n5 {
    #[inline(always)]
    pub const fn n8(x: u8) -> u8 {
        debug_assert!(x <= 31);
        (x << 3) | (x >> 2)
    }
    /// Rounds a value in `0..=1` to the nearest Unorm5 value.
    #[inline(always)]
    pub fn from_f32(x: f32) -> u8 {
        super::quantize(x, 31)
    }
}

/// Functions for converting **FROM Unorm6** values to other formats.
pub(crate) mod n6 {
    #[inline(always)]
    pub const fn n8(x: u8) -> u8 {
        debug_assert!(x <= 63);
        (x << 2) | (x >> 4)
    }
    /// Rounds a value in `0..=1` to the nearest Unorm6 value.
    #[inline(always)]
    pub fn from_f32(x: f32) -> u8 {
        super::quantize(x, 63)
    }
}

/// Functions for converting **FROM Unorm8** values to other formats.
pub(crate) mod n8 {
    #[inline(always)]
    pub fn f32(x: u8) -> f32 {
        x as f32 / 255.0
    }
}

fn quantize(x: f32, max: u8) -> u8 {
    // `as` saturates and maps NaN to 0
    let q = (x * max as f32 + 0.5) as i32;
    q.clamp(0, max as i32) as u8
}

/// Returns `(w0 * a + w1 * b) / (w0 + w1)` with integer division.
#[inline(always)]
pub(crate) const fn blend(a: u8, b: u8, w0: u16, w1: u16) -> u8 {
    ((w0 * a as u16 + w1 * b as u16) / (w0 + w1)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unorm5_and_unorm6_replicate_bits() {
        assert_eq!(n5::n8(0), 0);
        assert_eq!(n5::n8(3), 24);
        assert_eq!(n5::n8(16), 132);
        assert_eq!(n5::n8(31), 255);
        assert_eq!(n6::n8(1), 4);
        assert_eq!(n6::n8(32), 130);
        assert_eq!(n6::n8(63), 255);

        // never more than 1 away from the exact value
        let exact = |x: u8, max: f32| x as f32 * 255.0 / max;
        for x in 0..32_u8 {
            assert!((n5::n8(x) as f32 - exact(x, 31.0)).abs() < 1.0, "unorm5 {x}");
        }
        for x in 0..64_u8 {
            assert!((n6::n8(x) as f32 - exact(x, 63.0)).abs() < 1.0, "unorm6 {x}");
        }
    }

    #[test]
    fn unorm4_rounds_to_nearest() {
        assert_eq!(n4::from_n8(0), 0);
        assert_eq!(n4::from_n8(8), 0);
        assert_eq!(n4::from_n8(9), 1);
        assert_eq!(n4::from_n8(17), 1);
        assert_eq!(n4::from_n8(25), 1);
        assert_eq!(n4::from_n8(26), 2);
        assert_eq!(n4::from_n8(255), 15);
        for x in 0..16 {
            assert_eq!(n4::from_n8(n4::n8(x)), x);
        }
    }

    #[test]
    fn quantize_clamps() {
        assert_eq!(n5::from_f32(-0.5), 0);
        assert_eq!(n5::from_f32(1.5), 31);
        assert_eq!(n6::from_f32(f32::NAN), 0);
        assert_eq!(n6::from_f32(0.5), 32);
    }

    #[test]
    fn b5g6r5_round_trip() {
        for u in [0_u16, 0xFFFF, 0xF800, 0x07E0, 0x001F, 0x1234] {
            assert_eq!(B5G6R5::from_u16(u).to_u16(), u);
            assert_eq!(B5G6R5::from_le_bytes(u.to_le_bytes()).to_u16(), u);
        }
    }
}
