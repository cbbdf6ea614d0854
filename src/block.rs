//! Bit layout of the 8-byte color block shared by BC1, BC2, and BC3.
//!
//! A color block holds two little-endian R5G6B5 endpoints followed by 16
//! 2-bit palette indexes, the index of the first pixel in the lowest bits.

use glam::Vec3A;

use crate::convert::{blend, B5G6R5};

/// A completely transparent BC1 block in 3-color mode.
///
/// Any endpoints with c0 <= c1 would work. c0 == c1 is avoided because some
/// BC1 decoders do not handle it correctly.
pub(crate) const TRANSPARENT_BLOCK: [u8; 8] = [0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

/// Palette index values of the 16 pixels of a block.
///
/// Values are `0..4`. Index 0 and 1 always refer to the two endpoints.
pub(crate) type Indexes = [u8; 16];

fn write_color_block(c0: u16, c1: u16, indexes: &Indexes) -> [u8; 8] {
    let mut packed: u32 = 0;
    for (i, &index) in indexes.iter().enumerate() {
        debug_assert!(index < 4);
        packed |= (index as u32 & 0b11) << (i * 2);
    }

    let c0 = c0.to_le_bytes();
    let c1 = c1.to_le_bytes();
    let [i0, i1, i2, i3] = packed.to_le_bytes();
    [c0[0], c0[1], c1[0], c1[1], i0, i1, i2, i3]
}

/// Writes a block in 3-color mode.
///
/// `indexes` refer to the palette `[start, end, (start + end) / 2, transparent]`.
/// The endpoints are swapped if necessary to get c0 <= c1.
pub(crate) fn write_color_block3(start: Vec3A, end: Vec3A, indexes: &Indexes) -> [u8; 8] {
    let mut a = B5G6R5::from_color_round(start).to_u16();
    let mut b = B5G6R5::from_color_round(end).to_u16();

    if a <= b {
        write_color_block(a, b, indexes)
    } else {
        std::mem::swap(&mut a, &mut b);
        let remapped = indexes.map(|i| match i {
            0 => 1,
            1 => 0,
            i => i,
        });
        write_color_block(a, b, &remapped)
    }
}

/// Writes a block in 4-color mode.
///
/// `indexes` refer to the palette
/// `[start, end, 2/3 start + 1/3 end, 1/3 start + 2/3 end]`. The endpoints
/// are swapped if necessary to get c0 > c1. If both endpoints quantize to the
/// same color, all indexes are set to 0.
pub(crate) fn write_color_block4(start: Vec3A, end: Vec3A, indexes: &Indexes) -> [u8; 8] {
    let a = B5G6R5::from_color_round(start).to_u16();
    let b = B5G6R5::from_color_round(end).to_u16();

    #[allow(clippy::comparison_chain)]
    if a < b {
        // swapping turns 0<->1 and 2<->3
        let remapped = indexes.map(|i| (i ^ 1) & 0b11);
        write_color_block(b, a, &remapped)
    } else if a == b {
        write_color_block(a, b, &[0; 16])
    } else {
        write_color_block(a, b, indexes)
    }
}

/// Returns the endpoints of a block as stored.
fn endpoints(block: [u8; 8]) -> (u16, u16) {
    (
        u16::from_le_bytes([block[0], block[1]]),
        u16::from_le_bytes([block[2], block[3]]),
    )
}

/// Decodes the 4-entry palette of a color block.
///
/// If `allow_3_color` is `true` (BC1), blocks with c0 <= c1 use the 3-color
/// palette with transparent black as the fourth entry. BC2 and BC3 color
/// blocks always use the 4-color palette. The second value is whether the
/// block is in 3-color mode.
pub(crate) fn decode_palette(block: [u8; 8], allow_3_color: bool) -> ([[u8; 4]; 4], bool) {
    let (c0_u16, c1_u16) = endpoints(block);

    let [r0, g0, b0] = B5G6R5::from_u16(c0_u16).to_n8();
    let [r1, g1, b1] = B5G6R5::from_u16(c1_u16).to_n8();

    let c0 = [r0, g0, b0, 255];
    let c1 = [r1, g1, b1, 255];
    if allow_3_color && c0_u16 <= c1_u16 {
        let c2 = [blend(r0, r1, 1, 1), blend(g0, g1, 1, 1), blend(b0, b1, 1, 1), 255];
        ([c0, c1, c2, [0, 0, 0, 0]], true)
    } else {
        let c2 = [blend(r0, r1, 2, 1), blend(g0, g1, 2, 1), blend(b0, b1, 2, 1), 255];
        let c3 = [blend(r0, r1, 1, 2), blend(g0, g1, 1, 2), blend(b0, b1, 1, 2), 255];
        ([c0, c1, c2, c3], false)
    }
}

pub(crate) fn read_indexes(block: [u8; 8]) -> Indexes {
    let packed = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);
    std::array::from_fn(|i| ((packed >> (i * 2)) & 0b11) as u8)
}

/// Replaces the indexes of a block, keeping its endpoints.
pub(crate) fn with_indexes(block: [u8; 8], indexes: &Indexes) -> [u8; 8] {
    let (c0, c1) = endpoints(block);
    write_color_block(c0, c1, indexes)
}

/// Decodes a color block into 16 RGBA pixels. See [`decode_palette`].
pub(crate) fn decompress_color_block(block: [u8; 8], allow_3_color: bool) -> [[u8; 4]; 16] {
    let (lut, _) = decode_palette(block, allow_3_color);
    read_indexes(block).map(|index| lut[index as usize])
}
