//! The 8-byte alpha blocks of BC2 and BC3.

use crate::convert::{blend, n4};

/// Compresses the alpha of 16 pixels into a BC2 block of 4-bit values.
///
/// Pixels outside the mask are written as 0.
pub(crate) fn compress_alpha_bc2(rgba: &[[u8; 4]; 16], mask: u16) -> [u8; 8] {
    let mut block = [0; 8];
    for (i, byte) in block.iter_mut().enumerate() {
        let quantize = |pixel: usize| {
            if mask & (1 << pixel) != 0 {
                n4::from_n8(rgba[pixel][3])
            } else {
                0
            }
        };
        let lo = quantize(2 * i);
        let hi = quantize(2 * i + 1);
        *byte = lo | (hi << 4);
    }
    block
}

pub(crate) fn decompress_alpha_bc2(block: [u8; 8]) -> [u8; 16] {
    let mut alpha = [0; 16];
    for (i, &byte) in block.iter().enumerate() {
        alpha[2 * i] = n4::n8(byte & 0xF);
        alpha[2 * i + 1] = n4::n8(byte >> 4);
    }
    alpha
}

/// Compresses the alpha of 16 pixels into a BC3 block.
///
/// Both BC3 palettes are tried: 6 interpolated values plus explicit 0 and
/// 255, and 8 interpolated values. The one with the lower squared error wins,
/// the 6-value palette on ties. Pixels outside the mask don't contribute to
/// the error and get index 0.
pub(crate) fn compress_alpha_bc3(rgba: &[[u8; 4]; 16], mask: u16) -> [u8; 8] {
    let valid = |i: usize| mask & (1 << i) != 0;

    let mut min5 = 255_u8;
    let mut max5 = 0_u8;
    let mut min7 = 255_u8;
    let mut max7 = 0_u8;
    for (i, pixel) in rgba.iter().enumerate() {
        if !valid(i) {
            continue;
        }
        let a = pixel[3];
        min7 = min7.min(a);
        max7 = max7.max(a);
        // 0 and 255 have their own palette entries in 6-value mode
        if a != 0 && a != 255 {
            min5 = min5.min(a);
            max5 = max5.max(a);
        }
    }
    if min5 > max5 {
        min5 = max5;
    }
    if min7 > max7 {
        min7 = max7;
    }

    let (min5, max5) = fix_range(min5, max5, 5);
    let (min7, max7) = fix_range(min7, max7, 7);

    let mut codes5 = [0; 8];
    codes5[0] = min5;
    codes5[1] = max5;
    for i in 1..5 {
        codes5[1 + i] = blend(min5, max5, 5 - i as u16, i as u16);
    }
    codes5[6] = 0;
    codes5[7] = 255;

    let mut codes7 = [0; 8];
    codes7[0] = min7;
    codes7[1] = max7;
    for i in 1..7 {
        codes7[1 + i] = blend(min7, max7, 7 - i as u16, i as u16);
    }

    let (indexes5, error5) = fit_codes(rgba, mask, &codes5);
    let (indexes7, error7) = fit_codes(rgba, mask, &codes7);

    if error5 <= error7 {
        write_alpha_block5(min5, max5, indexes5)
    } else {
        write_alpha_block7(min7, max7, indexes7)
    }
}

/// Widens the range to at least `steps` so all interpolated values differ.
fn fix_range(mut min: u8, mut max: u8, steps: u8) -> (u8, u8) {
    if max - min < steps {
        max = min.saturating_add(steps);
    }
    if max - min < steps {
        min = max.saturating_sub(steps);
    }
    (min, max)
}

fn fit_codes(rgba: &[[u8; 4]; 16], mask: u16, codes: &[u8; 8]) -> ([u8; 16], u32) {
    let mut indexes = [0; 16];
    let mut error = 0;
    for (i, pixel) in rgba.iter().enumerate() {
        if mask & (1 << i) == 0 {
            continue;
        }

        let a = pixel[3] as i32;
        let mut least = u32::MAX;
        for (j, &code) in codes.iter().enumerate() {
            let dist = (a - code as i32).pow(2) as u32;
            if dist < least {
                least = dist;
                indexes[i] = j as u8;
            }
        }
        error += least;
    }
    (indexes, error)
}

/// Writes a block in 6-value mode, which requires a0 <= a1.
fn write_alpha_block5(a0: u8, a1: u8, indexes: [u8; 16]) -> [u8; 8] {
    if a0 > a1 {
        let swapped = indexes.map(|i| match i {
            0 => 1,
            1 => 0,
            2..=5 => 7 - i,
            i => i,
        });
        write_alpha_block(a1, a0, swapped)
    } else {
        write_alpha_block(a0, a1, indexes)
    }
}

/// Writes a block in 8-value mode, which requires a0 > a1.
fn write_alpha_block7(a0: u8, a1: u8, indexes: [u8; 16]) -> [u8; 8] {
    if a0 < a1 {
        let swapped = indexes.map(|i| match i {
            0 => 1,
            1 => 0,
            i => 9 - i,
        });
        write_alpha_block(a1, a0, swapped)
    } else {
        write_alpha_block(a0, a1, indexes)
    }
}

fn write_alpha_block(a0: u8, a1: u8, indexes: [u8; 16]) -> [u8; 8] {
    let mut block = [a0, a1, 0, 0, 0, 0, 0, 0];
    for (group, chunk) in indexes.chunks_exact(8).enumerate() {
        let packed = chunk
            .iter()
            .enumerate()
            .fold(0_u32, |acc, (j, &index)| acc | ((index as u32 & 0b111) << (3 * j)));
        let [b0, b1, b2, _] = packed.to_le_bytes();
        block[2 + 3 * group..5 + 3 * group].copy_from_slice(&[b0, b1, b2]);
    }
    block
}

pub(crate) fn decompress_alpha_bc3(block: [u8; 8]) -> [u8; 16] {
    let a0 = block[0];
    let a1 = block[1];

    let mut codes = [0; 8];
    codes[0] = a0;
    codes[1] = a1;
    if a0 <= a1 {
        for i in 1..5 {
            codes[1 + i] = blend(a0, a1, 5 - i as u16, i as u16);
        }
        codes[6] = 0;
        codes[7] = 255;
    } else {
        for i in 1..7 {
            codes[1 + i] = blend(a0, a1, 7 - i as u16, i as u16);
        }
    }

    let mut alpha = [0; 16];
    for (group, out) in alpha.chunks_exact_mut(8).enumerate() {
        let bytes = &block[2 + 3 * group..5 + 3 * group];
        let packed = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]);
        for (j, a) in out.iter_mut().enumerate() {
            let index = (packed >> (3 * j)) & 0b111;
            *a = codes[index as usize];
        }
    }
    alpha
}
