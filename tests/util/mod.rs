#![allow(unused)]

use dxtc::*;
use rand::{Rng, SeedableRng};

pub const ALL_FORMATS: [Flags; 3] = [Flags::BC1, Flags::BC2, Flags::BC3];
pub const ALL_FITS: [Flags; 3] = [
    Flags::RANGE_FIT,
    Flags::CLUSTER_FIT,
    Flags::ITERATIVE_CLUSTER_FIT,
];

pub fn create_rng() -> impl rand::Rng {
    rand_chacha::ChaChaRng::seed_from_u64(123456789)
}

pub fn random_block(rng: &mut impl Rng) -> [u8; 64] {
    let mut block = [0; 64];
    rng.fill_bytes(&mut block);
    block
}

/// A random image whose pixels are smooth gradients with some noise, which
/// is closer to real textures than pure noise.
pub fn random_image(rng: &mut impl Rng, width: u32, height: u32) -> Vec<u8> {
    let base: [f32; 4] = rng.gen();
    let dx: [f32; 4] = rng.gen();
    let dy: [f32; 4] = rng.gen();

    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            for c in 0..4 {
                let t = base[c] * 255.0 + dx[c] * x as f32 * 4.0 - dy[c] * y as f32 * 4.0;
                let noise = rng.gen_range(-4.0..4.0);
                rgba.push((t + noise).clamp(0.0, 255.0) as u8);
            }
        }
    }
    rgba
}

pub fn block_from_pixels(pixels: [[u8; 4]; 16]) -> [u8; 64] {
    let mut rgba = [0; 64];
    for (chunk, pixel) in rgba.chunks_exact_mut(4).zip(pixels) {
        chunk.copy_from_slice(&pixel);
    }
    rgba
}

pub fn pixel(rgba: &[u8; 64], index: usize) -> [u8; 4] {
    let mut pixel = [0; 4];
    pixel.copy_from_slice(&rgba[index * 4..index * 4 + 4]);
    pixel
}

pub fn round_trip(rgba: &[u8; 64], flags: Flags) -> [u8; 64] {
    let mut block = [0; 16];
    compress(rgba, &mut block, flags).unwrap();
    let mut decoded = [0; 64];
    decompress(&mut decoded, &block, flags).unwrap();
    decoded
}

/// The sum of squared differences of the RGB channels of the valid pixels.
pub fn color_error(a: &[u8; 64], b: &[u8; 64], mask: u16, weights: [f32; 3]) -> f32 {
    let mut error = 0.0;
    for i in 0..16 {
        if mask & (1 << i) == 0 {
            continue;
        }
        for c in 0..3 {
            let diff = (a[i * 4 + c] as f32 - b[i * 4 + c] as f32) * weights[c];
            error += diff * diff;
        }
    }
    error
}

/// The sum of squared differences of the alpha channel.
pub fn alpha_error(a: &[u8; 64], b: &[u8; 64]) -> u32 {
    (0..16)
        .map(|i| (a[i * 4 + 3] as i32 - b[i * 4 + 3] as i32).pow(2) as u32)
        .sum()
}
