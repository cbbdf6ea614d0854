use crate::alpha::{decompress_alpha_bc2, decompress_alpha_bc3};
use crate::block::decompress_color_block;
use crate::encode::Block;
use crate::Format;

/// Decodes one block. `block` must be at least `format.block_size()` bytes
/// long; extra bytes are ignored.
pub(crate) fn decompress_block(block: &[u8], format: Format) -> Block {
    debug_assert!(block.len() >= format.block_size());

    let half = |offset: usize| -> [u8; 8] {
        let mut bytes = [0; 8];
        bytes.copy_from_slice(&block[offset..offset + 8]);
        bytes
    };

    match format {
        Format::Bc1 => decompress_color_block(half(0), true),
        Format::Bc2 => with_alpha(
            decompress_color_block(half(8), false),
            decompress_alpha_bc2(half(0)),
        ),
        Format::Bc3 => with_alpha(
            decompress_color_block(half(8), false),
            decompress_alpha_bc3(half(0)),
        ),
    }
}

fn with_alpha(mut pixels: Block, alpha: [u8; 16]) -> Block {
    for (pixel, a) in pixels.iter_mut().zip(alpha) {
        pixel[3] = a;
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bc2_layout() {
        let mut block = [0; 16];
        block[0] = 0xF0;
        // c0 = white, c1 = black, all indexes 0
        block[8..12].copy_from_slice(&[0xFF, 0xFF, 0x00, 0x00]);

        let pixels = decompress_block(&block, Format::Bc2);
        assert_eq!(pixels[0], [255, 255, 255, 0]);
        assert_eq!(pixels[1], [255, 255, 255, 255]);
        assert_eq!(pixels[2], [255, 255, 255, 0]);
    }

    #[test]
    fn bc3_layout() {
        let mut block = [0; 16];
        // alpha endpoints 0 and 255 in 8-value mode, all indexes 0
        block[0] = 255;
        block[1] = 0;
        block[8..12].copy_from_slice(&[0x00, 0x00, 0xFF, 0xFF]);

        let pixels = decompress_block(&block, Format::Bc3);
        // c0 < c1, but BC3 never uses 3-color mode
        assert_eq!(pixels, [[0, 0, 0, 255]; 16]);
    }

    #[test]
    fn extra_bytes_are_ignored() {
        let mut block = [0xAB; 24];
        block[..8].copy_from_slice(&[0, 0, 0xFF, 0xFF, 0, 0, 0, 0]);
        assert_eq!(decompress_block(&block, Format::Bc1), [[0, 0, 0, 255]; 16]);
    }
}
