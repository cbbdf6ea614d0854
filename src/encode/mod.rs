use crate::alpha::{compress_alpha_bc2, compress_alpha_bc3};
use crate::colorset::ColorSet;
use crate::fit::compress_color_block;
use crate::cast::{self, Castable};
use crate::{CodecError, Format, Params};

/// The RGBA pixels of a 4x4 block in row-major order.
pub(crate) type Block = [[u8; 4]; 16];

pub(crate) fn compress_bc1(rgba: &Block, mask: u16, params: &Params, output: &mut [u8; 8]) {
    let set = ColorSet::new(rgba, mask, true, params.weigh_color_by_alpha);
    *output = compress_color_block(&set, params, true).block;
}

pub(crate) fn compress_bc2(rgba: &Block, mask: u16, params: &Params, output: &mut [u8; 16]) {
    let (alpha, color) = split(output);
    *alpha = compress_alpha_bc2(rgba, mask);
    let set = ColorSet::new(rgba, mask, false, params.weigh_color_by_alpha);
    *color = compress_color_block(&set, params, false).block;
}

pub(crate) fn compress_bc3(rgba: &Block, mask: u16, params: &Params, output: &mut [u8; 16]) {
    let (alpha, color) = split(output);
    *alpha = compress_alpha_bc3(rgba, mask);
    let set = ColorSet::new(rgba, mask, false, params.weigh_color_by_alpha);
    *color = compress_color_block(&set, params, false).block;
}

/// Splits a 16-byte block into its alpha and color halves.
fn split(block: &mut [u8; 16]) -> (&mut [u8; 8], &mut [u8; 8]) {
    let [alpha, color] = bytemuck::cast_mut::<[u8; 16], [[u8; 8]; 2]>(block);
    (alpha, color)
}

/// Compresses one block into the first `params.format.block_size()` bytes
/// of `output`.
pub(crate) fn compress_block(
    rgba: &Block,
    mask: u16,
    params: &Params,
    output: &mut [u8],
) -> Result<(), CodecError> {
    match params.format {
        Format::Bc1 => compress_bc1(rgba, mask, params, first_block(output)?),
        Format::Bc2 => compress_bc2(rgba, mask, params, first_block(output)?),
        Format::Bc3 => compress_bc3(rgba, mask, params, first_block(output)?),
    }
    Ok(())
}

fn first_block<const N: usize>(output: &mut [u8]) -> Result<&mut [u8; N], CodecError>
where
    [u8; N]: Castable,
{
    let actual = output.len();
    cast::as_arrays_mut(output)
        .first_mut()
        .ok_or(CodecError::BufferTooSmall {
            required: N,
            actual,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decompress_block;

    #[test]
    fn bc2_and_bc3_put_alpha_first() {
        let rgba = [[255, 0, 0, 0]; 16];

        let mut block = [0; 16];
        compress_bc2(&rgba, 0xFFFF, &Params::new(Format::Bc2), &mut block);
        assert_eq!(block[..8], [0; 8]);
        assert_eq!(block[8..10], [0x00, 0xF8]);

        compress_bc3(&rgba, 0xFFFF, &Params::new(Format::Bc3), &mut block);
        assert_eq!(block[8..10], [0x00, 0xF8]);
        assert_eq!(decompress_block(&block, Format::Bc3), rgba);
    }

    #[test]
    fn bc1_alpha_threshold() {
        let mut rgba = [[0, 0, 255, 255]; 16];
        rgba[0][3] = 127;
        rgba[1][3] = 128;

        let mut block = [0; 8];
        compress_bc1(&rgba, 0xFFFF, &Params::new(Format::Bc1), &mut block);
        let decoded = decompress_block(&block, Format::Bc1);
        assert_eq!(decoded[0], [0, 0, 0, 0]);
        assert_eq!(decoded[1], [0, 0, 255, 255]);
        assert_eq!(decoded[2], [0, 0, 255, 255]);
    }

    #[test]
    fn dispatch_by_format() {
        let rgba = [[40, 80, 120, 200]; 16];
        for format in [Format::Bc1, Format::Bc2, Format::Bc3] {
            let params = Params::new(format);
            let mut output = vec![0; format.block_size()];
            compress_block(&rgba, 0xFFFF, &params, &mut output).unwrap();
            assert_ne!(output, vec![0; format.block_size()], "{format:?}");
        }
    }

    #[test]
    fn short_output_is_an_error() {
        let rgba = [[40, 80, 120, 200]; 16];
        for format in [Format::Bc1, Format::Bc2, Format::Bc3] {
            let required = format.block_size();
            let mut output = vec![0xAB; required - 1];
            assert_eq!(
                compress_block(&rgba, 0xFFFF, &Params::new(format), &mut output),
                Err(CodecError::BufferTooSmall {
                    required,
                    actual: required - 1
                })
            );
            assert!(output.iter().all(|&b| b == 0xAB));
        }
    }
}
