//! Partitioning whole images into blocks.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::decode::decompress_block;
use crate::encode::{compress_block, Block};
use crate::{cast, util, CodecError, Format, Params};

/// The size of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}
impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The number of blocks in a row of blocks.
    pub const fn blocks_x(&self) -> usize {
        util::div_ceil(self.width as usize, 4)
    }
    /// The number of rows of blocks.
    pub const fn blocks_y(&self) -> usize {
        util::div_ceil(self.height as usize, 4)
    }

    fn validate(&self) -> Result<(), CodecError> {
        if self.width == 0 || self.height == 0 {
            tracing::debug!(
                width = self.width,
                height = self.height,
                "rejected image with a zero dimension"
            );
            return Err(CodecError::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    fn too_large(&self) -> CodecError {
        CodecError::ImageTooLarge {
            width: self.width,
            height: self.height,
        }
    }

    /// The number of bytes of the uncompressed RGBA image.
    pub(crate) fn rgba_len(&self) -> Result<usize, CodecError> {
        self.validate()?;
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| self.too_large())
    }
}

/// Returns the number of bytes needed to store the compressed image.
pub(crate) fn storage_requirements(size: Size, format: Format) -> Result<usize, CodecError> {
    size.validate()?;
    size.blocks_x()
        .checked_mul(size.blocks_y())
        .and_then(|blocks| blocks.checked_mul(format.block_size()))
        .ok_or_else(|| size.too_large())
}

fn check_len(required: usize, actual: usize) -> Result<(), CodecError> {
    if actual < required {
        tracing::debug!(required, actual, "rejected buffer that is too small");
        return Err(CodecError::BufferTooSmall { required, actual });
    }
    Ok(())
}

/// Copies the block at the given block coordinates out of the image.
///
/// Pixels outside the image are filled with the closest pixel of the last
/// valid row or column, and are excluded from the returned mask.
fn read_block(pixels: &[[u8; 4]], size: Size, block_x: usize, block_y: usize) -> (Block, u16) {
    let width = size.width as usize;
    let height = size.height as usize;

    let mut block = [[0; 4]; 16];
    let mut mask = 0_u16;
    for y in 0..4 {
        let image_y = block_y * 4 + y;
        let source_y = image_y.min(height - 1);
        for x in 0..4 {
            let image_x = block_x * 4 + x;
            let source_x = image_x.min(width - 1);

            block[y * 4 + x] = pixels[source_y * width + source_x];
            if image_x < width && image_y < height {
                mask |= 1 << (y * 4 + x);
            }
        }
    }
    (block, mask)
}

/// Writes the in-bounds pixels of a block into the image.
fn write_block(pixels: &mut [[u8; 4]], size: Size, block_x: usize, block_y: usize, block: &Block) {
    let width = size.width as usize;
    let height = size.height as usize;

    for y in 0..4 {
        let image_y = block_y * 4 + y;
        if image_y >= height {
            break;
        }
        for x in 0..4 {
            let image_x = block_x * 4 + x;
            if image_x >= width {
                break;
            }
            pixels[image_y * width + image_x] = block[y * 4 + x];
        }
    }
}

/// Compresses an RGBA image into `blocks`.
pub(crate) fn compress_image(
    rgba: &[u8],
    size: Size,
    blocks: &mut [u8],
    params: &Params,
) -> Result<(), CodecError> {
    let rgba_len = size.rgba_len()?;
    let blocks_len = storage_requirements(size, params.format)?;
    check_len(rgba_len, rgba.len())?;
    check_len(blocks_len, blocks.len())?;

    tracing::debug!(
        width = size.width,
        height = size.height,
        format = ?params.format,
        fit = ?params.fit,
        "compressing image"
    );

    let pixels = cast::as_pixels(&rgba[..rgba_len]);
    let blocks = &mut blocks[..blocks_len];
    let block_size = params.format.block_size();
    let row_len = size.blocks_x() * block_size;

    let compress_row = |(block_y, row): (usize, &mut [u8])| -> Result<(), CodecError> {
        for (block_x, output) in row.chunks_exact_mut(block_size).enumerate() {
            let (block, mask) = read_block(pixels, size, block_x, block_y);
            compress_block(&block, mask, params, output)?;
        }
        Ok(())
    };

    #[cfg(feature = "rayon")]
    {
        if params.parallel {
            return blocks
                .par_chunks_mut(row_len)
                .enumerate()
                .try_for_each(compress_row);
        }
    }

    blocks
        .chunks_mut(row_len)
        .enumerate()
        .try_for_each(compress_row)
}

/// Decompresses `blocks` into an RGBA image.
pub(crate) fn decompress_image(
    rgba: &mut [u8],
    size: Size,
    blocks: &[u8],
    params: &Params,
) -> Result<(), CodecError> {
    let rgba_len = size.rgba_len()?;
    let blocks_len = storage_requirements(size, params.format)?;
    check_len(rgba_len, rgba.len())?;
    check_len(blocks_len, blocks.len())?;

    tracing::debug!(
        width = size.width,
        height = size.height,
        format = ?params.format,
        "decompressing image"
    );

    let format = params.format;
    let block_size = format.block_size();
    let blocks = &blocks[..blocks_len];
    let row_len = size.blocks_x() * block_size;
    // each row of blocks covers 4 rows of pixels, except maybe the last
    let row_pixels = size.width as usize * 4;
    let pixels = cast::as_pixels_mut(&mut rgba[..rgba_len]);

    let decompress_row = |(row, pixels): (&[u8], &mut [[u8; 4]])| {
        let rows = pixels.len() / size.width as usize;
        let row_size = Size::new(size.width, rows as u32);
        for (block_x, block) in row.chunks_exact(block_size).enumerate() {
            let block = decompress_block(block, format);
            write_block(pixels, row_size, block_x, 0, &block);
        }
    };

    #[cfg(feature = "rayon")]
    {
        if params.parallel {
            blocks
                .par_chunks(row_len)
                .zip(pixels.par_chunks_mut(row_pixels))
                .for_each(decompress_row);
            return Ok(());
        }
    }

    blocks
        .chunks(row_len)
        .zip(pixels.chunks_mut(row_pixels))
        .for_each(decompress_row);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage() {
        let bc1 = Format::Bc1;
        let bc3 = Format::Bc3;
        assert_eq!(storage_requirements(Size::new(4, 4), bc1), Ok(8));
        // 2x2 blocks
        assert_eq!(storage_requirements(Size::new(5, 5), bc1), Ok(32));
        assert_eq!(storage_requirements(Size::new(1, 1), bc1), Ok(8));
        assert_eq!(storage_requirements(Size::new(4, 4), bc3), Ok(16));
        assert_eq!(storage_requirements(Size::new(8, 3), Format::Bc2), Ok(32));

        assert_eq!(
            storage_requirements(Size::new(0, 4), bc1),
            Err(CodecError::InvalidDimension {
                width: 0,
                height: 4
            })
        );
    }

    #[test]
    fn edge_blocks_replicate_the_border() {
        // 5x2 image, pixel value = index
        let pixels: Vec<[u8; 4]> = (0..10).map(|i| [i, 0, 0, 255]).collect();
        let size = Size::new(5, 2);

        let (block, mask) = read_block(&pixels, size, 1, 0);
        let reds: Vec<u8> = block.iter().map(|p| p[0]).collect();
        assert_eq!(reds, [4, 4, 4, 4, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9]);
        assert_eq!(mask, 0b0001_0001);

        let (_, mask) = read_block(&pixels, size, 0, 0);
        assert_eq!(mask, 0x00FF);
    }

    #[test]
    fn write_only_in_bounds() {
        let size = Size::new(5, 2);
        let mut pixels = vec![[0; 4]; 10];
        write_block(&mut pixels, size, 1, 0, &[[7; 4]; 16]);
        for (i, p) in pixels.iter().enumerate() {
            let expected = if i == 4 || i == 9 { 7 } else { 0 };
            assert_eq!(p[0], expected, "{i}");
        }
    }
}
