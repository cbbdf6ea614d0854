//! A BC1, BC2, and BC3 (DXT1, DXT3, and DXT5) block compression codec.
//!
//! BC1-3 compress 4x4 blocks of RGBA pixels into 8 or 16 bytes each. This
//! crate compresses and decompresses single blocks and whole images in
//! memory. Container formats (e.g. DDS) are out of scope.
//!
//! ## Usage
//!
//! The free functions take [`Flags`], which select the format and optionally
//! the fit method, the color metric, and alpha weighting:
//!
//! ```
//! use dxtc::Flags;
//!
//! let (width, height) = (7, 5);
//! let rgba = vec![128_u8; width as usize * height as usize * 4];
//! let flags = Flags::BC3 | Flags::RANGE_FIT;
//!
//! let mut blocks = vec![0; dxtc::storage_requirements(width, height, flags)?];
//! dxtc::compress_image(&rgba, width, height, &mut blocks, flags)?;
//!
//! let mut decoded = vec![0; rgba.len()];
//! dxtc::decompress_image(&mut decoded, width, height, &blocks, flags)?;
//! # Ok::<(), dxtc::CodecError>(())
//! ```
//!
//! [`Params`] offers the same operations with options that flags can't
//! express, e.g. custom channel weights.
//!
//! ## Features
//!
//! - `rayon` (default): compress and decompress the block rows of images in
//!   parallel.

#![forbid(unsafe_code)]

mod alpha;
mod block;
mod cast;
mod colorset;
mod convert;
mod decode;
mod encode;
mod error;
mod fit;
mod flags;
mod image;
mod util;

pub use error::*;
pub use flags::*;
pub use image::Size;

/// The number of bytes of an uncompressed 4x4 RGBA block.
pub const BLOCK_RGBA_LEN: usize = 64;

impl Params {
    /// Returns the number of bytes the compressed image needs.
    pub fn storage_requirements(&self, size: Size) -> Result<usize, CodecError> {
        image::storage_requirements(size, self.format)
    }

    /// Compresses a 4x4 block of RGBA pixels.
    ///
    /// Bit `i` of `mask` marks pixel `i` as valid. Invalid pixels do not
    /// influence the result. If no pixel is valid, a valid block is written
    /// nonetheless.
    ///
    /// `block` must be at least [`Format::block_size`] bytes long. Only the
    /// first [`Format::block_size`] bytes are written.
    pub fn compress_masked(
        &self,
        rgba: &[u8; BLOCK_RGBA_LEN],
        mask: u16,
        block: &mut [u8],
    ) -> Result<(), CodecError> {
        encode::compress_block(cast::as_block(rgba), mask, self, block)
    }

    /// Compresses a 4x4 block of RGBA pixels.
    ///
    /// Same as [`Params::compress_masked`] with all pixels valid.
    pub fn compress(&self, rgba: &[u8; BLOCK_RGBA_LEN], block: &mut [u8]) -> Result<(), CodecError> {
        self.compress_masked(rgba, 0xFFFF, block)
    }

    /// Decompresses a block into 4x4 RGBA pixels.
    pub fn decompress(&self, rgba: &mut [u8; BLOCK_RGBA_LEN], block: &[u8]) -> Result<(), CodecError> {
        let block_size = self.format.block_size();
        if block.len() < block_size {
            return Err(CodecError::BufferTooSmall {
                required: block_size,
                actual: block.len(),
            });
        }

        *cast::as_block_mut(rgba) = decode::decompress_block(block, self.format);
        Ok(())
    }

    /// Compresses a row-major RGBA image.
    ///
    /// Blocks are written left to right, top to bottom. Blocks that extend
    /// past the right or bottom edge are padded with the pixels of the last
    /// column and row, which do not influence the fit.
    pub fn compress_image(&self, rgba: &[u8], size: Size, blocks: &mut [u8]) -> Result<(), CodecError> {
        image::compress_image(rgba, size, blocks, self)
    }

    /// Decompresses blocks into a row-major RGBA image.
    ///
    /// Only pixels inside the image are written.
    pub fn decompress_image(&self, rgba: &mut [u8], size: Size, blocks: &[u8]) -> Result<(), CodecError> {
        image::decompress_image(rgba, size, blocks, self)
    }
}

/// Returns the number of bytes needed to store a compressed image of the
/// given size.
///
/// This is `ceil(width / 4) * ceil(height / 4)` blocks of 8 (BC1) or 16 (BC2,
/// BC3) bytes each.
pub fn storage_requirements(width: u32, height: u32, flags: Flags) -> Result<usize, CodecError> {
    Params::from_flags(flags)?.storage_requirements(Size::new(width, height))
}

/// Compresses the valid pixels of a 4x4 block. See [`Params::compress_masked`].
pub fn compress_masked(
    rgba: &[u8; BLOCK_RGBA_LEN],
    mask: u16,
    block: &mut [u8],
    flags: Flags,
) -> Result<(), CodecError> {
    Params::from_flags(flags)?.compress_masked(rgba, mask, block)
}

/// Compresses a 4x4 block. See [`Params::compress`].
pub fn compress(rgba: &[u8; BLOCK_RGBA_LEN], block: &mut [u8], flags: Flags) -> Result<(), CodecError> {
    Params::from_flags(flags)?.compress(rgba, block)
}

/// Decompresses a block. Only the format bits of `flags` are used.
pub fn decompress(rgba: &mut [u8; BLOCK_RGBA_LEN], block: &[u8], flags: Flags) -> Result<(), CodecError> {
    Params::from_flags(flags)?.decompress(rgba, block)
}

/// Compresses an image. See [`Params::compress_image`].
pub fn compress_image(
    rgba: &[u8],
    width: u32,
    height: u32,
    blocks: &mut [u8],
    flags: Flags,
) -> Result<(), CodecError> {
    Params::from_flags(flags)?.compress_image(rgba, Size::new(width, height), blocks)
}

/// Decompresses an image. See [`Params::decompress_image`].
pub fn decompress_image(
    rgba: &mut [u8],
    width: u32,
    height: u32,
    blocks: &[u8],
    flags: Flags,
) -> Result<(), CodecError> {
    Params::from_flags(flags)?.decompress_image(rgba, Size::new(width, height), blocks)
}
