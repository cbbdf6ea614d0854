//! An internal module for casting between types.
//!
//! This serves as a wrapper around `bytemuck` to provide panic safety. All
//! functions in this module are guaranteed to be safe and **NEVER** panic.

pub(crate) trait NonZeroSized {}
impl NonZeroSized for u8 {}
impl<const N: usize, T: NonZeroSized> NonZeroSized for [T; N] {}

pub(crate) trait Castable: bytemuck::Pod + NonZeroSized {}
impl<T: bytemuck::Pod + NonZeroSized> Castable for T {}

/// Casts a byte slice to a slice of byte arrays.
///
/// Trailing bytes that don't fill a whole `[u8; N]` are ignored.
pub(crate) fn as_arrays<const N: usize>(buffer: &[u8]) -> &[[u8; N]]
where
    [u8; N]: Castable,
{
    let len = buffer.len() / N * N;
    bytemuck::cast_slice(&buffer[..len])
}

/// Casts a mutable byte slice to a slice of byte arrays.
///
/// Trailing bytes that don't fill a whole `[u8; N]` are ignored.
pub(crate) fn as_arrays_mut<const N: usize>(buffer: &mut [u8]) -> &mut [[u8; N]]
where
    [u8; N]: Castable,
{
    let len = buffer.len() / N * N;
    bytemuck::cast_slice_mut(&mut buffer[..len])
}

/// Casts RGBA bytes to pixels.
pub(crate) fn as_pixels(buffer: &[u8]) -> &[[u8; 4]] {
    as_arrays(buffer)
}

/// Casts RGBA bytes to pixels.
pub(crate) fn as_pixels_mut(buffer: &mut [u8]) -> &mut [[u8; 4]] {
    as_arrays_mut(buffer)
}

/// Casts 64 RGBA bytes to the 16 pixels of a block.
pub(crate) fn as_block(buffer: &[u8; 64]) -> &[[u8; 4]; 16] {
    bytemuck::cast_ref(buffer)
}

/// Casts 64 RGBA bytes to the 16 pixels of a block.
pub(crate) fn as_block_mut(buffer: &mut [u8; 64]) -> &mut [[u8; 4]; 16] {
    bytemuck::cast_mut(buffer)
}
