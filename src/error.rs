use crate::Flags;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// The flags select no block format or more than one.
    ///
    /// Exactly one of [`Flags::BC1`], [`Flags::BC2`], and [`Flags::BC3`] must
    /// be set.
    InvalidFormat(Flags),
    /// The width or height of an image is zero.
    InvalidDimension { width: u32, height: u32 },
    /// An input or output buffer is shorter than the operation requires.
    ///
    /// Buffers are allowed to be larger than necessary. Extra bytes are
    /// neither read nor written.
    BufferTooSmall { required: usize, actual: usize },
    /// The number of bytes needed for the image does not fit into `usize`.
    ImageTooLarge { width: u32, height: u32 },
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::InvalidFormat(flags) => {
                write!(
                    f,
                    "Flags {:#x} must select exactly one of BC1, BC2, or BC3",
                    flags.bits()
                )
            }
            CodecError::InvalidDimension { width, height } => {
                write!(
                    f,
                    "Invalid image size {}x{}, width and height must be non-zero",
                    width, height
                )
            }
            CodecError::BufferTooSmall { required, actual } => {
                write!(
                    f,
                    "Buffer too small: required at least {} bytes, got {}",
                    required, actual
                )
            }
            CodecError::ImageTooLarge { width, height } => {
                write!(f, "Image of size {}x{} is too large", width, height)
            }
        }
    }
}
impl std::error::Error for CodecError {}
