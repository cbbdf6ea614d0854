use bitflags::bitflags;

use crate::CodecError;

bitflags! {
    /// Flags selecting the block format and how blocks are compressed.
    ///
    /// The bit values are compatible with the flag words of squish-style C
    /// APIs, so flags received over such an interface can be used as-is via
    /// [`Flags::from_bits_truncate`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// BC1 (DXT1): 8 bytes per block, color with optional 1-bit alpha.
        const BC1 = 1 << 0;
        /// BC2 (DXT3): 16 bytes per block, color with explicit 4-bit alpha.
        const BC2 = 1 << 1;
        /// BC3 (DXT5): 16 bytes per block, color with interpolated alpha.
        const BC3 = 1 << 2;

        /// Least-squares fit over all orderings of the colors along the
        /// principal axis. This is the default.
        const CLUSTER_FIT = 1 << 3;
        /// Fast fit using the extremes along the principal axis.
        const RANGE_FIT = 1 << 4;
        /// Cluster fit that re-orders the colors along the axis of the best
        /// endpoints and repeats. Slowest, highest quality.
        const ITERATIVE_CLUSTER_FIT = 1 << 8;

        /// Weigh color channels by their perceived luminance. This is the
        /// default.
        const METRIC_PERCEPTUAL = 1 << 5;
        /// Weigh all color channels equally.
        const METRIC_UNIFORM = 1 << 6;

        /// Weigh the color error of each pixel by its alpha value.
        ///
        /// This improves the perceived quality of images rendered with alpha
        /// blending, e.g. premultiplied alpha content.
        const WEIGHT_COLOR_BY_ALPHA = 1 << 7;

        const DXT1 = Self::BC1.bits();
        const DXT3 = Self::BC2.bits();
        const DXT5 = Self::BC3.bits();
    }
}

/// A block compression format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Bc1,
    Bc2,
    Bc3,
}
impl Format {
    /// The number of bytes one 4x4 block of pixels compresses into.
    pub const fn block_size(self) -> usize {
        match self {
            Format::Bc1 => 8,
            Format::Bc2 | Format::Bc3 => 16,
        }
    }

    /// Returns the format selected by the given flags.
    ///
    /// Exactly one format flag must be set.
    pub fn from_flags(flags: Flags) -> Result<Self, CodecError> {
        let formats = flags & (Flags::BC1 | Flags::BC2 | Flags::BC3);
        if formats == Flags::BC1 {
            Ok(Format::Bc1)
        } else if formats == Flags::BC2 {
            Ok(Format::Bc2)
        } else if formats == Flags::BC3 {
            Ok(Format::Bc3)
        } else {
            tracing::debug!(flags = flags.bits(), "rejected flags without a unique format");
            Err(CodecError::InvalidFormat(flags))
        }
    }

    pub const fn to_flags(self) -> Flags {
        match self {
            Format::Bc1 => Flags::BC1,
            Format::Bc2 => Flags::BC2,
            Format::Bc3 => Flags::BC3,
        }
    }
}

/// The algorithm used to find the endpoints of the color block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FitMethod {
    /// Fast, low quality.
    RangeFit,
    /// Slow, high quality.
    #[default]
    ClusterFit,
    /// Very slow, very high quality.
    IterativeClusterFit,
}
impl FitMethod {
    /// Resolves the fit method bits of the given flags.
    ///
    /// Iterative cluster fit takes precedence over range fit, and range fit
    /// over cluster fit. No fit bit selects cluster fit.
    pub fn from_flags(flags: Flags) -> Self {
        if flags.contains(Flags::ITERATIVE_CLUSTER_FIT) {
            FitMethod::IterativeClusterFit
        } else if flags.contains(Flags::RANGE_FIT) {
            FitMethod::RangeFit
        } else {
            FitMethod::ClusterFit
        }
    }
}

/// Per-channel RGB weights of the color error metric.
pub type Weights = [f32; 3];

/// Equal weights for each color channel.
pub const WEIGHTS_UNIFORM: Weights = [1.0, 1.0, 1.0];
/// Weights based on the perceived luminance of each color channel.
pub const WEIGHTS_PERCEPTUAL: Weights = [0.2126, 0.7152, 0.0722];

/// The complete set of options for compressing and decompressing blocks.
///
/// `Params` can be created from [`Flags`] or built directly. Custom channel
/// weights that no flag can express are set with [`Params::with_weights`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub format: Format,
    pub fit: FitMethod,
    /// Channel weights of the color error metric.
    ///
    /// Defaults to [`WEIGHTS_PERCEPTUAL`].
    pub weights: Weights,
    /// Whether the color error of each pixel is weighted by its alpha.
    ///
    /// Defaults to `false`.
    pub weigh_color_by_alpha: bool,
    /// Whether image-level calls compress and decompress block rows in
    /// parallel using rayon.
    ///
    /// Only has an effect if the `rayon` feature is enabled. The output is
    /// the same either way.
    ///
    /// Defaults to `true`.
    pub parallel: bool,
}
impl Params {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            fit: FitMethod::default(),
            weights: WEIGHTS_PERCEPTUAL,
            weigh_color_by_alpha: false,
            parallel: true,
        }
    }

    /// Resolves the given flags.
    ///
    /// Fails if the flags do not select exactly one format. All other bits
    /// are resolved permissively: see [`FitMethod::from_flags`]. The uniform
    /// metric is only used if [`Flags::METRIC_PERCEPTUAL`] is not set.
    pub fn from_flags(flags: Flags) -> Result<Self, CodecError> {
        let format = Format::from_flags(flags)?;
        let weights = if flags.contains(Flags::METRIC_UNIFORM)
            && !flags.contains(Flags::METRIC_PERCEPTUAL)
        {
            WEIGHTS_UNIFORM
        } else {
            WEIGHTS_PERCEPTUAL
        };

        Ok(Self {
            format,
            fit: FitMethod::from_flags(flags),
            weights,
            weigh_color_by_alpha: flags.contains(Flags::WEIGHT_COLOR_BY_ALPHA),
            parallel: true,
        })
    }

    pub fn with_fit(mut self, fit: FitMethod) -> Self {
        self.fit = fit;
        self
    }
    /// Replaces the channel weights of the color error metric.
    ///
    /// Weights are relative. They do not need to sum to 1.
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }
    pub fn with_color_weighted_by_alpha(mut self, weigh_color_by_alpha: bool) -> Self {
        self.weigh_color_by_alpha = weigh_color_by_alpha;
        self
    }
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
impl From<Format> for Params {
    fn from(format: Format) -> Self {
        Self::new(format)
    }
}
