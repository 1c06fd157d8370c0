pub(crate) mod border;
pub(crate) mod frame;
pub(crate) mod mask;
pub(crate) mod resample;

use crate::buffer::pixel::PixelBuffer;
use crate::foundation::core::{Sample, clamp_wide};
use frame::FrameOp;
use mask::Mask;
use resample::{ResampleFilter, ScaleRatios};

/// Per-sample evaluation selected by transform kind.
///
/// Every variant reads only from its source buffer(s), so a kernel can be shared by all
/// partition workers. [`Kernel::eval`] returns an already-clamped sample.
pub(crate) enum Kernel<'a> {
    Point {
        src: &'a PixelBuffer,
        f: &'a (dyn Fn(Sample) -> Sample + Sync),
    },
    Mask {
        src: &'a PixelBuffer,
        mask: &'a Mask,
    },
    Frame {
        src: &'a PixelBuffer,
        other: &'a PixelBuffer,
        op: FrameOp,
    },
    Resample {
        src: &'a PixelBuffer,
        filter: ResampleFilter,
        ratios: ScaleRatios,
    },
}

impl Kernel<'_> {
    /// Depth used to clamp outputs.
    pub(crate) fn depth(&self) -> Sample {
        match self {
            Self::Point { src, .. }
            | Self::Mask { src, .. }
            | Self::Frame { src, .. }
            | Self::Resample { src, .. } => src.depth(),
        }
    }

    /// Clamped output sample for destination `(row, col)`.
    #[inline]
    pub(crate) fn eval(&self, row: usize, col: usize) -> Sample {
        match self {
            Self::Point { src, f } => clamp_wide(i64::from(f(src.get(row, col))), src.depth()),
            Self::Mask { src, mask } => clamp_wide(mask.apply(src, row, col), src.depth()),
            Self::Frame { src, other, op } => clamp_wide(
                op.combine(src.get(row, col), other.get(row, col)),
                src.depth(),
            ),
            Self::Resample {
                src,
                filter,
                ratios,
            } => filter.sample(src, row, col, *ratios),
        }
    }
}
