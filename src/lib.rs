//! graymap is a single-channel raster processing engine.
//!
//! Images are grids of integer samples bounded by a declared depth (`maxval`). Every transform
//! runs on a [`Processor`], which owns a small dedicated worker pool and splits destination rows
//! into contiguous partitions, one per worker.
//!
//! # Transforms
//!
//! - **Point**: per-sample tonal remapping ([`PointOp`], or any closure).
//! - **Mask**: neighborhood convolution with reflected borders ([`Mask`], [`MaskPreset`]).
//! - **Frame**: sample-wise arithmetic between two same-shaped images ([`FrameOp`]).
//! - **Scale**: resampling with nearest, bilinear, bicubic or Lanczos-2 ([`ResampleFilter`]).
//!
//! After every transform each sample lies in `[0, depth]` and the buffer's min/max statistic is
//! exact. Results do not depend on the worker count.
//!
//! # IO
//!
//! [`Pgm`] reads and writes ASCII (`P2`) and binary (`P5`) graymaps, [`Histogram`] exports
//! distribution tables as CSV, and [`Script`] describes a JSON sequence of operations.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod analysis;
mod buffer;
mod codec;
mod foundation;
mod kernels;
mod parallel;
mod processor;
mod script;
mod tonal;

pub use analysis::histogram::Histogram;
pub use buffer::pixel::PixelBuffer;
pub use codec::pgm::{FileType, Pgm, decode as decode_pgm, encode as encode_pgm};
pub use foundation::core::{MAX_DEPTH, MinMax, Sample, clamp_float, clamp_wide};
pub use foundation::error::{GraymapError, GraymapResult};
pub use kernels::border::{BorderPolicy, reflect};
pub use kernels::frame::FrameOp;
pub use kernels::mask::{Mask, MaskPreset};
pub use kernels::resample::{
    ResampleFilter, ScaleRatios, cubic_hermite, lanczos, range_checked,
};
pub use parallel::partition::{DEFAULT_WORKERS, MAX_WORKERS, partition_rows};
pub use processor::{Processor, ProcessorOpts};
pub use script::ops::{Operation, Script, StepTiming, run_script};
pub use tonal::point::{
    PointOp, ResolvedPoint, alt_sigmoid, black_and_white, brightness, equalize, exp_scale,
    exponential, gamma, linear_stretch, log_scale, logarithmic, negative, sigmoid,
    simple_contrast,
};
