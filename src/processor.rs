use std::time::Instant;

use crate::buffer::pixel::PixelBuffer;
use crate::foundation::core::{MinMax, Sample};
use crate::foundation::error::{GraymapError, GraymapResult};
use crate::kernels::Kernel;
use crate::kernels::frame::FrameOp;
use crate::kernels::mask::Mask;
use crate::kernels::resample::{ResampleFilter, ScaleRatios};
use crate::parallel::partition::{DEFAULT_WORKERS, Partitioner};
use crate::tonal::point::PointOp;

/// Construction options for a [`Processor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessorOpts {
    /// Number of row partitions, and of pool threads. Must be within `1..=MAX_WORKERS`.
    pub workers: usize,
}

impl Default for ProcessorOpts {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Executes transforms over [`PixelBuffer`]s on a dedicated worker pool.
///
/// Every transform follows the same shape:
/// 1. validate the buffer (and any second operand) at the boundary,
/// 2. evaluate a per-sample kernel into a staging grid, one partition of rows per worker,
/// 3. fold the per-worker min/max and commit the staging grid by move.
///
/// On error nothing is committed; the buffer is left exactly as it was.
pub struct Processor {
    partitioner: Partitioner,
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("workers", &self.partitioner.workers())
            .finish_non_exhaustive()
    }
}

impl Processor {
    /// Build a processor and its thread pool.
    pub fn new(opts: ProcessorOpts) -> GraymapResult<Self> {
        Ok(Self {
            partitioner: Partitioner::new(opts.workers)?,
        })
    }

    /// Configured worker count.
    pub fn workers(&self) -> usize {
        self.partitioner.workers()
    }

    /// Apply an arbitrary unary function to every sample.
    ///
    /// Results are clamped to `[0, depth]`.
    #[tracing::instrument(skip_all, fields(rows = buf.rows(), columns = buf.columns()))]
    pub fn point<F>(&self, buf: &mut PixelBuffer, f: F) -> GraymapResult<()>
    where
        F: Fn(Sample) -> Sample + Sync,
    {
        buf.ensure_loaded()?;
        let started = Instant::now();
        let (rows, columns) = (buf.rows(), buf.columns());
        let (staging, stats) = self
            .partitioner
            .run(&Kernel::Point { src: buf, f: &f }, rows, columns);
        buf.commit(staging, rows, columns, stats);
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, "point applied");
        Ok(())
    }

    /// Apply a serializable point transform, resolved against the buffer's current statistics.
    pub fn point_op(&self, buf: &mut PixelBuffer, op: &PointOp) -> GraymapResult<()> {
        buf.ensure_loaded()?;
        let resolved = op.clone().resolve(buf.depth(), buf.min_value(), buf.max_value());
        self.point(buf, |v| resolved.apply(v))
    }

    /// Convolve with `mask`, reflecting at the borders.
    #[tracing::instrument(
        skip_all,
        fields(rows = buf.rows(), columns = buf.columns(), mask = mask.rows())
    )]
    pub fn mask(&self, buf: &mut PixelBuffer, mask: &Mask) -> GraymapResult<()> {
        buf.ensure_loaded()?;
        let started = Instant::now();
        let (rows, columns) = (buf.rows(), buf.columns());
        let (staging, stats) = self
            .partitioner
            .run(&Kernel::Mask { src: buf, mask }, rows, columns);
        buf.commit(staging, rows, columns, stats);
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, "mask applied");
        Ok(())
    }

    /// Combine `buf` with `other` sample by sample. Both must have the same shape.
    #[tracing::instrument(
        skip(self, buf, other),
        fields(rows = buf.rows(), columns = buf.columns())
    )]
    pub fn frame(
        &self,
        buf: &mut PixelBuffer,
        other: &PixelBuffer,
        op: FrameOp,
    ) -> GraymapResult<()> {
        buf.ensure_loaded()?;
        other.ensure_loaded()?;
        if !buf.same_shape(other) {
            return Err(GraymapError::validation(format!(
                "frame operands differ in shape: {}x{} vs {}x{}",
                buf.rows(),
                buf.columns(),
                other.rows(),
                other.columns()
            )));
        }
        let started = Instant::now();
        let (rows, columns) = (buf.rows(), buf.columns());
        let (staging, stats) = self.partitioner.run(
            &Kernel::Frame {
                src: buf,
                other,
                op,
            },
            rows,
            columns,
        );
        buf.commit(staging, rows, columns, stats);
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, "frame combined");
        Ok(())
    }

    /// Resample to `new_width x new_height` with `filter`.
    ///
    /// A zero target dimension yields an empty grid. An empty source can only be scaled to an
    /// empty target.
    #[tracing::instrument(skip(self, buf), fields(rows = buf.rows(), columns = buf.columns()))]
    pub fn scale(
        &self,
        buf: &mut PixelBuffer,
        new_width: usize,
        new_height: usize,
        filter: ResampleFilter,
    ) -> GraymapResult<()> {
        buf.ensure_loaded()?;
        let started = Instant::now();
        if new_width == 0 || new_height == 0 {
            buf.commit(Vec::new(), new_height, new_width, MinMax::empty(buf.depth()));
            return Ok(());
        }
        if buf.rows() == 0 || buf.columns() == 0 {
            return Err(GraymapError::validation(format!(
                "cannot scale an empty {}x{} buffer to {new_width}x{new_height}",
                buf.columns(),
                buf.rows()
            )));
        }
        new_width
            .checked_mul(new_height)
            .ok_or_else(|| GraymapError::validation("scaled buffer size overflow"))?;

        let ratios = ScaleRatios::for_resize(buf, new_width, new_height);
        let (staging, stats) = self.partitioner.run(
            &Kernel::Resample {
                src: buf,
                filter,
                ratios,
            },
            new_height,
            new_width,
        );
        buf.commit(staging, new_height, new_width, stats);
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, "scaled");
        Ok(())
    }

    /// Scale both dimensions by `factor`, rounding to the nearest sample.
    pub fn scale_by(
        &self,
        buf: &mut PixelBuffer,
        factor: f64,
        filter: ResampleFilter,
    ) -> GraymapResult<()> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(GraymapError::validation(format!(
                "scale factor must be finite and non-negative, got {factor}"
            )));
        }
        let new_width = (buf.columns() as f64 * factor).round() as usize;
        let new_height = (buf.rows() as f64 * factor).round() as usize;
        self.scale(buf, new_width, new_height, filter)
    }
}

#[cfg(test)]
#[path = "../tests/unit/processor.rs"]
mod tests;
