use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::analysis::histogram::Histogram;
use crate::buffer::pixel::PixelBuffer;
use crate::codec::pgm::Pgm;
use crate::foundation::error::{GraymapError, GraymapResult};
use crate::kernels::frame::FrameOp;
use crate::kernels::mask::{Mask, MaskPreset};
use crate::kernels::resample::ResampleFilter;
use crate::processor::Processor;
use crate::tonal::point::PointOp;

/// One step of a [`Script`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Tonal remap of every sample.
    Point {
        /// Function to apply.
        transform: PointOp,
    },
    /// Convolution with a preset or explicit mask.
    Mask {
        /// Named mask. Takes precedence over `weights`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preset: Option<MaskPreset>,
        /// Explicit weights, one inner vector per mask row.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weights: Option<Vec<Vec<i32>>>,
        /// Explicit divisor for `weights`; defaults to their sum.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        normalizer: Option<i64>,
    },
    /// Sample-wise combination with another graymap file.
    Frame {
        /// Second operand, resolved against the script's base directory when relative.
        other: PathBuf,
        /// Combination to apply.
        #[serde(default)]
        combine: FrameOp,
    },
    /// Resize to explicit dimensions or by a uniform factor.
    Scale {
        /// Target width; defaults to the current width when only `height` is set.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<usize>,
        /// Target height; defaults to the current height when only `width` is set.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<usize>,
        /// Uniform factor, used when neither dimension is given.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        factor: Option<f64>,
        /// Interpolation kernel.
        #[serde(default)]
        filter: ResampleFilter,
    },
    /// Histogram equalization computed from the buffer at this step.
    Equalize,
}

impl Operation {
    /// Short name used in logs and timing reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Point { .. } => "point",
            Self::Mask { .. } => "mask",
            Self::Frame { .. } => "frame",
            Self::Scale { .. } => "scale",
            Self::Equalize => "equalize",
        }
    }

    /// Parameter problem that makes this step unrunnable, if any.
    fn problem(&self) -> Option<&'static str> {
        match self {
            Self::Mask {
                preset: None,
                weights: None,
                ..
            } => Some("mask step needs either `preset` or `weights`"),
            Self::Scale {
                width: None,
                height: None,
                factor: None,
                ..
            } => Some("scale step needs `width`, `height` or `factor`"),
            _ => None,
        }
    }

    /// Run this step on `buf`. Relative frame operands are looked up under `base`.
    pub fn apply(
        &self,
        processor: &Processor,
        buf: &mut PixelBuffer,
        base: &Path,
    ) -> GraymapResult<()> {
        if let Some(msg) = self.problem() {
            return Err(GraymapError::validation(msg));
        }
        match self {
            Self::Point { transform } => processor.point_op(buf, transform),
            Self::Mask {
                preset,
                weights,
                normalizer,
            } => {
                let mask = match (preset, weights, normalizer) {
                    (Some(p), _, _) => Mask::preset(*p),
                    (None, Some(w), Some(n)) => Mask::with_normalizer(*n, w)?,
                    (None, Some(w), None) => Mask::new(w)?,
                    (None, None, _) => {
                        return Err(GraymapError::validation("mask step has no weights"));
                    }
                };
                processor.mask(buf, &mask)
            }
            Self::Frame { other, combine } => {
                let path = if other.is_absolute() {
                    other.clone()
                } else {
                    base.join(other)
                };
                let other = Pgm::load(&path)?;
                processor.frame(buf, &other.buffer, *combine)
            }
            Self::Scale {
                width,
                height,
                factor,
                filter,
            } => match (width, height, factor) {
                (None, None, Some(f)) => processor.scale_by(buf, *f, *filter),
                (w, h, _) => {
                    let new_width = w.unwrap_or(buf.columns());
                    let new_height = h.unwrap_or(buf.rows());
                    processor.scale(buf, new_width, new_height, *filter)
                }
            },
            Self::Equalize => {
                let op = Histogram::from_buffer(buf)?.equalize_op();
                processor.point_op(buf, &op)
            }
        }
    }
}

/// Ordered list of operations applied to one image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Steps, applied first to last.
    pub operations: Vec<Operation>,
}

/// Wall-clock cost of one executed step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepTiming {
    /// Position in the script.
    pub index: usize,
    /// [`Operation::name`] of the step.
    pub name: &'static str,
    /// Time spent in the step, including any file loads it performed.
    pub elapsed: Duration,
}

impl Script {
    /// Parse a JSON script.
    pub fn from_json(s: &str) -> GraymapResult<Self> {
        let script: Self = serde_json::from_str(s)
            .map_err(|e| GraymapError::serde(format!("script json parse failed: {e}")))?;
        script.validate()?;
        Ok(script)
    }

    /// Read and parse a JSON script file.
    pub fn load(path: &Path) -> GraymapResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GraymapError::io(path, e))?;
        Self::from_json(&text)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> GraymapResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GraymapError::serde(format!("script json encode failed: {e}")))
    }

    /// Check every step's parameters without touching any image.
    pub fn validate(&self) -> GraymapResult<()> {
        for (i, op) in self.operations.iter().enumerate() {
            if let Some(msg) = op.problem() {
                return Err(GraymapError::validation(format!("operation {i}: {msg}")));
            }
        }
        Ok(())
    }
}

/// Apply `script` to `buf` in order, stopping at the first failing step.
///
/// Returns one timing per executed step.
#[tracing::instrument(skip_all, fields(steps = script.operations.len()))]
pub fn run_script(
    processor: &Processor,
    buf: &mut PixelBuffer,
    script: &Script,
    base: &Path,
) -> GraymapResult<Vec<StepTiming>> {
    let mut timings = Vec::with_capacity(script.operations.len());
    for (index, op) in script.operations.iter().enumerate() {
        let started = Instant::now();
        op.apply(processor, buf, base)?;
        let elapsed = started.elapsed();
        tracing::info!(
            index,
            op = op.name(),
            elapsed_ms = elapsed.as_millis() as u64,
            "step done"
        );
        timings.push(StepTiming {
            index,
            name: op.name(),
            elapsed,
        });
    }
    Ok(timings)
}

#[cfg(test)]
#[path = "../../tests/unit/script/ops.rs"]
mod tests;
