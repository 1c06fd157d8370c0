use std::io::Write;
use std::path::Path;

use crate::buffer::pixel::PixelBuffer;
use crate::foundation::error::{GraymapError, GraymapResult};
use crate::tonal::point::PointOp;

/// Normalized intensity distribution of a buffer over `0..=depth`.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    bins: Vec<f64>,
    mean: f64,
    variance: f64,
}

impl Histogram {
    /// Compute the distribution of `buf`. Bins sum to 1 for a non-empty buffer.
    pub fn from_buffer(buf: &PixelBuffer) -> GraymapResult<Self> {
        buf.ensure_loaded()?;
        let mut counts = vec![0u64; buf.depth() as usize + 1];
        for &v in buf.export_samples() {
            counts[v as usize] += 1;
        }
        let total = buf.export_samples().len();
        let bins: Vec<f64> = if total == 0 {
            vec![0.0; counts.len()]
        } else {
            counts.iter().map(|&c| c as f64 / total as f64).collect()
        };

        let mean: f64 = bins.iter().enumerate().map(|(i, p)| i as f64 * p).sum();
        let variance: f64 = bins
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64 - mean).powi(2) * p)
            .sum();
        Ok(Self {
            bins,
            mean,
            variance,
        })
    }

    /// Probability of each sample value.
    pub fn bins(&self) -> &[f64] {
        &self.bins
    }

    /// Mean intensity.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Intensity variance.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Cumulative distribution, the lookup table used for equalization.
    pub fn equalization(&self) -> Vec<f64> {
        self.bins
            .iter()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .collect()
    }

    /// Point transform that equalizes the buffer this histogram was built from.
    pub fn equalize_op(&self) -> PointOp {
        PointOp::Equalize {
            table: self.equalization(),
        }
    }

    /// Write the distribution as CSV.
    pub fn write_csv<W: Write>(&self, out: W) -> GraymapResult<()> {
        write_table(out, "GS, Pixel Percent", &self.bins)
    }

    /// Write the equalization table as CSV.
    pub fn write_equalized_csv<W: Write>(&self, out: W) -> GraymapResult<()> {
        write_table(out, "GS,  Equalized Pixel Modifier", &self.equalization())
    }

    /// Save the distribution CSV to `path`.
    pub fn save_csv(&self, path: &Path) -> GraymapResult<()> {
        let f = std::fs::File::create(path).map_err(|e| GraymapError::io(path, e))?;
        self.write_csv(std::io::BufWriter::new(f))
    }

    /// Save the equalization CSV to `path`.
    pub fn save_equalized_csv(&self, path: &Path) -> GraymapResult<()> {
        let f = std::fs::File::create(path).map_err(|e| GraymapError::io(path, e))?;
        self.write_equalized_csv(std::io::BufWriter::new(f))
    }
}

fn write_table<W: Write>(mut out: W, header: &str, values: &[f64]) -> GraymapResult<()> {
    let mut emit = || -> std::io::Result<()> {
        write!(out, "{header}")?;
        for (i, v) in values.iter().enumerate() {
            write!(out, "\n{i}, {v}")?;
        }
        out.flush()
    };
    emit().map_err(|e| GraymapError::Other(anyhow::Error::new(e).context("write histogram csv")))
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/histogram.rs"]
mod tests;
