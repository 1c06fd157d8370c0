use serde::{Deserialize, Serialize};

use crate::buffer::pixel::PixelBuffer;
use crate::foundation::error::{GraymapError, GraymapResult};
use crate::kernels::border::reflect;

/// Weighted neighborhood evaluated around each destination sample.
///
/// The weighted sum is divided by `normalizer`, which defaults to the sum of the weights and is
/// forced to 1 when that sum is 0 (edge detectors). Out-of-range neighbors are reflected about
/// the image edge on each axis independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    weights: Vec<i32>,
    rows: usize,
    columns: usize,
    normalizer: i64,
}

impl Mask {
    /// Build a mask whose normalizer is the sum of its weights (or 1 if that sum is 0).
    pub fn new(weights: &[Vec<i32>]) -> GraymapResult<Self> {
        let (rows, columns, flat) = flatten(weights)?;
        let sum: i64 = flat.iter().map(|&w| i64::from(w)).sum();
        Ok(Self {
            weights: flat,
            rows,
            columns,
            normalizer: if sum == 0 { 1 } else { sum },
        })
    }

    /// Build a mask with an explicit normalizer. A zero normalizer is replaced with 1.
    pub fn with_normalizer(normalizer: i64, weights: &[Vec<i32>]) -> GraymapResult<Self> {
        let (rows, columns, flat) = flatten(weights)?;
        Ok(Self {
            weights: flat,
            rows,
            columns,
            normalizer: if normalizer == 0 { 1 } else { normalizer },
        })
    }

    /// Kernel height.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Kernel width.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Divisor applied to the weighted sum. Never zero.
    pub fn normalizer(&self) -> i64 {
        self.normalizer
    }

    /// Row offset of the anchor (`rows / 2`).
    pub fn center_row(&self) -> usize {
        self.rows / 2
    }

    /// Column offset of the anchor (`columns / 2`).
    pub fn center_col(&self) -> usize {
        self.columns / 2
    }

    /// Raw (unclamped) response at `(row, col)` of `src`.
    ///
    /// `src` must be non-empty.
    pub fn apply(&self, src: &PixelBuffer, row: usize, col: usize) -> i64 {
        let src_rows = src.rows();
        let src_cols = src.columns();
        let row0 = row as isize - self.center_row() as isize;
        let col0 = col as isize - self.center_col() as isize;

        let mut sum = 0i64;
        for wi in 0..self.rows {
            let sr = reflect(row0 + wi as isize, src_rows);
            let src_row = src.row(sr);
            let weights = &self.weights[wi * self.columns..(wi + 1) * self.columns];
            for (wj, &w) in weights.iter().enumerate() {
                let sc = reflect(col0 + wj as isize, src_cols);
                sum += i64::from(w) * i64::from(src_row[sc]);
            }
        }
        sum / self.normalizer
    }

    /// Look up a named preset.
    pub fn preset(preset: MaskPreset) -> Self {
        let rows: &[&[i32]] = match preset {
            MaskPreset::Smooth3x3 => &[&[0, 1, 0], &[1, 2, 1], &[0, 1, 0]],
            MaskPreset::Smooth5x5 => &[
                &[0, 1, 2, 1, 0],
                &[1, 2, 4, 2, 1],
                &[2, 4, 8, 4, 2],
                &[1, 2, 4, 2, 1],
                &[0, 1, 2, 1, 0],
            ],
            MaskPreset::Smooth9x9 => &[
                &[0, 1, 2, 4, 8, 4, 2, 1, 0],
                &[1, 2, 4, 8, 16, 8, 4, 2, 1],
                &[2, 4, 8, 16, 32, 16, 8, 4, 2],
                &[4, 8, 16, 32, 64, 32, 16, 8, 4],
                &[8, 16, 32, 64, 128, 64, 32, 16, 8],
                &[4, 8, 16, 32, 64, 32, 16, 8, 4],
                &[2, 4, 8, 16, 32, 16, 8, 4, 2],
                &[1, 2, 4, 8, 16, 8, 4, 2, 1],
                &[0, 1, 2, 4, 8, 4, 2, 1, 0],
            ],
            MaskPreset::Blur5x5 => &[
                &[1, 1, 1, 1, 1],
                &[1, 0, 0, 0, 1],
                &[1, 0, 0, 0, 1],
                &[1, 0, 0, 0, 1],
                &[1, 1, 1, 1, 1],
            ],
            MaskPreset::GaussianBlur3x3 => &[&[1, 2, 1], &[2, 4, 1], &[1, 2, 1]],
            MaskPreset::GaussianBlur3x3Symmetric => &[&[1, 2, 1], &[2, 4, 2], &[1, 2, 1]],
            MaskPreset::GaussianBlur5x5 => &[
                &[2, 4, 5, 4, 2],
                &[4, 9, 12, 9, 4],
                &[5, 12, 15, 12, 5],
                &[4, 9, 12, 9, 4],
                &[2, 4, 5, 4, 2],
            ],
            MaskPreset::HedgedLaplacian3x3 => &[&[-1, -1, -1], &[-1, 9, -1], &[-1, -1, -1]],
            MaskPreset::HedgedLaplacian5x5 => &[
                &[-1, -1, -1, -1, -1],
                &[-1, -1, -2, -1, -1],
                &[-1, -2, 29, -2, -1],
                &[-1, -1, -2, -1, -1],
                &[-1, -1, -1, -1, -1],
            ],
            MaskPreset::GaussianHedgedLaplacian5x5 => &[
                &[-1, -4, -6, -4, -1],
                &[-4, -16, -24, -16, -4],
                &[-6, -24, 476, -24, -6],
                &[-4, -16, -24, -16, -4],
                &[-1, -4, -6, -4, -1],
            ],
            MaskPreset::EdgeLaplacian3x3 => &[&[-1, -1, -1], &[-1, 8, -1], &[-1, -1, -1]],
            MaskPreset::EdgeLaplacian5x5 => &[
                &[0, 0, -1, 0, 0],
                &[0, -1, -1, -1, 0],
                &[-1, -1, 12, -1, -1],
                &[0, -1, -1, -1, 0],
                &[0, 0, -1, 0, 0],
            ],
            MaskPreset::HardEdgeLaplacian5x5 => &[
                &[0, -1, -1, -1, 0],
                &[-1, -1, -1, -1, -1],
                &[-1, -1, 20, -1, -1],
                &[-1, -1, -1, -1, -1],
                &[0, -1, -1, -1, 0],
            ],
            MaskPreset::HardEdgeLaplacian9x9 => &[
                &[0, -1, -1, -1, -1, -1, -1, -1, 0],
                &[-1, -1, -1, -1, -1, -1, -1, -1, -1],
                &[-1, -1, -1, -1, -1, -1, -1, -1, -1],
                &[-1, -1, -1, -1, -1, -1, -1, -1, -1],
                &[-1, -1, -1, -1, 76, -1, -1, -1, -1],
                &[-1, -1, -1, -1, -1, -1, -1, -1, -1],
                &[-1, -1, -1, -1, -1, -1, -1, -1, -1],
                &[-1, -1, -1, -1, -1, -1, -1, -1, -1],
                &[0, -1, -1, -1, -1, -1, -1, -1, 0],
            ],
        };
        let columns = rows[0].len();
        let weights: Vec<i32> = rows.concat();
        let sum: i64 = weights.iter().map(|&w| i64::from(w)).sum();
        Self {
            weights,
            rows: rows.len(),
            columns,
            normalizer: if sum == 0 { 1 } else { sum },
        }
    }
}

/// Built-in masks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskPreset {
    /// 3x3 center-weighted smoothing.
    Smooth3x3,
    /// 5x5 center-weighted smoothing.
    Smooth5x5,
    /// 9x9 center-weighted smoothing.
    Smooth9x9,
    /// 5x5 ring blur.
    Blur5x5,
    /// 3x3 gaussian approximation with the historical asymmetric middle row `2, 4, 1`
    /// (normalizer 15). Output leans slightly left; kept for compatibility with existing results.
    GaussianBlur3x3,
    /// 3x3 binomial gaussian `1, 2, 1` outer product (normalizer 16).
    GaussianBlur3x3Symmetric,
    /// 5x5 gaussian approximation.
    GaussianBlur5x5,
    /// 3x3 high-boost sharpen.
    HedgedLaplacian3x3,
    /// 5x5 high-boost sharpen.
    HedgedLaplacian5x5,
    /// 5x5 gaussian-weighted high-boost sharpen.
    GaussianHedgedLaplacian5x5,
    /// 3x3 zero-sum edge detector.
    EdgeLaplacian3x3,
    /// 5x5 zero-sum edge detector.
    EdgeLaplacian5x5,
    /// 5x5 zero-sum edge detector, wider support.
    HardEdgeLaplacian5x5,
    /// 9x9 zero-sum edge detector.
    HardEdgeLaplacian9x9,
}

fn flatten(weights: &[Vec<i32>]) -> GraymapResult<(usize, usize, Vec<i32>)> {
    let rows = weights.len();
    let columns = weights.first().map_or(0, Vec::len);
    if rows == 0 || columns == 0 {
        return Err(GraymapError::validation("mask must have at least one weight"));
    }
    if weights.iter().any(|r| r.len() != columns) {
        return Err(GraymapError::validation("mask rows must all have the same length"));
    }
    Ok((rows, columns, weights.concat()))
}

#[cfg(test)]
#[path = "../../tests/unit/kernels/mask.rs"]
mod tests;
