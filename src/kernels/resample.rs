//! Destination-to-source interpolation used by scaling.
//!
//! All filters read the source through [`range_checked`], which clamps signed coordinates to the
//! image; resampling saturates at the border instead of mirroring like convolution does.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::buffer::pixel::PixelBuffer;
use crate::foundation::core::{Sample, clamp_float};
use crate::kernels::border::clamp;

const LANCZOS_LOBES: f64 = 2.0;

/// Interpolation kernel used to estimate a source value at a fractional coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Floor to the containing source sample.
    #[default]
    Nearest,
    /// 2x2 linear blend.
    Bilinear,
    /// 4x4 Catmull-Rom cubic Hermite.
    Bicubic,
    /// 4x4 two-lobe Lanczos.
    Lanczos2,
}

/// Ratios mapping destination coordinates to source space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRatios {
    /// `old_columns / new_width`.
    pub width: f64,
    /// `old_rows / new_height`.
    pub height: f64,
}

impl ScaleRatios {
    /// Ratios for resizing `src` to `new_width x new_height`.
    pub fn for_resize(src: &PixelBuffer, new_width: usize, new_height: usize) -> Self {
        Self {
            width: src.columns() as f64 / new_width as f64,
            height: src.rows() as f64 / new_height as f64,
        }
    }
}

impl ResampleFilter {
    /// Estimated sample for destination `(row, col)`, already clamped to `[0, depth]`.
    ///
    /// `src` must be non-empty.
    pub fn sample(self, src: &PixelBuffer, row: usize, col: usize, ratios: ScaleRatios) -> Sample {
        match self {
            Self::Nearest => nearest(src, row, col, ratios),
            Self::Bilinear => bilinear(src, row, col, ratios),
            Self::Bicubic => bicubic(src, row, col, ratios),
            Self::Lanczos2 => lanczos2(src, row, col, ratios),
        }
    }
}

/// Source sample at signed `(row, col)`, clamped into the image.
#[inline]
pub fn range_checked(src: &PixelBuffer, row: isize, col: isize) -> Sample {
    src.get(clamp(row, src.rows()), clamp(col, src.columns()))
}

fn nearest(src: &PixelBuffer, row: usize, col: usize, ratios: ScaleRatios) -> Sample {
    let r = (row as f64 * ratios.height).floor() as isize;
    let c = (col as f64 * ratios.width).floor() as isize;
    range_checked(src, r, c)
}

/// Source coordinate `dst * ratio - offset` split into floor index and fraction.
#[inline]
fn source_coord(dst: usize, ratio: f64, offset: f64) -> (isize, f64) {
    let f = dst as f64 * ratio - offset;
    let idx = f.floor();
    (idx as isize, f - idx)
}

/// Bilinear maps with no offset; the 4x4 filters shift by half a sample.
const NO_OFFSET: f64 = 0.0;
const HALF_SAMPLE: f64 = 0.5;

/// Snaps accumulations within `SNAP_EPS` of an integer before truncation.
const SNAP_EPS: f64 = 1e-9;

#[inline]
fn to_sample(v: f64, depth: Sample) -> Sample {
    let nearest = v.round();
    if (v - nearest).abs() < SNAP_EPS {
        clamp_float(nearest, depth)
    } else {
        clamp_float(v, depth)
    }
}

fn bilinear(src: &PixelBuffer, row: usize, col: usize, ratios: ScaleRatios) -> Sample {
    let (ci, cd) = source_coord(col, ratios.width, NO_OFFSET);
    let (ri, rd) = source_coord(row, ratios.height, NO_OFFSET);

    let a = f64::from(range_checked(src, ri, ci));
    let b = f64::from(range_checked(src, ri, ci + 1));
    let c = f64::from(range_checked(src, ri + 1, ci));
    let d = f64::from(range_checked(src, ri + 1, ci + 1));

    let v = a * (1.0 - cd) * (1.0 - rd) + b * cd * (1.0 - rd) + c * (1.0 - cd) * rd + d * cd * rd;
    to_sample(v, src.depth())
}

/// 4x4 neighborhood `[row -1..=2][col -1..=2]` around `(ri, ci)`.
fn neighborhood(src: &PixelBuffer, ri: isize, ci: isize) -> [[f64; 4]; 4] {
    let mut n = [[0.0; 4]; 4];
    for (dy, out_row) in n.iter_mut().enumerate() {
        for (dx, v) in out_row.iter_mut().enumerate() {
            *v = f64::from(range_checked(src, ri + dy as isize - 1, ci + dx as isize - 1));
        }
    }
    n
}

/// Catmull-Rom cubic through `b` (t = 0) and `c` (t = 1) with tangents from `a` and `d`.
#[inline]
pub fn cubic_hermite(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    let a1 = -a / 2.0 + (3.0 * b) / 2.0 - (3.0 * c) / 2.0 + d / 2.0;
    let b1 = a - (5.0 * b) / 2.0 + 2.0 * c - d / 2.0;
    let c1 = -a / 2.0 + c / 2.0;
    let d1 = b;
    a1 * t * t * t + b1 * t * t + c1 * t + d1
}

fn bicubic(src: &PixelBuffer, row: usize, col: usize, ratios: ScaleRatios) -> Sample {
    let (ci, cd) = source_coord(col, ratios.width, HALF_SAMPLE);
    let (ri, rd) = source_coord(row, ratios.height, HALF_SAMPLE);
    let n = neighborhood(src, ri, ci);

    let mut rows = [0.0; 4];
    for (out, r) in rows.iter_mut().zip(n.iter()) {
        *out = cubic_hermite(r[0], r[1], r[2], r[3], cd);
    }
    let v = cubic_hermite(rows[0], rows[1], rows[2], rows[3], rd);
    to_sample(v, src.depth())
}

/// `sin(x) / x` with `sinc(0) = 1`.
#[inline]
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 { 1.0 } else { x.sin() / x }
}

/// Two-lobe Lanczos window: `sinc(πx)·sinc(πx/2)` inside `|x| < 2`, zero outside.
#[inline]
pub fn lanczos(x: f64) -> f64 {
    if x.abs() >= LANCZOS_LOBES {
        return 0.0;
    }
    sinc(PI * x) * sinc(PI * x / LANCZOS_LOBES)
}

/// Weights for taps at offsets `-1, 0, 1, 2` from the floor index, normalized to sum to 1.
fn lanczos_weights(t: f64) -> [f64; 4] {
    // sin(kπ) is not exactly zero in floating point; an on-grid tap must not truncate to v-1.
    if t == 0.0 {
        return [0.0, 1.0, 0.0, 0.0];
    }
    let mut w = [0.0; 4];
    for (k, wk) in w.iter_mut().enumerate() {
        *wk = lanczos(t - (k as f64 - 1.0));
    }
    let sum: f64 = w.iter().sum();
    if sum.abs() > f64::EPSILON {
        for wk in &mut w {
            *wk /= sum;
        }
    }
    w
}

fn lanczos2(src: &PixelBuffer, row: usize, col: usize, ratios: ScaleRatios) -> Sample {
    let (ci, cd) = source_coord(col, ratios.width, HALF_SAMPLE);
    let (ri, rd) = source_coord(row, ratios.height, HALF_SAMPLE);
    let n = neighborhood(src, ri, ci);
    let wc = lanczos_weights(cd);
    let wr = lanczos_weights(rd);

    let v: f64 = n
        .iter()
        .zip(wr)
        .map(|(r, wy)| wy * r.iter().zip(wc).map(|(s, wx)| s * wx).sum::<f64>())
        .sum();
    to_sample(v, src.depth())
}

#[cfg(test)]
#[path = "../../tests/unit/kernels/resample.rs"]
mod tests;
