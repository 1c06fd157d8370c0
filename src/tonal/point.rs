//! Tonal remapping functions applied independently to each sample.
//!
//! Every function is pure. Results may fall outside `[0, depth]`; the transform that applies
//! them clamps before storing.

use serde::{Deserialize, Serialize};

use crate::foundation::core::Sample;

/// Shift every sample by `delta`, saturating at the `Sample` range.
pub fn brightness(v: Sample, delta: Sample) -> Sample {
    v.saturating_add(delta)
}

/// Scale samples below `low` by `low_pct` and above `high` by `high_pct`.
pub fn simple_contrast(
    v: Sample,
    low: Sample,
    high: Sample,
    low_pct: f64,
    high_pct: f64,
) -> Sample {
    if v < low {
        return (f64::from(v) * low_pct) as Sample;
    }
    if v > high {
        return (f64::from(v) * high_pct) as Sample;
    }
    v
}

/// Map `[f_min, f_max]` linearly onto `[g_min, g_max]`.
///
/// A degenerate source range (`f_min == f_max`) maps everything to `g_min`.
pub fn linear_stretch(
    v: Sample,
    f_min: Sample,
    f_max: Sample,
    g_min: Sample,
    g_max: Sample,
) -> Sample {
    if f_max == f_min {
        return g_min;
    }
    // Differences of arbitrary targets can exceed i32.
    let a = (f64::from(g_max) - f64::from(g_min)) / (f64::from(f_max) - f64::from(f_min));
    (a * (f64::from(v) - f64::from(f_min)) + f64::from(g_min)) as Sample
}

/// `c * log2(v + 1)`.
pub fn logarithmic(v: Sample, c: f64) -> Sample {
    (c * (f64::from(v) + 1.0).log2()) as Sample
}

/// `a * v^gamma`.
pub fn gamma(v: Sample, a: f64, gamma: f64) -> Sample {
    (a * f64::from(v).powf(gamma)) as Sample
}

/// `e^(a * v) - 1`.
pub fn exponential(v: Sample, a: f64) -> Sample {
    ((a * f64::from(v)).exp() - 1.0) as Sample
}

/// Logistic curve centered at `center` (fraction of depth) with slope `rate`.
pub fn sigmoid(v: Sample, depth: f64, rate: f64, center: f64) -> Sample {
    let f = f64::from(v) / depth;
    (depth / (1.0 + (-rate * (f - center)).exp())) as Sample
}

/// `v + v * c * logistic(v)`.
pub fn alt_sigmoid(v: Sample, c: f64) -> Sample {
    let x = f64::from(v);
    (x + x * c * (1.0 / (1.0 + (-x).exp()))) as Sample
}

/// `depth - v`.
pub fn negative(v: Sample, depth: Sample) -> Sample {
    depth - v
}

/// `depth` above a quarter of the range, otherwise 0.
pub fn black_and_white(v: Sample, depth: Sample) -> Sample {
    if v > depth / 4 { depth } else { 0 }
}

/// Look `v` up in a cumulative equalization table and scale to `depth`.
///
/// Samples beyond the table map to `depth`.
pub fn equalize(v: Sample, table: &[f64], depth: Sample) -> Sample {
    let t = usize::try_from(v)
        .ok()
        .and_then(|i| table.get(i).copied())
        .unwrap_or(1.0);
    (f64::from(depth) * t) as Sample
}

/// Scale constant for [`logarithmic`] that maps `depth` onto itself.
pub fn log_scale(depth: Sample) -> f64 {
    f64::from(depth) / f64::from(depth + 1).log2()
}

/// Rate for [`exponential`] that maps `depth` onto itself.
pub fn exp_scale(depth: Sample) -> f64 {
    f64::from(depth + 1).ln() / f64::from(depth)
}

/// Serializable point transform.
///
/// Parameters that depend on the image (depth, observed range) are resolved by
/// [`PointOp::resolve`] against the buffer it will be applied to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fn", rename_all = "snake_case")]
pub enum PointOp {
    /// See [`brightness`].
    Brightness {
        /// Additive offset.
        delta: Sample,
    },
    /// See [`simple_contrast`].
    Contrast {
        /// Lower threshold.
        low: Sample,
        /// Upper threshold.
        high: Sample,
        /// Multiplier below `low`.
        low_pct: f64,
        /// Multiplier above `high`.
        high_pct: f64,
    },
    /// Stretch the observed range onto `[target_min, target_max]`.
    Stretch {
        /// Target minimum.
        target_min: Sample,
        /// Target maximum.
        target_max: Sample,
    },
    /// Logarithmic curve scaled so `depth` maps to `depth`.
    Log,
    /// See [`gamma`].
    Gamma {
        /// Multiplier.
        a: f64,
        /// Exponent.
        gamma: f64,
    },
    /// Exponential curve scaled so `depth` maps to `depth`.
    Exp,
    /// See [`sigmoid`]; `depth` comes from the buffer.
    Sigmoid {
        /// Slope.
        rate: f64,
        /// Center as a fraction of depth.
        center: f64,
    },
    /// See [`alt_sigmoid`].
    AltSigmoid {
        /// Gain.
        c: f64,
    },
    /// See [`negative`].
    Negative,
    /// See [`black_and_white`].
    BlackAndWhite,
    /// Histogram equalization through a cumulative table.
    Equalize {
        /// Cumulative normalized histogram indexed by sample value.
        table: Vec<f64>,
    },
}

/// A [`PointOp`] bound to a buffer's depth and observed range.
#[derive(Clone, Debug)]
pub struct ResolvedPoint {
    op: PointOp,
    depth: Sample,
    observed_min: Sample,
    observed_max: Sample,
}

impl PointOp {
    /// Bind image-dependent parameters.
    pub fn resolve(
        self,
        depth: Sample,
        observed_min: Sample,
        observed_max: Sample,
    ) -> ResolvedPoint {
        ResolvedPoint {
            op: self,
            depth,
            observed_min,
            observed_max,
        }
    }
}

impl ResolvedPoint {
    /// Apply to one sample (unclamped).
    pub fn apply(&self, v: Sample) -> Sample {
        let depth = self.depth;
        match &self.op {
            PointOp::Brightness { delta } => brightness(v, *delta),
            PointOp::Contrast {
                low,
                high,
                low_pct,
                high_pct,
            } => simple_contrast(v, *low, *high, *low_pct, *high_pct),
            PointOp::Stretch {
                target_min,
                target_max,
            } => linear_stretch(
                v,
                self.observed_min,
                self.observed_max,
                *target_min,
                *target_max,
            ),
            PointOp::Log => logarithmic(v, log_scale(depth)),
            PointOp::Gamma { a, gamma: g } => gamma(v, *a, *g),
            PointOp::Exp => exponential(v, exp_scale(depth)),
            PointOp::Sigmoid { rate, center } => sigmoid(v, f64::from(depth), *rate, *center),
            PointOp::AltSigmoid { c } => alt_sigmoid(v, *c),
            PointOp::Negative => negative(v, depth),
            PointOp::BlackAndWhite => black_and_white(v, depth),
            PointOp::Equalize { table } => equalize(v, table, depth),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tonal/point.rs"]
mod tests;
