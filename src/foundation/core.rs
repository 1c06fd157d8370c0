/// One intensity value. Legal samples lie in `[0, depth]` of their buffer.
pub type Sample = i32;

/// Largest depth the engine accepts (16-bit PGM maxval).
pub const MAX_DEPTH: Sample = 65_535;

/// Running `(min, max)` over observed samples.
///
/// Workers each build one of these over their partition and return it by value; the caller
/// folds them with [`MinMax::merge`]. The empty statistic for a buffer of depth `d` starts at
/// `(d, 0)` so the first observation always widens it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinMax {
    /// Smallest observed sample.
    pub min: Sample,
    /// Largest observed sample.
    pub max: Sample,
}

impl MinMax {
    /// Empty statistic for a buffer of the given depth.
    pub fn empty(depth: Sample) -> Self {
        Self { min: depth, max: 0 }
    }

    /// Widen the bounds to include `v`.
    #[inline]
    pub fn observe(&mut self, v: Sample) {
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
    }

    /// Combine two partial statistics.
    pub fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Statistic over a whole slice.
    pub fn of(depth: Sample, samples: &[Sample]) -> Self {
        samples.iter().fold(Self::empty(depth), |mut acc, &v| {
            acc.observe(v);
            acc
        })
    }
}

/// Clamp a wide intermediate into `[0, depth]`.
#[inline]
pub fn clamp_wide(v: i64, depth: Sample) -> Sample {
    v.clamp(0, i64::from(depth)) as Sample
}

/// Clamp a floating intermediate into `[0, depth]` and truncate.
///
/// NaN maps to 0.
#[inline]
pub fn clamp_float(v: f64, depth: Sample) -> Sample {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, f64::from(depth)) as Sample
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
