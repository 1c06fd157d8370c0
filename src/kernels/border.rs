//! Coordinate mapping for neighborhood reads that fall outside the grid.
//!
//! Convolution mirrors about the edge sample; resampling saturates at the edge.

/// How an out-of-range coordinate is brought back into `[0, len)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderPolicy {
    /// Mirror about the edge sample without repeating it: `-d -> d`, `last + d -> last - d`.
    Reflect,
    /// Saturate at the nearest edge.
    Clamp,
}

impl BorderPolicy {
    /// Map `i` into `[0, len)`. `len` must be non-zero.
    #[inline]
    pub fn map(self, i: isize, len: usize) -> usize {
        match self {
            Self::Reflect => reflect(i, len),
            Self::Clamp => clamp(i, len),
        }
    }
}

/// Reflect `i` into `[0, len)`.
///
/// A single reflection covers offsets up to `len - 1` beyond either edge; wider kernels keep
/// folding with period `2 * len - 2`.
#[inline]
pub fn reflect(i: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    if (0..=last).contains(&i) {
        return i as usize;
    }
    let period = 2 * last;
    let r = i.rem_euclid(period);
    if r <= last { r as usize } else { (period - r) as usize }
}

/// Clamp `i` into `[0, len)`.
#[inline]
pub fn clamp(i: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    i.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
#[path = "../../tests/unit/kernels/border.rs"]
mod tests;
