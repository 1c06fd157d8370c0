use serde::{Deserialize, Serialize};

use crate::foundation::core::Sample;

/// Per-sample binary operation between two same-shaped buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOp {
    /// `a + b`.
    Add,
    /// `a - b`.
    Subtract,
    /// Historically computes `a - b`, not the product. Kept for output compatibility with
    /// existing processed images.
    Multiply,
    /// `a`, ignoring `b`.
    #[default]
    Identity,
}

impl FrameOp {
    /// Raw (unclamped) result for one sample pair.
    #[inline]
    pub fn combine(self, a: Sample, b: Sample) -> i64 {
        let (a, b) = (i64::from(a), i64::from(b));
        match self {
            Self::Add => a + b,
            Self::Subtract | Self::Multiply => a - b,
            Self::Identity => a,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernels/frame.rs"]
mod tests;
