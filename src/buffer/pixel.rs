use crate::foundation::core::{MAX_DEPTH, MinMax, Sample, clamp_wide};
use crate::foundation::error::{GraymapError, GraymapResult};

/// Single-channel raster: a row-major grid of samples bounded by `depth`.
///
/// A default-constructed buffer is *unloaded*; every transform rejects it until it has been
/// populated through [`PixelBuffer::load_into`] (or one of the constructors that call it).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    rows: usize,
    columns: usize,
    depth: Sample,
    samples: Vec<Sample>,
    stats: MinMax,
    loaded: bool,
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self {
            rows: 0,
            columns: 0,
            depth: 0,
            samples: Vec::new(),
            stats: MinMax::empty(0),
            loaded: false,
        }
    }
}

impl PixelBuffer {
    /// Build a loaded buffer from a flat row-major sample stream.
    pub fn from_samples(
        rows: usize,
        columns: usize,
        depth: Sample,
        samples: Vec<Sample>,
    ) -> GraymapResult<Self> {
        let mut buf = Self::default();
        buf.load_into(rows, columns, depth, samples)?;
        Ok(buf)
    }

    /// Build a loaded buffer from nested rows. All rows must have the same length.
    pub fn from_grid(depth: Sample, grid: &[Vec<Sample>]) -> GraymapResult<Self> {
        let rows = grid.len();
        let columns = grid.first().map_or(0, Vec::len);
        if grid.iter().any(|r| r.len() != columns) {
            return Err(GraymapError::validation("grid rows must all have the same length"));
        }
        Self::from_samples(rows, columns, depth, grid.concat())
    }

    /// Buffer of the given shape with every sample set to `value`.
    pub fn filled(
        rows: usize,
        columns: usize,
        depth: Sample,
        value: Sample,
    ) -> GraymapResult<Self> {
        let len = checked_len(rows, columns)?;
        Self::from_samples(rows, columns, depth, vec![value; len])
    }

    /// Populate this buffer from externally parsed header fields and samples.
    ///
    /// Samples must already lie in `[0, depth]`; loaders that want saturation should clamp
    /// before calling. The observed min/max are recomputed from the data.
    pub fn load_into(
        &mut self,
        rows: usize,
        columns: usize,
        depth: Sample,
        samples: Vec<Sample>,
    ) -> GraymapResult<()> {
        if !(1..=MAX_DEPTH).contains(&depth) {
            return Err(GraymapError::validation(format!(
                "depth must be within 1..={MAX_DEPTH}, got {depth}"
            )));
        }
        let len = checked_len(rows, columns)?;
        if samples.len() != len {
            return Err(GraymapError::validation(format!(
                "expected {len} samples for {rows}x{columns}, got {}",
                samples.len()
            )));
        }
        if let Some(bad) = samples.iter().find(|&&v| v < 0 || v > depth) {
            return Err(GraymapError::validation(format!(
                "sample {bad} outside [0, {depth}]"
            )));
        }

        self.stats = MinMax::of(depth, &samples);
        self.rows = rows;
        self.columns = columns;
        self.depth = depth;
        self.samples = samples;
        self.loaded = true;
        Ok(())
    }

    /// Number of rows (image height).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (image width).
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Declared maximum sample value.
    pub fn depth(&self) -> Sample {
        self.depth
    }

    /// Smallest sample observed by the last load or transform.
    pub fn min_value(&self) -> Sample {
        self.stats.min
    }

    /// Largest sample observed by the last load or transform.
    pub fn max_value(&self) -> Sample {
        self.stats.max
    }

    /// Observed `(min, max)` statistic.
    pub fn stats(&self) -> MinMax {
        self.stats
    }

    /// `true` once the buffer has been populated.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Reject an unloaded buffer before any pixel work runs.
    pub fn ensure_loaded(&self) -> GraymapResult<()> {
        if self.loaded {
            Ok(())
        } else {
            Err(GraymapError::validation("buffer has not been loaded"))
        }
    }

    /// `true` when `other` has the same `rows x columns`.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.rows == other.rows && self.columns == other.columns
    }

    /// Row-major read-only view of all samples.
    pub fn export_samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Nested copy of the grid, one `Vec` per row.
    pub fn to_grid(&self) -> Vec<Vec<Sample>> {
        if self.columns == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.samples.chunks(self.columns).map(<[_]>::to_vec).collect()
    }

    /// Samples of row `row`.
    ///
    /// Panics if `row >= rows()`.
    pub fn row(&self, row: usize) -> &[Sample] {
        let start = row * self.columns;
        &self.samples[start..start + self.columns]
    }

    /// Sample at `(row, column)`.
    ///
    /// Panics when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> Sample {
        self.samples[row * self.columns + column]
    }

    /// Saturate `v` into `[0, depth]`.
    #[inline]
    pub fn clamp(&self, v: i64) -> Sample {
        clamp_wide(v, self.depth)
    }

    /// Widen the observed bounds with one sample.
    pub fn observe(&mut self, v: Sample) {
        self.stats.observe(v);
    }

    /// Replace the grid (and dimensions) with a fully-populated staging grid.
    pub(crate) fn commit(
        &mut self,
        staging: Vec<Sample>,
        rows: usize,
        columns: usize,
        stats: MinMax,
    ) {
        debug_assert_eq!(staging.len(), rows * columns);
        self.samples = staging;
        self.rows = rows;
        self.columns = columns;
        self.stats = stats;
    }

    /// Apply `f` to every sample on the calling thread, clamping and observing each result.
    pub fn point_sequential<F>(&mut self, f: F) -> GraymapResult<()>
    where
        F: Fn(Sample) -> Sample,
    {
        self.ensure_loaded()?;
        let depth = self.depth;
        let mut stats = MinMax::empty(depth);
        for s in &mut self.samples {
            let v = clamp_wide(i64::from(f(*s)), depth);
            *s = v;
            stats.observe(v);
        }
        self.stats = stats;
        Ok(())
    }
}

fn checked_len(rows: usize, columns: usize) -> GraymapResult<usize> {
    rows.checked_mul(columns)
        .ok_or_else(|| GraymapError::validation("buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/pixel.rs"]
mod tests;
