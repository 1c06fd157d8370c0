use std::ops::Range;

use rayon::prelude::*;

use crate::foundation::core::{MinMax, Sample};
use crate::foundation::error::{GraymapError, GraymapResult};
use crate::kernels::Kernel;

/// Default fan-out: rows are split into this many partitions.
pub const DEFAULT_WORKERS: usize = 4;

/// Upper bound accepted for [`ProcessorOpts::workers`](crate::ProcessorOpts::workers).
pub const MAX_WORKERS: usize = 64;

/// Split `rows` into `workers` contiguous, disjoint ranges covering `[0, rows)`.
///
/// Boundaries sit at `k * rows / workers`. For four workers this is the midpoint/quartile
/// split `[0, q1) [q1, mid) [mid, q3) [q3, rows)` with `mid = rows / 2`, `q1 = mid / 2`,
/// `q3 = mid + (rows - mid) / 2`. Ranges may be empty when `rows < workers`.
pub fn partition_rows(rows: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    (0..workers)
        .map(|k| (k * rows / workers)..((k + 1) * rows / workers))
        .collect()
}

/// Runs a [`Kernel`] over row partitions of a staging grid on a dedicated pool.
pub(crate) struct Partitioner {
    workers: usize,
    pool: rayon::ThreadPool,
}

impl Partitioner {
    pub(crate) fn new(workers: usize) -> GraymapResult<Self> {
        Ok(Self {
            workers,
            pool: build_thread_pool(workers)?,
        })
    }

    pub(crate) fn workers(&self) -> usize {
        self.workers
    }

    /// Evaluate `kernel` for every destination sample of a `rows x columns` grid.
    ///
    /// Blocks until every partition has finished. Each worker writes only its own rows and
    /// returns its local statistic; the statistics are folded here after the join.
    pub(crate) fn run(
        &self,
        kernel: &Kernel<'_>,
        rows: usize,
        columns: usize,
    ) -> (Vec<Sample>, MinMax) {
        let depth = kernel.depth();
        let mut staging = vec![0 as Sample; rows * columns];

        let mut parts = Vec::with_capacity(self.workers);
        let mut rest: &mut [Sample] = &mut staging;
        for range in partition_rows(rows, self.workers) {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * columns);
            parts.push((range, head));
            rest = tail;
        }

        let partials: Vec<MinMax> = self.pool.install(|| {
            parts
                .into_par_iter()
                .map(|(range, out)| fill_partition(kernel, range, columns, out))
                .collect()
        });

        let stats = partials
            .into_iter()
            .fold(MinMax::empty(depth), MinMax::merge);
        (staging, stats)
    }
}

fn fill_partition(
    kernel: &Kernel<'_>,
    range: Range<usize>,
    columns: usize,
    out: &mut [Sample],
) -> MinMax {
    let mut local = MinMax::empty(kernel.depth());
    for (i, row) in range.enumerate() {
        let dst = &mut out[i * columns..(i + 1) * columns];
        for (col, slot) in dst.iter_mut().enumerate() {
            let v = kernel.eval(row, col);
            *slot = v;
            local.observe(v);
        }
    }
    local
}

fn build_thread_pool(workers: usize) -> GraymapResult<rayon::ThreadPool> {
    if !(1..=MAX_WORKERS).contains(&workers) {
        return Err(GraymapError::validation(format!(
            "workers must be within 1..={MAX_WORKERS}, got {workers}"
        )));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("graymap-worker-{i}"))
        .build()
        .map_err(|e| GraymapError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/parallel/partition.rs"]
mod tests;
