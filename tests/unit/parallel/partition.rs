use super::*;
use crate::buffer::pixel::PixelBuffer;
use crate::kernels::frame::FrameOp;

fn assert_covers(rows: usize, parts: &[Range<usize>]) {
    let mut next = 0;
    for p in parts {
        assert_eq!(p.start, next, "partitions must be contiguous for rows={rows}");
        assert!(p.start <= p.end);
        next = p.end;
    }
    assert_eq!(next, rows, "partitions must cover all rows");
}

#[test]
fn four_way_partitions_cover_rows_exactly_once() {
    for rows in [0, 1, 3, 4, 7, 256, 257] {
        let parts = partition_rows(rows, DEFAULT_WORKERS);
        assert_eq!(parts.len(), 4);
        assert_covers(rows, &parts);
        let total: usize = parts.iter().map(|p| p.len()).sum();
        assert_eq!(total, rows);
    }
}

#[test]
fn four_way_split_matches_midpoint_quartiles() {
    for rows in 0..300usize {
        let mid = rows / 2;
        let q1 = mid / 2;
        let q3 = mid + (rows - mid) / 2;
        assert_eq!(
            partition_rows(rows, 4),
            vec![0..q1, q1..mid, mid..q3, q3..rows],
            "rows = {rows}"
        );
    }
}

#[test]
fn other_worker_counts_stay_balanced() {
    for workers in [1, 2, 3, 5, 8] {
        for rows in [0, 1, 10, 99] {
            let parts = partition_rows(rows, workers);
            assert_eq!(parts.len(), workers);
            assert_covers(rows, &parts);
            let (lo, hi) = parts
                .iter()
                .fold((usize::MAX, 0), |(lo, hi), p| (lo.min(p.len()), hi.max(p.len())));
            assert!(hi - lo <= 1, "workers={workers} rows={rows}");
        }
    }
}

#[test]
fn zero_workers_degrades_to_one_partition() {
    assert_eq!(partition_rows(5, 0), vec![0..5]);
}

#[test]
fn invalid_worker_counts_are_rejected() {
    assert!(Partitioner::new(0).is_err());
    assert!(Partitioner::new(MAX_WORKERS + 1).is_err());
    assert_eq!(Partitioner::new(3).unwrap().workers(), 3);
}

#[test]
fn run_fills_every_row_and_folds_stats() {
    let src = PixelBuffer::from_samples(7, 3, 255, (0..21).collect()).unwrap();
    let kernel = Kernel::Frame {
        src: &src,
        other: &src,
        op: FrameOp::Identity,
    };
    let (grid, stats) = Partitioner::new(4).unwrap().run(&kernel, 7, 3);
    assert_eq!(grid, (0..21).collect::<Vec<_>>());
    assert_eq!(stats, MinMax { min: 0, max: 20 });
}

#[test]
fn run_with_fewer_rows_than_workers_is_a_no_op_for_empty_partitions() {
    let src = PixelBuffer::from_samples(1, 2, 255, vec![5, 6]).unwrap();
    let kernel = Kernel::Frame {
        src: &src,
        other: &src,
        op: FrameOp::Add,
    };
    let (grid, stats) = Partitioner::new(4).unwrap().run(&kernel, 1, 2);
    assert_eq!(grid, vec![10, 12]);
    assert_eq!(stats, MinMax { min: 10, max: 12 });
}

#[test]
fn run_on_empty_grid_returns_empty_stats() {
    let src = PixelBuffer::from_samples(0, 0, 255, vec![]).unwrap();
    let kernel = Kernel::Frame {
        src: &src,
        other: &src,
        op: FrameOp::Identity,
    };
    let (grid, stats) = Partitioner::new(4).unwrap().run(&kernel, 0, 0);
    assert!(grid.is_empty());
    assert_eq!(stats, MinMax::empty(255));
}

#[test]
fn output_is_independent_of_worker_count() {
    let src = PixelBuffer::from_samples(
        33,
        9,
        255,
        (0..33 * 9).map(|v| (v * 31 % 256) as i32).collect(),
    )
    .unwrap();
    let f = |v: Sample| 255 - v;
    let kernel = Kernel::Point { src: &src, f: &f };
    let (reference, ref_stats) = Partitioner::new(1).unwrap().run(&kernel, 33, 9);
    for workers in [2, 4, 7] {
        let (grid, stats) = Partitioner::new(workers).unwrap().run(&kernel, 33, 9);
        assert_eq!(grid, reference);
        assert_eq!(stats, ref_stats);
    }
}
