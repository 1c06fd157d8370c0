use super::*;

fn quad() -> PixelBuffer {
    PixelBuffer::from_grid(255, &[vec![10, 20], vec![30, 40]]).unwrap()
}

fn gradient(rows: usize, columns: usize) -> PixelBuffer {
    let samples = (0..rows)
        .flat_map(|r| (0..columns).map(move |c| ((r * 7 + c * 13) % 256) as i32))
        .collect();
    PixelBuffer::from_samples(rows, columns, 255, samples).unwrap()
}

fn resize_with(filter: ResampleFilter, src: &PixelBuffer, w: usize, h: usize) -> Vec<Sample> {
    let ratios = ScaleRatios::for_resize(src, w, h);
    let mut out = Vec::with_capacity(w * h);
    for r in 0..h {
        for c in 0..w {
            out.push(filter.sample(src, r, c, ratios));
        }
    }
    out
}

#[test]
fn unit_ratio_is_identity_for_nearest_and_bilinear() {
    let src = gradient(6, 5);
    for filter in [ResampleFilter::Nearest, ResampleFilter::Bilinear] {
        assert_eq!(
            resize_with(filter, &src, 5, 6),
            src.export_samples(),
            "{filter:?}"
        );
    }
}

#[test]
fn doubling_a_row_follows_each_filter_mapping() {
    let src = PixelBuffer::from_grid(255, &[vec![10, 20]]).unwrap();
    // Bilinear samples at col * 0.5; the right edge saturates.
    assert_eq!(
        resize_with(ResampleFilter::Bilinear, &src, 4, 1),
        vec![10, 15, 20, 20]
    );
    // Bicubic and Lanczos-2 sample at col * 0.5 - 0.5, so column 0 undershoots to 9.375.
    assert_eq!(
        resize_with(ResampleFilter::Bicubic, &src, 4, 1),
        vec![9, 10, 15, 20]
    );
    assert_eq!(
        resize_with(ResampleFilter::Lanczos2, &src, 4, 1),
        vec![9, 10, 15, 20]
    );
}

#[test]
fn lanczos_doubling_a_quad() {
    let out = resize_with(ResampleFilter::Lanczos2, &quad(), 4, 4);
    assert_eq!(
        out,
        vec![
            8, 8, 13, 18, //
            9, 10, 15, 20, //
            19, 20, 25, 30, //
            29, 30, 35, 40,
        ]
    );
}

#[test]
fn nearest_upscale_replicates_blocks() {
    let out = resize_with(ResampleFilter::Nearest, &quad(), 4, 4);
    assert_eq!(
        out,
        vec![
            10, 10, 20, 20, //
            10, 10, 20, 20, //
            30, 30, 40, 40, //
            30, 30, 40, 40,
        ]
    );
}

#[test]
fn bilinear_upscale_blends_then_saturates() {
    let out = resize_with(ResampleFilter::Bilinear, &quad(), 4, 4);
    assert_eq!(
        out,
        vec![
            10, 15, 20, 20, //
            20, 25, 30, 30, //
            30, 35, 40, 40, //
            30, 35, 40, 40,
        ]
    );
}

#[test]
fn range_checked_clamps_signed_coordinates() {
    let src = quad();
    assert_eq!(range_checked(&src, -1, -1), 10);
    assert_eq!(range_checked(&src, -5, 9), 20);
    assert_eq!(range_checked(&src, 3, -2), 30);
    assert_eq!(range_checked(&src, 2, 2), 40);
}

#[test]
fn cubic_hermite_hits_inner_control_points() {
    assert_eq!(cubic_hermite(1.0, 2.0, 3.0, 4.0, 0.0), 2.0);
    assert!((cubic_hermite(1.0, 2.0, 3.0, 4.0, 1.0) - 3.0).abs() < 1e-12);
    // Linear data stays linear.
    assert!((cubic_hermite(1.0, 2.0, 3.0, 4.0, 0.5) - 2.5).abs() < 1e-12);
}

#[test]
fn lanczos_window_shape() {
    assert_eq!(lanczos(0.0), 1.0);
    assert_eq!(lanczos(2.0), 0.0);
    assert_eq!(lanczos(-2.5), 0.0);
    assert!(lanczos(1.0).abs() < 1e-12);
    assert!(lanczos(0.5) > 0.0);
    assert!(lanczos(1.5) < 0.0);
}

#[test]
fn lanczos_weights_are_normalized() {
    for t in [0.0, 0.25, 0.5, 0.9] {
        let sum: f64 = lanczos_weights(t).iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "t = {t}");
    }
}

#[test]
fn uniform_source_stays_uniform_under_every_filter() {
    let src = PixelBuffer::filled(3, 3, 255, 77).unwrap();
    for filter in [
        ResampleFilter::Bilinear,
        ResampleFilter::Bicubic,
        ResampleFilter::Lanczos2,
    ] {
        let out = resize_with(filter, &src, 7, 5);
        assert!(out.iter().all(|&v| v == 77), "{filter:?}: {out:?}");
    }
}

#[test]
fn overshoot_is_clamped_to_depth() {
    let src = PixelBuffer::from_grid(255, &[vec![0, 0, 255, 255, 0, 0]]).unwrap();
    for filter in [ResampleFilter::Bicubic, ResampleFilter::Lanczos2] {
        let out = resize_with(filter, &src, 17, 1);
        assert!(out.iter().all(|&v| (0..=255).contains(&v)), "{filter:?}");
    }
}
