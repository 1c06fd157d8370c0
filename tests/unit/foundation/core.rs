use super::*;

#[test]
fn empty_statistic_is_widened_by_first_sample() {
    let mut mm = MinMax::empty(255);
    mm.observe(17);
    assert_eq!(mm, MinMax { min: 17, max: 17 });
}

#[test]
fn merge_is_order_independent() {
    let a = MinMax::of(255, &[3, 90, 12]);
    let b = MinMax::of(255, &[40, 200]);
    let c = MinMax::empty(255);
    assert_eq!(a.merge(b).merge(c), c.merge(b).merge(a));
    assert_eq!(a.merge(b), MinMax { min: 3, max: 200 });
}

#[test]
fn merging_with_empty_keeps_bounds() {
    let a = MinMax::of(255, &[9, 11]);
    assert_eq!(a.merge(MinMax::empty(255)), a);
}

#[test]
fn clamps_saturate_at_depth_and_zero() {
    assert_eq!(clamp_wide(300, 255), 255);
    assert_eq!(clamp_wide(-4, 255), 0);
    assert_eq!(clamp_wide(128, 255), 128);
    assert_eq!(clamp_float(255.9, 255), 255);
    assert_eq!(clamp_float(-0.5, 255), 0);
    assert_eq!(clamp_float(12.7, 255), 12);
    assert_eq!(clamp_float(f64::NAN, 255), 0);
}
