use super::*;

#[test]
fn add_and_subtract_are_unclamped_here() {
    assert_eq!(FrameOp::Add.combine(200, 100), 300);
    assert_eq!(FrameOp::Subtract.combine(100, 200), -100);
}

#[test]
fn multiply_keeps_historical_difference() {
    for (a, b) in [(10, 3), (0, 7), (255, 255)] {
        assert_eq!(
            FrameOp::Multiply.combine(a, b),
            FrameOp::Subtract.combine(a, b)
        );
    }
}

#[test]
fn identity_passes_source_through() {
    assert_eq!(FrameOp::Identity.combine(42, 200), 42);
    assert_eq!(FrameOp::default(), FrameOp::Identity);
}
