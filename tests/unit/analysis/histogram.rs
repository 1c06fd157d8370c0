use super::*;

fn sample_buffer() -> PixelBuffer {
    PixelBuffer::from_samples(2, 2, 3, vec![0, 1, 1, 3]).unwrap()
}

#[test]
fn bins_are_normalized() {
    let h = Histogram::from_buffer(&sample_buffer()).unwrap();
    assert_eq!(h.bins(), &[0.25, 0.5, 0.0, 0.25]);
    assert!((h.bins().iter().sum::<f64>() - 1.0).abs() < 1e-12);
}

#[test]
fn mean_and_variance() {
    let h = Histogram::from_buffer(&sample_buffer()).unwrap();
    assert!((h.mean() - 1.25).abs() < 1e-12);
    // E[(x - 1.25)^2] = (1.5625 + 2 * 0.0625 + 3.0625) / 4
    assert!((h.variance() - 1.1875).abs() < 1e-12);
}

#[test]
fn equalization_is_cumulative() {
    let h = Histogram::from_buffer(&sample_buffer()).unwrap();
    assert_eq!(h.equalization(), vec![0.25, 0.75, 0.75, 1.0]);
    assert_eq!(
        h.equalize_op(),
        PointOp::Equalize {
            table: vec![0.25, 0.75, 0.75, 1.0]
        }
    );
}

#[test]
fn csv_layout() {
    let h = Histogram::from_buffer(&sample_buffer()).unwrap();
    let mut out = Vec::new();
    h.write_csv(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "GS, Pixel Percent\n0, 0.25\n1, 0.5\n2, 0\n3, 0.25"
    );

    let mut out = Vec::new();
    h.write_equalized_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("GS,  Equalized Pixel Modifier\n0, 0.25\n"));
    assert!(text.ends_with("3, 1"));
}

#[test]
fn empty_and_unloaded_buffers() {
    let empty = PixelBuffer::from_samples(0, 0, 255, vec![]).unwrap();
    let h = Histogram::from_buffer(&empty).unwrap();
    assert_eq!(h.bins().len(), 256);
    assert_eq!(h.mean(), 0.0);
    assert!(Histogram::from_buffer(&PixelBuffer::default()).is_err());
}
