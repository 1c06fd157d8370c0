use super::*;
use crate::codec::pgm::FileType;
use crate::processor::ProcessorOpts;

fn processor() -> Processor {
    Processor::new(ProcessorOpts::default()).unwrap()
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("graymap-script-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn parses_every_operation_kind() {
    let json = r#"{
        "operations": [
            {"op": "point", "transform": {"fn": "brightness", "delta": 10}},
            {"op": "mask", "preset": "gaussian_blur3x3"},
            {"op": "mask", "weights": [[0, 1, 0], [1, 4, 1], [0, 1, 0]], "normalizer": 8},
            {"op": "frame", "other": "other.pgm", "combine": "subtract"},
            {"op": "scale", "factor": 2.0, "filter": "lanczos2"},
            {"op": "scale", "width": 10},
            {"op": "equalize"}
        ]
    }"#;
    let script = Script::from_json(json).unwrap();
    let names: Vec<_> = script.operations.iter().map(Operation::name).collect();
    assert_eq!(
        names,
        ["point", "mask", "mask", "frame", "scale", "scale", "equalize"]
    );
    assert_eq!(
        script.operations[0],
        Operation::Point {
            transform: PointOp::Brightness { delta: 10 }
        }
    );
    assert_eq!(
        script.operations[5],
        Operation::Scale {
            width: Some(10),
            height: None,
            factor: None,
            filter: ResampleFilter::Nearest,
        }
    );

    let again = Script::from_json(&script.to_json_pretty().unwrap()).unwrap();
    assert_eq!(again, script);
}

#[test]
fn rejects_bad_scripts() {
    assert!(matches!(
        Script::from_json("{\"operations\": [{\"op\": \"rotate\"}]}"),
        Err(GraymapError::Serde(_))
    ));
    assert!(matches!(
        Script::from_json("{\"operations\": [{\"op\": \"mask\"}]}"),
        Err(GraymapError::Validation(_))
    ));
    assert!(matches!(
        Script::from_json("{\"operations\": [{\"op\": \"scale\", \"filter\": \"bicubic\"}]}"),
        Err(GraymapError::Validation(_))
    ));
}

#[test]
fn runs_steps_in_order_with_timings() {
    let script = Script {
        operations: vec![
            Operation::Point {
                transform: PointOp::Negative,
            },
            Operation::Scale {
                width: Some(4),
                height: Some(4),
                factor: None,
                filter: ResampleFilter::Nearest,
            },
        ],
    };
    let mut buf = PixelBuffer::from_grid(255, &[vec![245, 235], vec![225, 215]]).unwrap();
    let timings = run_script(&processor(), &mut buf, &script, Path::new(".")).unwrap();
    assert_eq!(timings.len(), 2);
    assert_eq!(timings[0].name, "point");
    assert_eq!(timings[1].index, 1);
    assert_eq!(buf.row(0), &[10, 10, 20, 20]);
    assert_eq!(buf.row(3), &[30, 30, 40, 40]);
}

#[test]
fn frame_operand_is_loaded_relative_to_base() {
    let dir = scratch_dir("frame");
    let other = Pgm {
        file_type: FileType::P2,
        buffer: PixelBuffer::from_grid(255, &[vec![5, 5], vec![5, 5]]).unwrap(),
    };
    other.save(&dir.join("other.pgm"), None).unwrap();

    let script = Script {
        operations: vec![Operation::Frame {
            other: PathBuf::from("other.pgm"),
            combine: FrameOp::Add,
        }],
    };
    let mut buf = PixelBuffer::filled(2, 2, 255, 250).unwrap();
    run_script(&processor(), &mut buf, &script, &dir).unwrap();
    assert!(buf.export_samples().iter().all(|&v| v == 255));

    let missing = Script {
        operations: vec![Operation::Frame {
            other: PathBuf::from("nope.pgm"),
            combine: FrameOp::Add,
        }],
    };
    let err = run_script(&processor(), &mut buf, &missing, &dir).unwrap_err();
    assert!(matches!(err, GraymapError::Io { .. }));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn equalize_step_spreads_a_narrow_range() {
    let mut buf = PixelBuffer::from_grid(255, &[vec![100, 101], vec![102, 103]]).unwrap();
    let script = Script {
        operations: vec![Operation::Equalize],
    };
    run_script(&processor(), &mut buf, &script, Path::new(".")).unwrap();
    assert_eq!(buf.max_value(), 255);
    assert!(buf.min_value() < 100);
}

#[test]
fn failing_step_stops_the_run() {
    let script = Script {
        operations: vec![
            Operation::Point {
                transform: PointOp::Negative,
            },
            Operation::Frame {
                other: PathBuf::from("/definitely/not/here.pgm"),
                combine: FrameOp::Add,
            },
            Operation::Equalize,
        ],
    };
    let mut buf = PixelBuffer::filled(1, 1, 255, 0).unwrap();
    assert!(run_script(&processor(), &mut buf, &script, Path::new(".")).is_err());
    assert_eq!(buf.export_samples(), &[255]);
}
