use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GraymapError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(GraymapError::format("x").to_string().contains("format error:"));
    assert!(
        GraymapError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        GraymapError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn io_error_names_the_path() {
    let err = GraymapError::io(
        std::path::Path::new("in/lena.pgm"),
        std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    );
    let msg = err.to_string();
    assert!(msg.contains("in/lena.pgm"));
    assert!(msg.contains("missing"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GraymapError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
