use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PanoError::scene_load("x")
            .to_string()
            .contains("scene load error:")
    );
    assert!(
        PanoError::config("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(
        PanoError::image_read("x")
            .to_string()
            .contains("image read error:")
    );
    assert!(
        PanoError::image_write("x")
            .to_string()
            .contains("image write error:")
    );
    assert!(PanoError::NoValidCameras.to_string().contains("no valid cameras"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PanoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
