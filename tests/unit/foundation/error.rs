use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SlideError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SlideError::decode("x").to_string().contains("decode error:"));
    assert!(SlideError::render("x").to_string().contains("render error:"));
    assert!(
        SlideError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SlideError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_convert() {
    let bad = serde_json::from_str::<u32>("not a number").unwrap_err();
    let err: SlideError = bad.into();
    assert!(matches!(err, SlideError::Serde(_)));
}
