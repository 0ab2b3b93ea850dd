use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WobbleError::invalid_argument("x")
            .to_string()
            .contains("invalid argument:")
    );
    assert!(
        WobbleError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(WobbleError::render("x").to_string().contains("render error:"));
    assert!(
        WobbleError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WobbleError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: WobbleError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, WobbleError::Serde(_)));
}
