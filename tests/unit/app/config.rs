use super::*;

#[test]
fn defaults_fill_missing_fields() {
    let cfg = AppConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.root_rect(), Rect::new(0.0, 0.0, 1366.0, 768.0));
}

#[test]
fn parses_every_field() {
    let cfg = AppConfig::from_json_str(
        r#"{
            "virtual_width": 1920,
            "virtual_height": 1080,
            "clear_color": { "r": 1, "g": 2, "b": 3, "a": 255 },
            "default_batch": { "blend": "additive" }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.virtual_width, 1920.0);
    assert_eq!(cfg.clear_color, Some(Color::rgba(1, 2, 3, 255)));
    assert_eq!(
        cfg.default_batch,
        BatchOptions::default().with_blend(crate::render::backend::BlendState::Additive)
    );
}

#[test]
fn rejects_degenerate_screens() {
    for bad in [
        r#"{ "virtual_width": 0 }"#,
        r#"{ "virtual_height": -3 }"#,
    ] {
        assert!(matches!(
            AppConfig::from_json_str(bad),
            Err(WobbleError::Validation(_))
        ));
    }
    assert!(matches!(
        AppConfig::from_json_str(r#"{ "virtual_depth": 1 }"#),
        Err(WobbleError::Serde(_))
    ));
}

#[test]
fn load_reports_missing_files() {
    let err = AppConfig::load("definitely/not/here.json").unwrap_err();
    assert!(err.to_string().starts_with("validation error: open config JSON"));
}
