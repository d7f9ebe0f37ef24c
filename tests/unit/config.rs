use super::*;

#[test]
fn defaults_match_editor_constants() {
    let cfg = EditorConfig::default();
    assert_eq!(cfg.text_box.left, 50.0);
    assert_eq!(cfg.text_box.top, 50.0);
    assert_eq!(cfg.text_box.width, 150.0);
    assert_eq!(cfg.text_box.font_size, 20.0);
    assert_eq!(cfg.paste_offset, Vec2::new(10.0, 10.0));
    assert_eq!(cfg.video_anchor, Point::new(200.0, 300.0));
    assert_eq!(cfg.snapshot_slot, "temp");
    assert_eq!(cfg.fonts.len(), 6);
    assert!(cfg.is_builtin_font("Times New Roman"));
    assert!(!cfg.is_builtin_font("Zen Antique"));
    cfg.validate().unwrap();
}

#[test]
fn partial_json_overrides_only_given_keys() {
    let json = r#"{ "canvas": { "width": 800, "height": 600 }, "paste_offset": { "x": 20, "y": 5 } }"#;
    let cfg = EditorConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.canvas.width, 800);
    assert_eq!(cfg.canvas.background, "rgb(255,255,255)");
    assert_eq!(cfg.paste_offset, Vec2::new(20.0, 5.0));
    assert_eq!(cfg.text_box, TextBoxDefaults::default());
}

#[test]
fn invalid_values_are_rejected() {
    let json = r#"{ "text_box": { "width": 0 } }"#;
    assert!(matches!(
        EditorConfig::from_reader(json.as_bytes()),
        Err(EditorError::Validation(_))
    ));

    let json = r#"{ "canvas": { "width": 10, "height": 10, "background": "mauve-ish" } }"#;
    assert!(EditorConfig::from_reader(json.as_bytes()).is_err());

    assert!(EditorConfig::from_reader("not json".as_bytes()).is_err());
}

#[test]
fn missing_file_is_validation_error() {
    let err = EditorConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open editor config"));
}
