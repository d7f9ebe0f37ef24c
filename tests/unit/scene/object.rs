use super::*;

fn png_source() -> MediaSource {
    MediaSource::new("image/png", vec![0x89, b'P', b'N', b'G'])
}

#[test]
fn text_defaults_match_text_box_behaviour() {
    let obj = SceneObject::text("Text", 150.0, 20.0).with_position(50.0, 50.0);
    assert_eq!(obj.kind(), ObjectKind::Text);
    assert_eq!(obj.transform.left, 50.0);
    assert_eq!(obj.transform.width, 150.0);
    let t = obj.as_text().unwrap();
    assert_eq!(t.font_family, DEFAULT_FONT_FAMILY);
    assert_eq!(t.fill, DEFAULT_FILL);
    assert_eq!(t.font_weight, FontWeight::Normal);
    assert!(obj.transform.height > 0.0);
    assert!(obj.selectable && obj.evented);
}

#[test]
fn video_is_centred_and_playing() {
    let obj = SceneObject::video(MediaSource::new("video/mp4", vec![1, 2]), 640, 360);
    assert_eq!(obj.kind(), ObjectKind::Video);
    assert_eq!(obj.transform.origin, Origin::Center);
    assert_eq!(obj.transform.width, 640.0);
    assert!(obj.is_playing_video());
}

#[test]
fn clone_is_independent() {
    let original = SceneObject::text("a", 150.0, 20.0);
    let mut copy = original.clone();
    copy.as_text_mut().unwrap().text = "b".to_string();
    copy.transform.left = 99.0;
    assert_eq!(original.as_text().unwrap().text, "a");
    assert_eq!(original.transform.left, 0.0);
}

#[test]
fn serde_uses_type_tag_and_data_urls() {
    let obj = SceneObject::image(png_source(), 2, 3);
    let v = serde_json::to_value(&obj).unwrap();
    assert_eq!(v["type"], "image");
    assert!(
        v["src"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
    let back: SceneObject = serde_json::from_value(v).unwrap();
    assert_eq!(back, obj);
}

#[test]
fn text_record_fills_missing_style_fields() {
    let obj: SceneObject = serde_json::from_str(
        r#"{"type":"text","text":"hi","transform":{"left":1,"top":2,"width":150}}"#,
    )
    .unwrap();
    let t = obj.as_text().unwrap();
    assert_eq!(t.font_family, DEFAULT_FONT_FAMILY);
    assert_eq!(t.font_size, 40.0);
    assert!(obj.selectable);
}

#[test]
fn delta_applies_style_to_text_only() {
    let delta = AttributeDelta {
        fill: Some("#ff0000".to_string()),
        font_weight: Some(FontWeight::Bold),
        left: Some(5.0),
        ..AttributeDelta::default()
    };

    let mut text = SceneObject::text("a", 150.0, 20.0);
    delta.apply(&mut text);
    assert_eq!(text.as_text().unwrap().fill, "#ff0000");
    assert_eq!(text.as_text().unwrap().font_weight, FontWeight::Bold);
    assert_eq!(text.transform.left, 5.0);

    let mut image = SceneObject::image(png_source(), 2, 3);
    let before = image.content.clone();
    delta.apply(&mut image);
    assert_eq!(image.content, before);
    assert_eq!(image.transform.left, 5.0);
}

#[test]
fn delta_font_size_grows_text_box() {
    let mut obj = SceneObject::text("a", 150.0, 20.0);
    let h0 = obj.transform.height;
    AttributeDelta {
        font_size: Some(40.0),
        ..AttributeDelta::default()
    }
    .apply(&mut obj);
    assert!(obj.transform.height > h0);
}

#[test]
fn delta_validation_rejects_bad_values() {
    let bad_fill = AttributeDelta {
        fill: Some("not-a-color".to_string()),
        ..AttributeDelta::default()
    };
    assert!(bad_fill.validate().is_err());

    let bad_size = AttributeDelta {
        font_size: Some(0.0),
        ..AttributeDelta::default()
    };
    assert!(bad_size.validate().is_err());

    assert!(AttributeDelta::default().is_empty());
    assert!(AttributeDelta::default().validate().is_ok());
}

#[test]
fn validate_checks_payloads() {
    let mut obj = SceneObject::text("a", 150.0, 20.0);
    assert!(obj.validate().is_ok());
    obj.as_text_mut().unwrap().fill = "???".to_string();
    assert!(obj.validate().is_err());

    let empty = SceneObject::image(MediaSource::new("image/png", Vec::new()), 1, 1);
    assert!(empty.validate().is_err());
}
