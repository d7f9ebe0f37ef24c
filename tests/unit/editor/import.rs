use std::cell::RefCell;

use futures::FutureExt as _;
use futures::future::LocalBoxFuture;

use super::*;
use crate::assets::decode::{ImageInfo, VideoInfo};
use crate::scene::object::ObjectKind;

/// Backend that records which path was taken and answers with canned sizes.
#[derive(Default)]
struct FakeBackend {
    calls: RefCell<Vec<&'static str>>,
    fail: bool,
}

impl MediaBackend for FakeBackend {
    fn decode_image<'a>(&'a self, _bytes: &'a [u8]) -> LocalBoxFuture<'a, EditorResult<ImageInfo>> {
        self.calls.borrow_mut().push("image");
        let res = if self.fail {
            Err(EditorError::decode("bad image"))
        } else {
            Ok(ImageInfo {
                width: 64,
                height: 32,
                mime: "image/png".to_string(),
            })
        };
        futures::future::ready(res).boxed_local()
    }

    fn probe_video<'a>(&'a self, _bytes: &'a [u8]) -> LocalBoxFuture<'a, EditorResult<VideoInfo>> {
        self.calls.borrow_mut().push("video");
        let res = if self.fail {
            Err(EditorError::decode("bad video"))
        } else {
            Ok(VideoInfo {
                width: 320,
                height: 240,
                poster: None,
            })
        };
        futures::future::ready(res).boxed_local()
    }
}

#[test]
fn dispatch_follows_mime_prefix() {
    let config = EditorConfig::default();
    let backend = FakeBackend::default();
    let mut scene = Scene::default();

    for mime in ["video/mp4", "image/png", "", "application/x-unknown"] {
        let blob = MediaBlob::new(mime, vec![1, 2, 3]);
        pollster::block_on(import_media(&mut scene, &backend, blob, &config)).unwrap();
    }
    assert_eq!(*backend.calls.borrow(), ["video", "image", "image", "image"]);
    let kinds: Vec<_> = scene.objects().map(|(_, o)| o.kind()).collect();
    assert_eq!(
        kinds,
        [
            ObjectKind::Video,
            ObjectKind::Image,
            ObjectKind::Image,
            ObjectKind::Image
        ]
    );
}

#[test]
fn image_lands_at_configured_position_with_natural_size() {
    let backend = FakeBackend::default();
    let mut scene = Scene::default();
    let id = pollster::block_on(import_image(
        &mut scene,
        &backend,
        vec![9; 4],
        Point::new(5.0, 6.0),
    ))
    .unwrap();

    assert_eq!(scene.active(), Some(id));
    let obj = scene.get(id).unwrap();
    assert_eq!(obj.transform.position(), Point::new(5.0, 6.0));
    assert_eq!((obj.transform.width, obj.transform.height), (64.0, 32.0));
    let Content::Image(img) = &obj.content else {
        panic!("expected image");
    };
    assert_eq!(img.src.mime, "image/png");
    assert_eq!(&*img.src.data, &[9, 9, 9, 9]);
}

#[test]
fn video_is_centred_on_anchor_and_playing() {
    let backend = FakeBackend::default();
    let mut scene = Scene::default();
    let id = pollster::block_on(import_video(
        &mut scene,
        &backend,
        vec![1],
        "video/webm",
        Point::new(200.0, 300.0),
    ))
    .unwrap();

    let obj = scene.get(id).unwrap();
    assert_eq!(obj.transform.bounds().center(), Point::new(200.0, 300.0));
    let Content::Video(v) = &obj.content else {
        panic!("expected video");
    };
    assert!(v.playing && v.muted && v.looping);
    assert_eq!(v.src.mime, "video/webm");
    assert!(scene.has_playing_video());
}

#[test]
fn decode_failure_leaves_scene_unchanged() {
    let backend = FakeBackend {
        fail: true,
        ..FakeBackend::default()
    };
    let config = EditorConfig::default();
    let mut scene = Scene::default();
    let existing = add_text_box(&mut scene, &config.text_box, TextBoxOptions::default());
    let before = scene.clone();

    for mime in ["image/png", "video/mp4"] {
        let err = pollster::block_on(import_media(
            &mut scene,
            &backend,
            MediaBlob::new(mime, vec![0]),
            &config,
        ))
        .unwrap_err();
        assert!(matches!(err, EditorError::Decode(_)));
    }
    assert_eq!(scene, before);
    assert_eq!(scene.active(), Some(existing));
}

#[test]
fn dropped_import_adds_nothing() {
    let backend = FakeBackend::default();
    let mut scene = Scene::default();
    let fut = import_image(&mut scene, &backend, vec![1], Point::ORIGIN);
    drop(fut);
    assert!(scene.is_empty());
}

#[test]
fn text_box_defaults_and_overrides() {
    let defaults = TextBoxDefaults::default();
    let mut scene = Scene::default();

    let a = add_text_box(&mut scene, &defaults, TextBoxOptions::default());
    let obj = scene.get(a).unwrap();
    assert_eq!(obj.transform.position(), Point::new(50.0, 50.0));
    assert_eq!(obj.transform.width, 150.0);
    let text = obj.as_text().unwrap();
    assert_eq!(text.text, "Text");
    assert_eq!(text.font_size, 20.0);

    let b = add_text_box(
        &mut scene,
        &defaults,
        TextBoxOptions {
            text: Some("Hello".to_string()),
            left: Some(5.0),
            width: Some(f64::NAN),
            font_size: Some(-1.0),
            ..TextBoxOptions::default()
        },
    );
    let obj = scene.get(b).unwrap();
    assert_eq!(obj.transform.position(), Point::new(5.0, 50.0));
    assert_eq!(obj.transform.width, 150.0);
    assert_eq!(obj.as_text().unwrap().font_size, 20.0);
    assert_eq!(obj.as_text().unwrap().text, "Hello");
    assert_eq!(scene.active(), Some(b));
}
