use std::cell::Cell;

use futures::FutureExt as _;
use futures::future::LocalBoxFuture;

use super::*;
use crate::persist::store::MemoryStore;
use crate::scene::graph::Selection;
use crate::scene::object::{Content, MediaSource, SceneObject};

#[derive(Default)]
struct CountingRenderer {
    renders: usize,
    fail: bool,
}

impl RenderEngine for CountingRenderer {
    fn render_all(&mut self, _scene: &Scene) -> EditorResult<()> {
        if self.fail {
            return Err(EditorError::validation("renderer unavailable"));
        }
        self.renders += 1;
        Ok(())
    }
}

struct ScriptedLoader {
    calls: Cell<usize>,
    result: Result<(), String>,
}

impl ScriptedLoader {
    fn ok() -> Self {
        Self {
            calls: Cell::new(0),
            result: Ok(()),
        }
    }

    fn failing(reason: &str) -> Self {
        Self {
            calls: Cell::new(0),
            result: Err(reason.to_string()),
        }
    }
}

impl FontLoader for ScriptedLoader {
    fn load<'a>(&'a self, _family: &'a str) -> LocalBoxFuture<'a, Result<(), String>> {
        self.calls.set(self.calls.get() + 1);
        futures::future::ready(self.result.clone()).boxed_local()
    }
}

#[test]
fn tick_renders_only_when_needed() {
    let mut editor = Editor::default();
    let mut r = CountingRenderer::default();

    // A fresh scene has never been drawn.
    assert!(editor.tick(&mut r).unwrap());
    assert!(!editor.tick(&mut r).unwrap());

    editor.add_text(None, TextBoxOptions::default());
    assert!(editor.tick(&mut r).unwrap());
    assert!(!editor.tick(&mut r).unwrap());
    assert_eq!(r.renders, 2);
}

#[test]
fn tick_keeps_rendering_while_video_plays() {
    let mut editor = Editor::default();
    editor
        .scene_mut()
        .add(SceneObject::video(MediaSource::new("video/mp4", vec![1]), 2, 2));
    let mut r = CountingRenderer::default();
    for _ in 0..3 {
        assert!(editor.tick(&mut r).unwrap());
    }
    assert_eq!(r.renders, 3);
    assert!(!editor.scene().is_dirty());
}

#[test]
fn failed_render_keeps_dirty_flag() {
    let mut editor = Editor::default();
    let mut r = CountingRenderer {
        fail: true,
        ..CountingRenderer::default()
    };
    assert!(editor.tick(&mut r).is_err());
    assert!(editor.scene().is_dirty());
}

#[test]
fn raise_on_select_moves_selection_to_front() {
    let mut editor = Editor::new(EditorConfig {
        raise_on_select: true,
        ..EditorConfig::default()
    })
    .unwrap();
    let a = editor.add_text(Some("a"), TextBoxOptions::default());
    let b = editor.add_text(Some("b"), TextBoxOptions::default());
    editor.select(Some(a)).unwrap();
    assert_eq!(editor.scene().ids(), vec![b, a]);

    let mut plain = Editor::default();
    let a = plain.add_text(Some("a"), TextBoxOptions::default());
    let b = plain.add_text(Some("b"), TextBoxOptions::default());
    plain.select(Some(a)).unwrap();
    assert_eq!(plain.scene().ids(), vec![a, b]);
}

#[test]
fn group_steps_preserve_relative_order() {
    let mut editor = Editor::default();
    let ids: Vec<_> = (0..4)
        .map(|i| editor.add_text(Some(&i.to_string()), TextBoxOptions::default()))
        .collect();
    editor.select_group(&[ids[0], ids[1]]).unwrap();

    editor.bring_forward().unwrap();
    assert_eq!(editor.scene().ids(), vec![ids[2], ids[0], ids[1], ids[3]]);
    editor.bring_forward().unwrap();
    editor.bring_forward().unwrap();
    assert_eq!(editor.scene().ids(), vec![ids[2], ids[3], ids[0], ids[1]]);

    editor.send_backward().unwrap();
    assert_eq!(editor.scene().ids(), vec![ids[2], ids[0], ids[1], ids[3]]);

    editor.move_to_back().unwrap();
    assert_eq!(editor.scene().ids(), vec![ids[0], ids[1], ids[2], ids[3]]);
    assert_eq!(editor.scene().selection(), &Selection::Group(vec![ids[0], ids[1]]));
}

#[test]
fn ordering_actions_need_selection() {
    let mut editor = Editor::default();
    editor.add_text(None, TextBoxOptions::default());
    editor.select(None).unwrap();
    assert!(matches!(editor.bring_forward(), Err(EditorError::NoSelection)));
    assert!(matches!(editor.send_backward(), Err(EditorError::NoSelection)));
    assert!(matches!(editor.move_to_front(), Err(EditorError::NoSelection)));
    assert!(matches!(editor.move_to_back(), Err(EditorError::NoSelection)));
    assert!(editor.remove_active().is_empty());
    assert_eq!(editor.scene().len(), 1);
}

#[test]
fn builtin_font_skips_loader() {
    let mut editor = Editor::default();
    let id = editor.add_text(None, TextBoxOptions::default());
    editor.scene_mut().get_mut(id).unwrap().as_text_mut().unwrap().font_family =
        "Zen Antique".to_string();

    let loader = ScriptedLoader::failing("offline");
    let change =
        pollster::block_on(editor.set_font_family(&loader, "Times New Roman")).unwrap();
    assert_eq!(change, FontChange::Applied);
    assert_eq!(loader.calls.get(), 0);
    let obj = editor.scene().get(id).unwrap();
    assert_eq!(obj.as_text().unwrap().font_family, "Times New Roman");
}

#[test]
fn loaded_font_is_applied_and_failure_reported() {
    let mut editor = Editor::default();
    let id = editor.add_text(None, TextBoxOptions::default());

    let ok = ScriptedLoader::ok();
    pollster::block_on(editor.set_font_family(&ok, "Noto Sans JP")).unwrap();
    assert_eq!(ok.calls.get(), 1);

    let bad = ScriptedLoader::failing("404");
    let err = pollster::block_on(editor.set_font_family(&bad, "Zen Antique")).unwrap_err();
    assert!(matches!(err, EditorError::FontLoad { .. }));
    let Content::Text(t) = &editor.scene().get(id).unwrap().content else {
        panic!("expected text");
    };
    assert_eq!(t.font_family, "Noto Sans JP");
}

#[test]
fn restore_from_missing_slot_is_not_found() {
    let mut editor = Editor::default();
    editor.add_text(None, TextBoxOptions::default());
    let before = editor.scene().clone();
    let store = MemoryStore::new();
    assert!(matches!(
        editor.restore_from(&store),
        Err(EditorError::NotFound(_))
    ));
    assert_eq!(editor.scene(), &before);
}

#[test]
fn dump_to_uses_configured_slot() {
    let mut editor = Editor::new(EditorConfig {
        snapshot_slot: "draft".to_string(),
        ..EditorConfig::default()
    })
    .unwrap();
    editor.add_text(None, TextBoxOptions::default());
    let mut store = MemoryStore::new();
    editor.dump_to(&mut store).unwrap();
    assert!(store.read("draft").unwrap().is_some());
    assert!(store.read("temp").unwrap().is_none());
}

#[test]
fn new_rejects_invalid_config() {
    let err = Editor::new(EditorConfig {
        paste_offset: crate::foundation::core::Vec2::new(f64::NAN, 10.0),
        ..EditorConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, EditorError::Validation(_)));

    assert!(Editor::new(EditorConfig::default()).is_ok());
}
