use super::*;

fn text(label: &str) -> SceneObject {
    SceneObject::text(label, 150.0, 20.0)
}

fn scene_with(n: usize) -> (Scene, Vec<ObjectId>) {
    let mut scene = Scene::default();
    let ids = (0..n).map(|i| scene.add(text(&format!("t{i}")))).collect();
    (scene, ids)
}

#[test]
fn add_appends_on_top_and_activates() {
    let (scene, ids) = scene_with(3);
    assert_eq!(scene.len(), 3);
    assert_eq!(scene.ids(), ids);
    assert_eq!(scene.active(), Some(ids[2]));
    assert_eq!(scene.index_of(ids[2]), Some(2));
}

#[test]
fn ids_are_unique_and_increasing() {
    let (mut scene, ids) = scene_with(2);
    scene.remove(ids[1]);
    let next = scene.add(text("x"));
    assert!(next > ids[1]);
}

#[test]
fn count_tracks_adds_minus_removes() {
    let (mut scene, ids) = scene_with(5);
    scene.remove(ids[1]);
    scene.remove(ids[3]);
    scene.remove(ids[3]);
    assert_eq!(scene.len(), 3);
    assert_eq!(scene.ids(), vec![ids[0], ids[2], ids[4]]);
}

#[test]
fn removing_active_clears_selection() {
    let (mut scene, ids) = scene_with(2);
    assert_eq!(scene.active(), Some(ids[1]));
    assert!(scene.remove(ids[1]).is_some());
    assert!(scene.selection().is_empty());
    assert_eq!(scene.active(), None);
}

#[test]
fn removing_other_keeps_selection() {
    let (mut scene, ids) = scene_with(3);
    scene.set_active(Some(ids[1])).unwrap();
    scene.remove(ids[0]);
    assert_eq!(scene.active(), Some(ids[1]));
}

#[test]
fn removing_unknown_id_is_noop() {
    let (mut scene, ids) = scene_with(2);
    scene.remove(ids[0]);
    let before = scene.clone();
    assert!(scene.remove(ids[0]).is_none());
    assert_eq!(scene, before);
}

#[test]
fn remove_active_drops_whole_group() {
    let (mut scene, ids) = scene_with(4);
    scene.set_active_group(&[ids[3], ids[1]]).unwrap();
    let removed = scene.remove_active();
    assert_eq!(removed, vec![ids[1], ids[3]]);
    assert_eq!(scene.ids(), vec![ids[0], ids[2]]);
    assert!(scene.selection().is_empty());
}

#[test]
fn removing_group_member_shrinks_group() {
    let (mut scene, ids) = scene_with(3);
    scene.set_active_group(&[ids[0], ids[1], ids[2]]).unwrap();
    scene.remove(ids[1]);
    assert_eq!(scene.selection(), &Selection::Group(vec![ids[0], ids[2]]));
    scene.remove(ids[0]);
    assert_eq!(scene.selection(), &Selection::Single(ids[2]));
}

#[test]
fn set_active_rejects_non_members() {
    let (mut scene, ids) = scene_with(1);
    scene.remove(ids[0]);
    let err = scene.set_active(Some(ids[0])).unwrap_err();
    assert!(matches!(err, EditorError::NotFound(_)));
    scene.set_active(None).unwrap();
    assert!(scene.selection().is_empty());
}

#[test]
fn group_of_one_collapses_to_single() {
    let (mut scene, ids) = scene_with(2);
    scene.set_active_group(&[ids[0], ids[0]]).unwrap();
    assert_eq!(scene.selection(), &Selection::Single(ids[0]));
}

#[test]
fn move_to_clamps_index() {
    let (mut scene, ids) = scene_with(3);
    scene.move_to(ids[0], 99).unwrap();
    assert_eq!(scene.ids(), vec![ids[1], ids[2], ids[0]]);
    scene.move_to(ids[0], 0).unwrap();
    assert_eq!(scene.ids(), vec![ids[0], ids[1], ids[2]]);
    scene.move_to(ids[2], 1).unwrap();
    assert_eq!(scene.ids(), vec![ids[0], ids[2], ids[1]]);
}

#[test]
fn front_back_preserve_active_and_attributes() {
    let (mut scene, ids) = scene_with(3);
    scene.set_active(Some(ids[1])).unwrap();
    let before = scene.get(ids[1]).cloned();

    scene.move_to_front(ids[1]).unwrap();
    assert_eq!(scene.index_of(ids[1]), Some(2));
    scene.move_to_back(ids[1]).unwrap();
    assert_eq!(scene.index_of(ids[1]), Some(0));

    assert_eq!(scene.active(), Some(ids[1]));
    assert_eq!(scene.get(ids[1]).cloned(), before);
}

#[test]
fn step_moves_stop_at_the_ends() {
    let (mut scene, ids) = scene_with(2);
    scene.send_backward(ids[0]).unwrap();
    assert_eq!(scene.ids(), vec![ids[0], ids[1]]);
    scene.bring_forward(ids[0]).unwrap();
    assert_eq!(scene.ids(), vec![ids[1], ids[0]]);
    scene.bring_forward(ids[0]).unwrap();
    assert_eq!(scene.ids(), vec![ids[1], ids[0]]);
}

#[test]
fn reorder_unknown_id_is_not_found() {
    let (mut scene, ids) = scene_with(1);
    scene.remove(ids[0]);
    assert!(matches!(
        scene.move_to_front(ids[0]),
        Err(EditorError::NotFound(_))
    ));
}

#[test]
fn group_reorder_keeps_relative_order() {
    let (mut scene, ids) = scene_with(5);
    scene.set_active_group(&[ids[3], ids[0]]).unwrap();
    scene.move_selection_to_front().unwrap();
    assert_eq!(scene.ids(), vec![ids[1], ids[2], ids[4], ids[0], ids[3]]);
    scene.move_selection_to_back().unwrap();
    assert_eq!(scene.ids(), vec![ids[0], ids[3], ids[1], ids[2], ids[4]]);
}

#[test]
fn apply_to_active_requires_selection() {
    let (mut scene, _) = scene_with(1);
    scene.set_active(None).unwrap();
    let delta = AttributeDelta {
        fill: Some("#00ff00".to_string()),
        ..AttributeDelta::default()
    };
    assert!(matches!(
        scene.apply_to_active(&delta),
        Err(EditorError::NoSelection)
    ));
}

#[test]
fn apply_to_active_sets_dirty_and_mutates_only_selection() {
    let (mut scene, ids) = scene_with(2);
    scene.take_dirty();
    let delta = AttributeDelta {
        fill: Some("#00ff00".to_string()),
        ..AttributeDelta::default()
    };
    scene.apply_to_active(&delta).unwrap();
    assert!(scene.is_dirty());
    assert_eq!(scene.get(ids[1]).unwrap().as_text().unwrap().fill, "#00ff00");
    assert_ne!(scene.get(ids[0]).unwrap().as_text().unwrap().fill, "#00ff00");
}

#[test]
fn invalid_delta_leaves_scene_untouched() {
    let (mut scene, _) = scene_with(1);
    let before = scene.clone();
    let delta = AttributeDelta {
        left: Some(1.0),
        fill: Some("nope".to_string()),
        ..AttributeDelta::default()
    };
    assert!(scene.apply_to_active(&delta).is_err());
    assert_eq!(scene, before);
}

#[test]
fn take_dirty_resets_flag() {
    let (mut scene, _) = scene_with(1);
    assert!(scene.take_dirty());
    assert!(!scene.is_dirty());
    scene.mark_dirty();
    assert!(scene.take_dirty());
}

#[test]
fn canvas_settings_validate() {
    let mut scene = Scene::default();
    let bad = CanvasSettings {
        width: 0,
        ..CanvasSettings::default()
    };
    assert!(scene.set_canvas(bad).is_err());
    assert_eq!(scene.canvas(), &CanvasSettings::default());
}
