use customizer_canvas::item::{Frame, ImageItem, TextItem};
use customizer_canvas::scene::{LayerDirection, Scene};

fn add_text(scene: &mut Scene, x: f32, y: f32) -> String {
    scene.add_text(Frame::new(x, y, 100.0, 50.0), TextItem::new("hello"))
}

fn add_image(scene: &mut Scene) -> String {
    scene.add_image(
        Frame::new(0.0, 0.0, 200.0, 100.0),
        ImageItem::new(vec![1, 2, 3], 200, 100),
    )
}

#[test]
fn add_assigns_monotonic_z_and_selects() {
    let mut scene = Scene::new();
    let first = add_text(&mut scene, 0.0, 0.0);
    let second = add_image(&mut scene);

    assert_eq!(scene.item(&first).unwrap().z_index, 1);
    assert_eq!(scene.item(&second).unwrap().z_index, 2);
    assert_eq!(scene.selected_id(), Some(second.as_str()));
}

#[test]
fn missing_id_mutations_are_noops() {
    let mut scene = Scene::new();
    add_text(&mut scene, 10.0, 10.0);
    let before = scene.items().to_vec();

    scene.move_item("no-such-id", 50.0, 50.0);
    scene.resize_item("no-such-id", 300.0, 300.0);
    scene.rotate_item("no-such-id", 45.0);
    scene.move_layer("no-such-id", LayerDirection::Front);
    scene.remove_item("no-such-id");

    assert_eq!(scene.items(), before.as_slice());
}

#[test]
fn resize_clamps_to_minimum_size() {
    let mut scene = Scene::new();
    let id = add_text(&mut scene, 0.0, 0.0);

    scene.resize_item(&id, 5.0, -40.0);

    let frame = scene.item(&id).unwrap().frame;
    assert_eq!(frame.width, 20.0);
    assert_eq!(frame.height, 20.0);
}

#[test]
fn rotation_is_normalized_into_0_360() {
    let mut scene = Scene::new();
    let id = add_text(&mut scene, 0.0, 0.0);

    scene.rotate_item(&id, -30.0);
    assert_eq!(scene.item(&id).unwrap().frame.rotation, 330.0);

    scene.rotate_item(&id, 370.0);
    assert_eq!(scene.item(&id).unwrap().frame.rotation, 10.0);
}

#[test]
fn locked_item_rejects_mutations_silently() {
    let mut scene = Scene::new();
    let id = add_text(&mut scene, 10.0, 10.0);
    scene.set_locked(&id, true);

    scene.move_item(&id, 99.0, 99.0);
    scene.resize_item(&id, 300.0, 300.0);
    scene.rotate_item(&id, 90.0);

    let frame = scene.item(&id).unwrap().frame;
    assert_eq!((frame.x, frame.y), (10.0, 10.0));
    assert_eq!((frame.width, frame.height), (100.0, 50.0));
    assert_eq!(frame.rotation, 0.0);

    // Unlocking must bypass the locked check.
    scene.set_locked(&id, false);
    scene.move_item(&id, 99.0, 99.0);
    assert_eq!(scene.item(&id).unwrap().frame.x, 99.0);
}

#[test]
fn move_layer_renumbers_dense() {
    let mut scene = Scene::new();
    let a = add_text(&mut scene, 0.0, 0.0);
    let b = add_text(&mut scene, 0.0, 0.0);
    let c = add_text(&mut scene, 0.0, 0.0);

    scene.move_layer(&a, LayerDirection::Front);
    let order: Vec<&str> = scene.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(order, vec![b.as_str(), c.as_str(), a.as_str()]);
    let zs: Vec<u32> = scene.items().iter().map(|i| i.z_index).collect();
    assert_eq!(zs, vec![1, 2, 3]);

    scene.move_layer(&c, LayerDirection::Down);
    let order: Vec<&str> = scene.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(order, vec![c.as_str(), b.as_str(), a.as_str()]);
    let zs: Vec<u32> = scene.items().iter().map(|i| i.z_index).collect();
    assert_eq!(zs, vec![1, 2, 3]);
}

#[test]
fn move_layer_at_boundary_is_noop() {
    let mut scene = Scene::new();
    let a = add_text(&mut scene, 0.0, 0.0);
    let b = add_text(&mut scene, 0.0, 0.0);

    assert!(!scene.move_layer(&b, LayerDirection::Up));
    assert!(!scene.move_layer(&a, LayerDirection::Down));
    assert!(!scene.move_layer(&b, LayerDirection::Front));
    assert!(!scene.move_layer(&a, LayerDirection::Back));

    let order: Vec<&str> = scene.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(order, vec![a.as_str(), b.as_str()]);
}

#[test]
fn mutations_report_whether_anything_changed() {
    let mut scene = Scene::new();
    let id = add_text(&mut scene, 0.0, 0.0);

    assert!(scene.move_item(&id, 5.0, 5.0));
    assert!(!scene.move_item("no-such-id", 5.0, 5.0));
    assert!(!scene.remove_item("no-such-id"));

    assert!(scene.set_locked(&id, true));
    assert!(!scene.set_locked(&id, true));
    assert!(!scene.move_item(&id, 9.0, 9.0));
    assert!(scene.set_locked(&id, false));

    let other = add_text(&mut scene, 0.0, 0.0);
    assert!(!scene.bring_to_front(&other));
    assert!(scene.bring_to_front(&id));

    assert!(scene.clear());
    assert!(!scene.clear());
}

#[test]
fn remove_clears_selection() {
    let mut scene = Scene::new();
    let id = add_text(&mut scene, 0.0, 0.0);
    assert_eq!(scene.selected_id(), Some(id.as_str()));

    scene.remove_item(&id);
    assert!(scene.selected_id().is_none());
    assert!(scene.items().is_empty());
}

#[test]
fn set_items_self_heals_dangling_selection() {
    let mut scene = Scene::new();
    add_text(&mut scene, 0.0, 0.0);
    assert!(scene.selected_id().is_some());

    scene.set_items(Vec::new());
    assert!(scene.selected_id().is_none());
    assert!(scene.selected_item().is_none());
}

#[test]
fn hit_test_returns_topmost() {
    let mut scene = Scene::new();
    let below = add_text(&mut scene, 0.0, 0.0);
    let above = add_text(&mut scene, 50.0, 0.0);

    // Overlap zone: both frames contain (60, 25).
    let hit = scene.hit_test(egui::pos2(60.0, 25.0)).unwrap();
    assert_eq!(hit.id, above);

    // Only the lower item covers (10, 25).
    let hit = scene.hit_test(egui::pos2(10.0, 25.0)).unwrap();
    assert_eq!(hit.id, below);

    assert!(scene.hit_test(egui::pos2(500.0, 500.0)).is_none());
}

#[test]
fn rotated_frame_hit_test() {
    let mut scene = Scene::new();
    let id = add_text(&mut scene, 0.0, 0.0);
    scene.rotate_item(&id, 90.0);

    // A 100x50 frame rotated 90 degrees around (50, 25) spans
    // x in [25, 75], y in [-25, 75].
    assert!(scene.hit_test(egui::pos2(50.0, -10.0)).is_some());
    assert!(scene.hit_test(egui::pos2(5.0, 25.0)).is_none());
}
