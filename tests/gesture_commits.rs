use customizer_canvas::gesture::{
    DownAction, GestureCommit, GestureController, GestureTarget, HitRegion,
};
use customizer_canvas::item::Frame;
use egui::pos2;

fn target(frame: Frame, view_scale: f32) -> GestureTarget {
    GestureTarget {
        id: "item-1".to_owned(),
        frame,
        locked: false,
        aspect_ratio: None,
        center_screen: pos2(100.0, 100.0),
        view_scale,
    }
}

#[test]
fn first_click_selects_instead_of_dragging() {
    let mut gesture = GestureController::new();
    let action = gesture.pointer_down(
        target(Frame::new(10.0, 10.0, 100.0, 50.0), 1.0),
        HitRegion::Body,
        pos2(0.0, 0.0),
        false,
    );
    assert_eq!(action, DownAction::Select("item-1".to_owned()));
    assert!(!gesture.is_active());
}

#[test]
fn drag_commit_divides_by_view_scale() {
    let mut gesture = GestureController::new();
    let action = gesture.pointer_down(
        target(Frame::new(10.0, 10.0, 100.0, 50.0), 2.0),
        HitRegion::Body,
        pos2(0.0, 0.0),
        true,
    );
    assert_eq!(action, DownAction::Started);

    gesture.pointer_move(pos2(30.0, 10.0));
    let commit = gesture.pointer_up().unwrap();
    assert_eq!(
        commit,
        GestureCommit::Move {
            id: "item-1".to_owned(),
            x: 25.0,
            y: 15.0,
        }
    );
    assert!(!gesture.is_active());
}

#[test]
fn resize_preserves_image_aspect_ratio() {
    let mut gesture = GestureController::new();
    let mut t = target(Frame::new(0.0, 0.0, 200.0, 100.0), 1.0);
    t.aspect_ratio = Some(2.0);
    gesture.pointer_down(t, HitRegion::ResizeHandle, pos2(0.0, 0.0), true);

    // Vertical delta is ignored for images; height follows the ratio.
    gesture.pointer_move(pos2(100.0, -500.0));
    let commit = gesture.pointer_up().unwrap();
    assert_eq!(
        commit,
        GestureCommit::Resize {
            id: "item-1".to_owned(),
            width: 300.0,
            height: 150.0,
        }
    );
}

#[test]
fn resize_divides_by_view_scale() {
    let mut gesture = GestureController::new();
    let mut t = target(Frame::new(0.0, 0.0, 200.0, 100.0), 2.0);
    t.aspect_ratio = Some(2.0);
    gesture.pointer_down(t, HitRegion::ResizeHandle, pos2(0.0, 0.0), true);

    // 200 screen pixels at 2x is 100 template units, same as a drag.
    gesture.pointer_move(pos2(200.0, 0.0));
    let commit = gesture.pointer_up().unwrap();
    assert_eq!(
        commit,
        GestureCommit::Resize {
            id: "item-1".to_owned(),
            width: 300.0,
            height: 150.0,
        }
    );
}

#[test]
fn resize_clamps_both_axes_to_minimum() {
    let mut gesture = GestureController::new();
    gesture.pointer_down(
        target(Frame::new(0.0, 0.0, 100.0, 50.0), 1.0),
        HitRegion::ResizeHandle,
        pos2(0.0, 0.0),
        true,
    );
    gesture.pointer_move(pos2(-500.0, -500.0));
    let commit = gesture.pointer_up().unwrap();
    assert_eq!(
        commit,
        GestureCommit::Resize {
            id: "item-1".to_owned(),
            width: 20.0,
            height: 20.0,
        }
    );
}

#[test]
fn rotation_commit_wraps_modulo_360() {
    let mut gesture = GestureController::new();
    let mut frame = Frame::new(50.0, 75.0, 100.0, 50.0);
    frame.rotation = 350.0;
    // Handle grab at angle 0 around the screen center (100, 100).
    gesture.pointer_down(target(frame, 1.0), HitRegion::RotateHandle, pos2(200.0, 100.0), true);

    // Sweep the pointer 20 degrees clockwise.
    let rad = 20.0_f32.to_radians();
    gesture.pointer_move(pos2(100.0 + 100.0 * rad.cos(), 100.0 + 100.0 * rad.sin()));
    let commit = gesture.pointer_up().unwrap();
    assert_eq!(
        commit,
        GestureCommit::Rotate {
            id: "item-1".to_owned(),
            rotation: 10.0,
        }
    );
}

#[test]
fn locked_item_is_ignored() {
    let mut gesture = GestureController::new();
    let mut t = target(Frame::new(0.0, 0.0, 100.0, 50.0), 1.0);
    t.locked = true;
    let action = gesture.pointer_down(t, HitRegion::Body, pos2(0.0, 0.0), true);
    assert_eq!(action, DownAction::Ignored);
    assert!(!gesture.is_active());
}

#[test]
fn delete_button_acts_immediately() {
    let mut gesture = GestureController::new();
    let action = gesture.pointer_down(
        target(Frame::new(0.0, 0.0, 100.0, 50.0), 1.0),
        HitRegion::DeleteButton,
        pos2(0.0, 0.0),
        true,
    );
    assert_eq!(action, DownAction::Delete("item-1".to_owned()));
    assert!(!gesture.is_active());
}

#[test]
fn capture_lost_runs_the_commit_path() {
    let mut gesture = GestureController::new();
    gesture.pointer_down(
        target(Frame::new(10.0, 10.0, 100.0, 50.0), 1.0),
        HitRegion::Body,
        pos2(0.0, 0.0),
        true,
    );
    gesture.pointer_move(pos2(7.0, 3.0));

    let commit = gesture.pointer_capture_lost().unwrap();
    assert_eq!(
        commit,
        GestureCommit::Move {
            id: "item-1".to_owned(),
            x: 17.0,
            y: 13.0,
        }
    );
    assert!(!gesture.is_active());
    assert!(gesture.pointer_up().is_none());
}

#[test]
fn on_frame_reports_each_change_once() {
    let mut gesture = GestureController::new();
    gesture.pointer_down(
        target(Frame::new(10.0, 10.0, 100.0, 50.0), 1.0),
        HitRegion::Body,
        pos2(0.0, 0.0),
        true,
    );

    assert!(gesture.on_frame().is_none());

    gesture.pointer_move(pos2(5.0, 0.0));
    gesture.pointer_move(pos2(8.0, 0.0));
    let (id, frame) = gesture.on_frame().unwrap();
    assert_eq!(id, "item-1");
    assert_eq!(frame.x, 18.0);

    // Nothing moved since the last paint.
    assert!(gesture.on_frame().is_none());

    // The live preview is still readable regardless.
    assert!(gesture.preview().is_some());
}

#[test]
fn pointer_down_during_gesture_is_ignored() {
    let mut gesture = GestureController::new();
    gesture.pointer_down(
        target(Frame::new(0.0, 0.0, 100.0, 50.0), 1.0),
        HitRegion::Body,
        pos2(0.0, 0.0),
        true,
    );
    let action = gesture.pointer_down(
        target(Frame::new(0.0, 0.0, 100.0, 50.0), 1.0),
        HitRegion::Body,
        pos2(5.0, 5.0),
        true,
    );
    assert_eq!(action, DownAction::Ignored);
}
