//! Per-item drag/resize/rotate state machine.
//!
//! Pointer-move events only update an in-memory target; the visual frame
//! is read back at most once per paint via [`GestureController::on_frame`],
//! so paint frequency is decoupled from pointer-event frequency and
//! intermediate moves between two frames coalesce. The authoritative store
//! is written exactly once, on release, from the true accumulated delta.

use egui::{Pos2, Vec2};
use log::debug;

use crate::geometry::screen_delta_to_surface;
use crate::item::{CanvasItem, Frame, MIN_ITEM_SIZE, normalize_rotation};

/// What the pointer went down on. Pointer-downs on dedicated controls must
/// never start a body drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitRegion {
    Body,
    ResizeHandle,
    RotateHandle,
    DeleteButton,
}

/// Immutable view of the item captured at gesture start.
#[derive(Clone, Debug)]
pub struct GestureTarget {
    pub id: String,
    pub frame: Frame,
    pub locked: bool,
    /// `Some` for images: width/height ratio to preserve during resize.
    pub aspect_ratio: Option<f32>,
    /// Item center on screen at gesture start; rotation pivot.
    pub center_screen: Pos2,
    /// Screen pixels per template unit at gesture start.
    pub view_scale: f32,
}

impl GestureTarget {
    pub fn from_item(item: &CanvasItem, center_screen: Pos2, view_scale: f32) -> Self {
        Self {
            id: item.id.clone(),
            frame: item.frame,
            locked: item.locked,
            aspect_ratio: item.aspect_ratio(),
            center_screen,
            view_scale: view_scale.max(f32::EPSILON),
        }
    }
}

/// Outcome of a pointer-down, for the host to act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownAction {
    /// First click on an unselected item: select it, do not start a
    /// gesture. The second interaction drags.
    Select(String),
    /// A gesture began; route subsequent moves here.
    Started,
    /// The delete control was pressed; remove the item and commit.
    Delete(String),
    /// Nothing to do (locked item already selected, gesture in progress).
    Ignored,
}

/// The single store mutation a finished gesture asks for.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureCommit {
    Move { id: String, x: f32, y: f32 },
    Resize { id: String, width: f32, height: f32 },
    Rotate { id: String, rotation: f32 },
}

impl GestureCommit {
    pub fn item_id(&self) -> &str {
        match self {
            GestureCommit::Move { id, .. }
            | GestureCommit::Resize { id, .. }
            | GestureCommit::Rotate { id, .. } => id,
        }
    }
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Dragging {
        target: GestureTarget,
        origin: Pos2,
        delta: Vec2,
    },
    Resizing {
        target: GestureTarget,
        origin: Pos2,
        delta: Vec2,
    },
    Rotating {
        target: GestureTarget,
        start_angle: f32,
        delta_degrees: f32,
    },
}

#[derive(Debug, Default)]
pub struct GestureController {
    phase: Phase,
    /// Set by pointer-move, cleared by `on_frame`: paint at most once per
    /// frame from the latest target.
    dirty: bool,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Id of the item a gesture is currently manipulating.
    pub fn active_item(&self) -> Option<&str> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Dragging { target, .. }
            | Phase::Resizing { target, .. }
            | Phase::Rotating { target, .. } => Some(&target.id),
        }
    }

    /// Handles a pointer-down over the item. Gestures start only from
    /// `Idle` and only on the already-selected item; a press on an
    /// unselected body selects instead.
    pub fn pointer_down(
        &mut self,
        target: GestureTarget,
        region: HitRegion,
        pointer: Pos2,
        is_selected: bool,
    ) -> DownAction {
        if !matches!(self.phase, Phase::Idle) {
            return DownAction::Ignored;
        }
        if region == HitRegion::DeleteButton {
            // Delete is not gesture-gated; it acts immediately.
            return if is_selected {
                DownAction::Delete(target.id)
            } else {
                DownAction::Ignored
            };
        }
        if !is_selected {
            return DownAction::Select(target.id);
        }
        if target.locked {
            return DownAction::Ignored;
        }

        debug!("gesture: start {region:?} on {}", target.id);
        self.dirty = false;
        self.phase = match region {
            HitRegion::Body => Phase::Dragging {
                target,
                origin: pointer,
                delta: Vec2::ZERO,
            },
            HitRegion::ResizeHandle => Phase::Resizing {
                target,
                origin: pointer,
                delta: Vec2::ZERO,
            },
            HitRegion::RotateHandle => {
                let start_angle = angle_degrees(target.center_screen, pointer);
                Phase::Rotating {
                    target,
                    start_angle,
                    delta_degrees: 0.0,
                }
            }
            HitRegion::DeleteButton => unreachable!(),
        };
        DownAction::Started
    }

    /// Records the latest pointer position. Never mutates the store.
    pub fn pointer_move(&mut self, pointer: Pos2) {
        match &mut self.phase {
            Phase::Idle => return,
            Phase::Dragging { origin, delta, .. } | Phase::Resizing { origin, delta, .. } => {
                *delta = pointer - *origin;
            }
            Phase::Rotating {
                target,
                start_angle,
                delta_degrees,
            } => {
                *delta_degrees = angle_degrees(target.center_screen, pointer) - *start_angle;
            }
        }
        self.dirty = true;
    }

    /// The transient frame to paint this frame, or `None` when nothing
    /// changed since the last paint.
    pub fn on_frame(&mut self) -> Option<(String, Frame)> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.preview()
    }

    /// Latest transient frame regardless of paint bookkeeping.
    pub fn preview(&self) -> Option<(String, Frame)> {
        let (target, frame) = match &self.phase {
            Phase::Idle => return None,
            Phase::Dragging { target, delta, .. } => {
                let local = screen_delta_to_surface(*delta, target.view_scale);
                let mut frame = target.frame;
                frame.x = target.frame.x + local.x;
                frame.y = target.frame.y + local.y;
                (target, frame)
            }
            Phase::Resizing { target, delta, .. } => {
                (target, resized_frame(target, *delta))
            }
            Phase::Rotating {
                target,
                delta_degrees,
                ..
            } => {
                let mut frame = target.frame;
                frame.rotation = target.frame.rotation + delta_degrees;
                (target, frame)
            }
        };
        Some((target.id.clone(), frame))
    }

    /// Ends the gesture and produces the single store mutation, computed
    /// from the accumulated delta (not the last painted frame). Rounded to
    /// integer pixels/degrees; rotation wraps modulo 360.
    pub fn pointer_up(&mut self) -> Option<GestureCommit> {
        let commit = match std::mem::take(&mut self.phase) {
            Phase::Idle => None,
            Phase::Dragging { target, delta, .. } => {
                let local = screen_delta_to_surface(delta, target.view_scale);
                Some(GestureCommit::Move {
                    x: (target.frame.x + local.x).round(),
                    y: (target.frame.y + local.y).round(),
                    id: target.id,
                })
            }
            Phase::Resizing { target, delta, .. } => {
                let frame = resized_frame(&target, delta);
                Some(GestureCommit::Resize {
                    width: frame.width.round(),
                    height: frame.height.round(),
                    id: target.id,
                })
            }
            Phase::Rotating {
                target,
                delta_degrees,
                ..
            } => Some(GestureCommit::Rotate {
                rotation: normalize_rotation((target.frame.rotation + delta_degrees).round()),
                id: target.id,
            }),
        };
        self.dirty = false;
        if let Some(commit) = &commit {
            debug!("gesture: commit {commit:?}");
        }
        commit
    }

    /// Pointer capture was lost (window focus change, touch cancel). The
    /// commit path must still run so the render loop cannot outlive the
    /// gesture.
    pub fn pointer_capture_lost(&mut self) -> Option<GestureCommit> {
        self.pointer_up()
    }
}

/// Resize from the bottom-right handle. The screen delta is converted to
/// template units, the same division drags use, so the handle tracks the
/// pointer at any zoom. For images the height follows the intrinsic
/// aspect ratio instead of the vertical pointer delta. Both axes clamp to
/// the minimum size.
fn resized_frame(target: &GestureTarget, delta: Vec2) -> Frame {
    let local = screen_delta_to_surface(delta, target.view_scale);
    let mut frame = target.frame;
    frame.width = (target.frame.width + local.x).max(MIN_ITEM_SIZE);
    frame.height = match target.aspect_ratio {
        Some(ratio) if ratio > 0.0 => (frame.width / ratio).max(MIN_ITEM_SIZE),
        _ => (target.frame.height + local.y).max(MIN_ITEM_SIZE),
    };
    frame
}

/// Signed angle of `pointer` around `center`, in degrees.
fn angle_degrees(center: Pos2, pointer: Pos2) -> f32 {
    let d = pointer - center;
    d.y.atan2(d.x).to_degrees()
}
