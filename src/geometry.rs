//! Coordinate-space plumbing between three spaces: raw screen pixels from
//! pointer events, the zoomed on-screen editing surface, and the
//! template's intrinsic coordinate space (its view box), which is
//! independent of how large the template happens to be drawn.

use std::time::{Duration, Instant};

use egui::{Pos2, Rect, Vec2, pos2, vec2};

pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 3.0;

/// How long template-bounds recomputation waits after the last viewport
/// change, to coalesce layout thrashing.
pub const BOUNDS_DEBOUNCE: Duration = Duration::from_millis(200);

pub fn clamp_zoom(zoom: f32) -> f32 {
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}

/// Converts a screen-pixel pointer delta into editing-surface units by
/// dividing out the zoom/scale factor. `scale` must be strictly positive;
/// it is re-clamped here so a zero or negative value can never divide.
pub fn screen_delta_to_surface(delta: Vec2, scale: f32) -> Vec2 {
    let scale = scale.max(f32::EPSILON);
    delta / scale
}

/// The template's on-screen rectangle: the largest `intrinsic`-proportioned
/// rect that fits centered inside `container`, scaled by `zoom`. Both the
/// item layer and the clip mask are positioned from this rect.
pub fn template_bounds(container: Rect, intrinsic: Vec2, zoom: f32) -> Rect {
    if intrinsic.x <= 0.0 || intrinsic.y <= 0.0 {
        return Rect::from_center_size(container.center(), Vec2::ZERO);
    }
    let fit = (container.width() / intrinsic.x)
        .min(container.height() / intrinsic.y)
        .max(0.0);
    let size = intrinsic * fit * clamp_zoom(zoom);
    Rect::from_center_size(container.center(), size)
}

/// Screen pixels per template unit for the given bounds.
pub fn view_scale(bounds: Rect, intrinsic: Vec2) -> f32 {
    if intrinsic.x <= 0.0 {
        return 1.0;
    }
    bounds.width() / intrinsic.x
}

/// Maps a point on the editing surface into template units. The surface
/// and the template's authoring size generally differ; this is the bridge
/// the export pipeline and pointer handling share.
pub fn surface_to_template(point: Pos2, surface: Vec2, intrinsic: Vec2) -> Pos2 {
    if surface.x <= 0.0 || surface.y <= 0.0 {
        return point;
    }
    pos2(
        point.x * intrinsic.x / surface.x,
        point.y * intrinsic.y / surface.y,
    )
}

/// Inverse of [`surface_to_template`].
pub fn template_to_surface(point: Pos2, surface: Vec2, intrinsic: Vec2) -> Pos2 {
    if intrinsic.x <= 0.0 || intrinsic.y <= 0.0 {
        return point;
    }
    pos2(
        point.x * surface.x / intrinsic.x,
        point.y * surface.y / intrinsic.y,
    )
}

/// Screen position of a template-space point inside `bounds`.
pub fn template_point_to_screen(point: Pos2, bounds: Rect, intrinsic: Vec2) -> Pos2 {
    let surface = template_to_surface(point, bounds.size(), intrinsic);
    bounds.min + surface.to_vec2()
}

/// Template-space position of a screen point inside `bounds`.
pub fn screen_point_to_template(point: Pos2, bounds: Rect, intrinsic: Vec2) -> Pos2 {
    surface_to_template((point - bounds.min).to_pos2(), bounds.size(), intrinsic)
}

/// Trailing-edge debounce: `trigger` restarts the window, `ready` fires
/// once after the window has elapsed with no further triggers.
#[derive(Debug, Default)]
pub struct Debounce {
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn trigger(&mut self) {
        self.deadline = Some(Instant::now() + BOUNDS_DEBOUNCE);
    }

    pub fn ready(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }
}
