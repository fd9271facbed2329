use egui::{Pos2, Rect, Vec2, pos2};
use serde::{Deserialize, Serialize};

mod image;
mod text;

pub use image::ImageItem;
pub use text::{FontStyle, FontWeight, TextAlign, TextItem, TextStroke};

/// Smallest width/height an item may have, enforced by every mutator.
pub const MIN_ITEM_SIZE: f32 = 20.0;

/// Placement of an item in template-space pixels (top-left origin).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Rotation in degrees around the frame center.
    pub rotation: f32,
}

impl Frame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(MIN_ITEM_SIZE),
            height: height.max(MIN_ITEM_SIZE),
            rotation: 0.0,
        }
    }

    pub fn center(&self) -> Pos2 {
        pos2(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(pos2(self.x, self.y), Vec2::new(self.width, self.height))
    }

    /// Clamps width and height up to [`MIN_ITEM_SIZE`].
    pub fn clamp_min_size(&mut self) {
        self.width = self.width.max(MIN_ITEM_SIZE);
        self.height = self.height.max(MIN_ITEM_SIZE);
    }

    /// Hit test in template space, honoring the frame's rotation: the
    /// point is rotated back around the center before the rect check.
    pub fn contains(&self, point: Pos2) -> bool {
        let center = self.center();
        let rad = -self.rotation.to_radians();
        let (sin, cos) = rad.sin_cos();
        let d = point - center;
        let local = pos2(
            center.x + d.x * cos - d.y * sin,
            center.y + d.x * sin + d.y * cos,
        );
        self.rect().contains(local)
    }
}

/// Type-specific payload of a canvas item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Image(ImageItem),
    Text(TextItem),
}

/// The atomic placeable unit: an image or a text block overlaid on the
/// template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasItem {
    /// Opaque identifier, stable for the item's lifetime.
    pub id: String,
    pub frame: Frame,
    /// Paint order, ascending. Strictly monotonic per insertion; dense
    /// 1..=N after any layer reorder.
    pub z_index: u32,
    /// Locked items reject move/resize/rotate as silent no-ops.
    pub locked: bool,
    pub kind: ItemKind,
}

impl CanvasItem {
    pub fn new(frame: Frame, kind: ItemKind) -> Self {
        let mut frame = frame;
        frame.clamp_min_size();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            frame,
            z_index: 0,
            locked: false,
            kind,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ItemKind::Image(_) => "image",
            ItemKind::Text(_) => "text",
        }
    }

    /// Intrinsic width/height ratio used to preserve aspect during resize.
    /// Text items resize freely.
    pub fn aspect_ratio(&self) -> Option<f32> {
        match &self.kind {
            ItemKind::Image(image) if image.original_height > 0 => {
                Some(image.original_width as f32 / image.original_height as f32)
            }
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageItem> {
        match &self.kind {
            ItemKind::Image(image) => Some(image),
            ItemKind::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextItem> {
        match &self.kind {
            ItemKind::Text(text) => Some(text),
            ItemKind::Image(_) => None,
        }
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_rotation(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}
