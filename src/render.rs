//! Render/display layer.
//!
//! Two mutually exclusive passes over the same item data: the content pass
//! paints every item at its current geometry in ascending z order (clipped
//! to the template bounds), and the controls pass paints the selection
//! overlay (dashed outline, rotate/resize handles, delete button) for the
//! selected item only. Keeping the passes separate keeps hit-testing
//! unambiguous.

use std::collections::HashMap;

use egui::{
    Color32, Context, Mesh, Painter, Pos2, Rect, Stroke, TextureHandle, TextureOptions, Vec2,
    epaint::{TextShape, Vertex},
    pos2, vec2,
};
use log::warn;

use crate::gesture::HitRegion;
use crate::item::{CanvasItem, Frame, ItemKind, TextAlign, TextItem};

pub const HANDLE_RADIUS: f32 = 7.0;
/// Gap between the item box and the rotate handle, in screen pixels. The
/// controls sit outside the box so they stay reachable at any rotation.
pub const ROTATE_HANDLE_OFFSET: f32 = 24.0;
pub const CORNER_OFFSET: f32 = 10.0;

const SELECTION_STROKE: Stroke = Stroke {
    width: 1.5,
    color: Color32::from_rgb(30, 120, 255),
};

/// Maps template-space frames into screen space for a given on-screen
/// template bounds rect.
#[derive(Clone, Copy, Debug)]
pub struct ViewTransform {
    pub bounds: Rect,
    pub intrinsic: Vec2,
}

impl ViewTransform {
    pub fn scale(&self) -> f32 {
        crate::geometry::view_scale(self.bounds, self.intrinsic)
    }

    /// Unrotated screen rect of a frame.
    pub fn screen_rect(&self, frame: &Frame) -> Rect {
        let scale = self.scale();
        Rect::from_min_size(
            self.bounds.min + vec2(frame.x, frame.y) * scale,
            vec2(frame.width, frame.height) * scale,
        )
    }
}

/// Caches one GPU texture per image item. Source bytes are immutable after
/// upload, so the id is a sufficient cache key; decode failures are cached
/// too so a broken upload does not re-decode every frame.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, Option<TextureHandle>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn texture(&mut self, ctx: &Context, item: &CanvasItem) -> Option<&TextureHandle> {
        let ItemKind::Image(image) = &item.kind else {
            return None;
        };
        self.textures
            .entry(item.id.clone())
            .or_insert_with(|| match image::load_from_memory(&image.bytes) {
                Ok(decoded) => {
                    let rgba = decoded.to_rgba8();
                    let size = [rgba.width() as usize, rgba.height() as usize];
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &rgba);
                    Some(ctx.load_texture(
                        format!("item-{}", item.id),
                        color_image,
                        TextureOptions::LINEAR,
                    ))
                }
                Err(e) => {
                    warn!("image item {} failed to decode for display: {e}", item.id);
                    None
                }
            })
            .as_ref()
    }

    /// Drops textures whose items no longer exist.
    pub fn retain_items(&mut self, items: &[CanvasItem]) {
        self.textures
            .retain(|id, _| items.iter().any(|item| &item.id == id));
    }
}

/// Content pass: every item at its current geometry, ascending z order,
/// clipped to the template bounds. `preview` overrides one item's frame
/// with the in-flight gesture value.
pub fn paint_content(
    ctx: &Context,
    painter: &Painter,
    items: &[CanvasItem],
    view: &ViewTransform,
    textures: &mut TextureCache,
    preview: Option<&(String, Frame)>,
) {
    let painter = painter.with_clip_rect(view.bounds);
    for item in items {
        let frame = match preview {
            Some((id, frame)) if *id == item.id => *frame,
            _ => item.frame,
        };
        let rect = view.screen_rect(&frame);
        match &item.kind {
            ItemKind::Image(image) => {
                if let Some(texture) = textures.texture(ctx, item) {
                    paint_image(
                        &painter,
                        texture,
                        rect,
                        frame.rotation,
                        image.opacity,
                        vec2(image.original_width as f32, image.original_height as f32),
                    );
                }
            }
            ItemKind::Text(text) => {
                paint_text(&painter, text, rect, frame.rotation, view.scale());
            }
        }
    }
}

/// Textured quad, object-fit: contain within the frame, rotated around the
/// frame center.
fn paint_image(
    painter: &Painter,
    texture: &TextureHandle,
    rect: Rect,
    rotation: f32,
    opacity: f32,
    intrinsic: Vec2,
) {
    let fit = fit_rect(rect, intrinsic);
    let tint = Color32::WHITE.gamma_multiply(opacity.clamp(0.0, 1.0));

    let center = rect.center();
    let corners = [
        fit.left_top(),
        fit.right_top(),
        fit.right_bottom(),
        fit.left_bottom(),
    ];
    let uvs = [
        pos2(0.0, 0.0),
        pos2(1.0, 0.0),
        pos2(1.0, 1.0),
        pos2(0.0, 1.0),
    ];

    let mut mesh = Mesh::with_texture(texture.id());
    for (corner, uv) in corners.iter().zip(uvs) {
        mesh.vertices.push(Vertex {
            pos: rotate_around(*corner, center, rotation),
            uv,
            color: tint,
        });
    }
    mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    painter.add(mesh);
}

/// Largest `intrinsic`-proportioned rect centered inside `rect`.
fn fit_rect(rect: Rect, intrinsic: Vec2) -> Rect {
    if intrinsic.x <= 0.0 || intrinsic.y <= 0.0 {
        return rect;
    }
    let scale = (rect.width() / intrinsic.x).min(rect.height() / intrinsic.y);
    Rect::from_center_size(rect.center(), intrinsic * scale)
}

fn paint_text(painter: &Painter, text: &TextItem, rect: Rect, rotation: f32, scale: f32) {
    let color = parse_color(&text.color);
    let font_id = egui::FontId::new(
        (text.font_size * scale).max(1.0),
        match text.font_family.as_str() {
            "monospace" => egui::FontFamily::Monospace,
            _ => egui::FontFamily::Proportional,
        },
    );
    // egui's embedded fonts carry no bold face; the weight is honored in
    // the exported SVG.
    let format = egui::TextFormat {
        font_id,
        color,
        italics: matches!(text.font_style, crate::item::FontStyle::Italic),
        underline: if text.underline {
            Stroke::new(1.0, color)
        } else {
            Stroke::NONE
        },
        extra_letter_spacing: text.letter_spacing * scale,
        line_height: Some(text.font_size * text.line_height * scale),
        ..Default::default()
    };
    let mut job = egui::text::LayoutJob::default();
    job.append(&text.text, 0.0, format);
    job.wrap.max_width = rect.width();
    job.halign = match text.text_align {
        TextAlign::Left => egui::Align::LEFT,
        TextAlign::Center => egui::Align::Center,
        TextAlign::Right => egui::Align::RIGHT,
    };
    let galley = painter.ctx().fonts(|fonts| fonts.layout_job(job));

    // Anchor per alignment (the galley positions itself off its halign),
    // then rotate that anchor around the frame center so the text pivots
    // on its own box like the other items.
    let anchor = match text.text_align {
        TextAlign::Left => rect.left_top(),
        TextAlign::Center => rect.center_top(),
        TextAlign::Right => rect.right_top(),
    };
    let rad = rotation.to_radians();
    let mut shape = TextShape::new(rotate_around(anchor, rect.center(), rotation), galley, color);
    shape.angle = rad;
    painter.add(shape);
}

fn rotate_around(point: Pos2, center: Pos2, degrees: f32) -> Pos2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point - center;
    pos2(
        center.x + d.x * cos - d.y * sin,
        center.y + d.x * sin + d.y * cos,
    )
}

/// `#rrggbb` / `#rgb` to Color32; anything unparsable paints black.
pub fn parse_color(css: &str) -> Color32 {
    let hex = css.trim().trim_start_matches('#');
    let expand = |c: u8| (c << 4) | c;
    match hex.len() {
        6 => u32::from_str_radix(hex, 16).map_or(Color32::BLACK, |v| {
            Color32::from_rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
        }),
        3 => u32::from_str_radix(hex, 16).map_or(Color32::BLACK, |v| {
            Color32::from_rgb(
                expand(((v >> 8) & 0xf) as u8),
                expand(((v >> 4) & 0xf) as u8),
                expand((v & 0xf) as u8),
            )
        }),
        _ => Color32::BLACK,
    }
}

/// Masks the content pass to the template's visible outline: the
/// inverse-alpha silhouette is painted over the items, tinted with the
/// page background, so anything outside the silhouette disappears. The
/// controls pass runs after this and is never masked.
pub fn paint_outline_mask(
    painter: &Painter,
    mask: &TextureHandle,
    bounds: Rect,
    background: Color32,
) {
    painter.image(
        mask.id(),
        bounds,
        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
        background,
    );
}

/// Screen positions of the selection controls for an item's unrotated
/// screen rect. The control layer itself never rotates with the item.
#[derive(Clone, Copy, Debug)]
pub struct ControlLayout {
    pub outline: Rect,
    pub rotate: Pos2,
    pub resize: Pos2,
    pub delete: Pos2,
}

pub fn control_layout(screen_rect: Rect) -> ControlLayout {
    ControlLayout {
        outline: screen_rect,
        rotate: screen_rect.center_top() - vec2(0.0, ROTATE_HANDLE_OFFSET),
        resize: screen_rect.right_bottom() + vec2(CORNER_OFFSET, CORNER_OFFSET),
        delete: screen_rect.right_top() + vec2(CORNER_OFFSET, -CORNER_OFFSET),
    }
}

/// Which control (if any) the pointer is over. Checked before body hit
/// testing so handle presses never start a drag.
pub fn hit_control(layout: &ControlLayout, pointer: Pos2) -> Option<HitRegion> {
    let near = |p: Pos2| pointer.distance(p) <= HANDLE_RADIUS + 2.0;
    if near(layout.delete) {
        Some(HitRegion::DeleteButton)
    } else if near(layout.rotate) {
        Some(HitRegion::RotateHandle)
    } else if near(layout.resize) {
        Some(HitRegion::ResizeHandle)
    } else {
        None
    }
}

/// Controls pass: dashed bounding outline plus the three controls, for the
/// selected item only.
pub fn paint_controls(painter: &Painter, layout: &ControlLayout) {
    let r = layout.outline;
    for segment in [
        [r.left_top(), r.right_top()],
        [r.right_top(), r.right_bottom()],
        [r.right_bottom(), r.left_bottom()],
        [r.left_bottom(), r.left_top()],
    ] {
        painter.extend(egui::Shape::dashed_line(&segment, SELECTION_STROKE, 5.0, 4.0));
    }

    // Stem from the box to the rotate handle.
    painter.line_segment([r.center_top(), layout.rotate], SELECTION_STROKE);
    painter.circle_filled(layout.rotate, HANDLE_RADIUS, SELECTION_STROKE.color);
    painter.circle_stroke(layout.rotate, HANDLE_RADIUS, Stroke::new(1.0, Color32::WHITE));

    painter.rect_filled(
        Rect::from_center_size(layout.resize, Vec2::splat(HANDLE_RADIUS * 2.0)),
        3.0,
        SELECTION_STROKE.color,
    );
    painter.rect_stroke(
        Rect::from_center_size(layout.resize, Vec2::splat(HANDLE_RADIUS * 2.0)),
        3.0,
        Stroke::new(1.0, Color32::WHITE),
    );

    painter.circle_filled(layout.delete, HANDLE_RADIUS, Color32::from_rgb(220, 60, 60));
    painter.text(
        layout.delete,
        egui::Align2::CENTER_CENTER,
        "✕",
        egui::FontId::proportional(HANDLE_RADIUS * 1.6),
        Color32::WHITE,
    );
}
