use std::time::{Duration, Instant};

use egui::{Color32, Context, Key, Rect, Sense, pos2};
use log::{error, info};

use crate::editor::Editor;
use crate::geometry::{self, Debounce};
use crate::gesture::{DownAction, GestureController, GestureTarget, HitRegion};
use crate::item::Frame;
use crate::panels::{ToolbarAction, properties_panel, toolbar};
use crate::render::{
    TextureCache, ViewTransform, control_layout, hit_control, paint_content, paint_controls,
    paint_outline_mask,
};
use crate::template::Template;

const NOTICE_TTL: Duration = Duration::from_secs(4);

/// A couple of built-in catalog templates so the editor is usable out of
/// the box; real deployments register templates from the catalog service.
const TEE_TEMPLATE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 420 480">
<path d="M105 40 L160 20 Q210 45 260 20 L315 40 L400 110 L340 170 L320 150 L320 460 L100 460 L100 150 L80 170 L20 110 Z" fill="#e8e3da" stroke="#8a8378" stroke-width="3"/>
</svg>"##;
const MUG_TEMPLATE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 520 300">
<rect x="20" y="20" width="400" height="260" rx="24" fill="#f4f1ec" stroke="#9a938a" stroke-width="3"/>
<path d="M420 90 q80 60 0 120" fill="none" stroke="#9a938a" stroke-width="14"/>
</svg>"##;

/// The eframe shell: routes pointer input into the gesture controller,
/// drives the render passes, and hosts the toolbar/properties panels.
pub struct CustomizerApp {
    editor: Editor,
    gesture: GestureController,
    textures: TextureCache,
    template_texture: Option<egui::TextureHandle>,
    /// Inverse-alpha silhouette of the template, painted over the item
    /// layer so items never overflow the visible outline.
    mask_texture: Option<egui::TextureHandle>,
    /// Template name + pixel size the cached textures were rendered at.
    rendered_key: Option<(String, [u32; 2])>,
    pending_size: Option<[u32; 2]>,
    bounds_debounce: Debounce,
    /// Latest gesture preview, refreshed at most once per frame.
    preview: Option<(String, Frame)>,
    notice: Option<(String, Instant)>,
}

impl CustomizerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut editor = Editor::new();
        for (name, markup) in [("classic-tee", TEE_TEMPLATE), ("mug-wrap", MUG_TEMPLATE)] {
            match Template::from_markup(name, markup) {
                Ok(template) => editor.register_template(template),
                Err(e) => error!("built-in template {name} rejected: {e}"),
            }
        }
        Self {
            editor,
            gesture: GestureController::new(),
            textures: TextureCache::new(),
            template_texture: None,
            mask_texture: None,
            rendered_key: None,
            pending_size: None,
            bounds_debounce: Debounce::default(),
            preview: None,
            notice: None,
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some((message.into(), Instant::now()));
    }

    fn handle_dropped_files(&mut self, ctx: &Context) {
        for file in ctx.input(|i| i.raw.dropped_files.clone()) {
            let bytes = file
                .bytes
                .as_ref()
                .map(|b| b.to_vec())
                .or_else(|| file.path.as_ref().and_then(|p| std::fs::read(p).ok()));
            let Some(bytes) = bytes else {
                self.notify("Could not read dropped file");
                continue;
            };
            let is_design = file
                .path
                .as_ref()
                .and_then(|p| p.extension())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_design {
                match std::str::from_utf8(&bytes)
                    .map_err(|e| e.to_string())
                    .and_then(|json| self.editor.load_design_json(json).map_err(|e| e.to_string()))
                {
                    Ok(()) => self.notify("Design loaded"),
                    Err(e) => self.notify(format!("Could not load design: {e}")),
                }
                continue;
            }
            match self.editor.add_image(bytes) {
                Ok(id) => {
                    info!("added image item {id}");
                    self.notify("Image added");
                }
                Err(e) => self.notify(format!("Could not decode image: {e}")),
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        let (undo, redo, delete) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(Key::Z) && !i.modifiers.shift,
                i.modifiers.command && (i.key_pressed(Key::Y) || (i.modifiers.shift && i.key_pressed(Key::Z))),
                i.key_pressed(Key::Delete),
            )
        });
        if undo {
            self.editor.undo();
        }
        if redo {
            self.editor.redo();
        }
        if delete && !self.gesture.is_active() {
            if let Some(id) = self.editor.scene().selected_id().map(str::to_owned) {
                self.editor.remove_item(&id);
            }
        }
    }

    fn run_export(&mut self, format: crate::export::ExportFormat) {
        match self.editor.export(format, None) {
            Ok(artifact) => match std::fs::write(&artifact.filename, &artifact.bytes) {
                Ok(()) => self.notify(format!("Saved {}", artifact.filename)),
                Err(e) => self.notify(format!("Failed to write {}: {e}", artifact.filename)),
            },
            Err(e) => {
                error!("export failed: {e}");
                self.notify(format!("Export failed: {e}"));
            }
        }
    }

    fn save_design(&mut self) {
        match self.editor.design_json() {
            Ok(json) => match std::fs::write("design.json", json) {
                Ok(()) => self.notify("Saved design.json (drop it back in to reload)"),
                Err(e) => self.notify(format!("Failed to write design.json: {e}")),
            },
            Err(e) => {
                error!("design serialization failed: {e}");
                self.notify(format!("Could not save design: {e}"));
            }
        }
    }

    /// Re-rasterizes the template texture when the template or its
    /// on-screen size changed; size-only changes are debounced to ride
    /// out window resizing.
    fn refresh_template_texture(&mut self, ctx: &Context, bounds: Rect) {
        let Some(template) = self.editor.template() else {
            self.template_texture = None;
            self.mask_texture = None;
            self.rendered_key = None;
            return;
        };
        let size = [
            (bounds.width().round() as u32).max(1),
            (bounds.height().round() as u32).max(1),
        ];
        let key = (template.name().to_owned(), size);
        if self.rendered_key.as_ref() == Some(&key) {
            return;
        }

        let template_changed = self
            .rendered_key
            .as_ref()
            .is_none_or(|(name, _)| *name != key.0);
        if !template_changed {
            if self.pending_size != Some(size) {
                self.pending_size = Some(size);
                self.bounds_debounce.trigger();
            }
            if !self.bounds_debounce.ready() {
                ctx.request_repaint_after(geometry::BOUNDS_DEBOUNCE);
                return;
            }
            self.pending_size = None;
        }

        let template = template.clone();
        match template.rasterize(size[0], size[1]) {
            Ok(raster) => {
                self.template_texture =
                    Some(ctx.load_texture("template", raster.image, egui::TextureOptions::LINEAR));
                self.mask_texture = Some(ctx.load_texture(
                    "template-mask",
                    raster.outline_mask,
                    egui::TextureOptions::LINEAR,
                ));
            }
            Err(e) => {
                // Degrade gracefully: keep editing without the backdrop.
                error!("template rasterization failed: {e}");
                self.template_texture = None;
                self.mask_texture = None;
            }
        }
        self.rendered_key = Some(key);
    }

    fn on_pointer_down(&mut self, pointer: egui::Pos2, view: &ViewTransform) {
        // Controls of the selected item sit on top of everything and must
        // never be hijacked by a body drag.
        if let Some(selected) = self.editor.scene().selected_item() {
            let layout = control_layout(view.screen_rect(&selected.frame));
            if let Some(region) = hit_control(&layout, pointer) {
                let rect = view.screen_rect(&selected.frame);
                let target = GestureTarget::from_item(selected, rect.center(), view.scale());
                let action = self.gesture.pointer_down(target, region, pointer, true);
                self.apply_down_action(action);
                return;
            }
        }

        let template_pos =
            geometry::screen_point_to_template(pointer, view.bounds, view.intrinsic);
        let hit = self.editor.scene().hit_test(template_pos).map(|item| {
            let center = view.screen_rect(&item.frame).center();
            let is_selected = self.editor.scene().selected_id() == Some(item.id.as_str());
            (
                GestureTarget::from_item(item, center, view.scale()),
                is_selected,
            )
        });
        match hit {
            Some((target, is_selected)) => {
                let action =
                    self.gesture
                        .pointer_down(target, HitRegion::Body, pointer, is_selected);
                self.apply_down_action(action);
            }
            // Clicking empty canvas clears the selection.
            None => self.editor.select(None),
        }
    }

    fn apply_down_action(&mut self, action: DownAction) {
        match action {
            DownAction::Select(id) => self.editor.select(Some(&id)),
            DownAction::Delete(id) => self.editor.remove_item(&id),
            DownAction::Started | DownAction::Ignored => {}
        }
    }

    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response, view: &ViewTransform) {
        let (pressed, released, down, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.interact_pos(),
            )
        });

        if pressed && response.hovered() {
            if let Some(pos) = pos {
                self.on_pointer_down(pos, view);
            }
        }

        if self.gesture.is_active() {
            if let Some(pos) = pos {
                self.gesture.pointer_move(pos);
            }
            let commit = if released {
                self.gesture.pointer_up()
            } else if !down {
                // The up event never reached us (focus loss, capture
                // break); the commit path must still run.
                self.gesture.pointer_capture_lost()
            } else {
                None
            };
            if let Some(commit) = commit {
                self.editor.apply_gesture(commit);
            }
        }
    }

    fn canvas(&mut self, ctx: &Context, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let Some(intrinsic) = self.editor.template().map(|t| t.intrinsic_size()) else {
            painter.text(
                response.rect.center(),
                egui::Align2::CENTER_CENTER,
                "No template loaded",
                egui::FontId::proportional(18.0),
                ui.visuals().weak_text_color(),
            );
            return;
        };
        let bounds = geometry::template_bounds(response.rect, intrinsic, self.editor.zoom());
        let view = ViewTransform { bounds, intrinsic };

        self.refresh_template_texture(ctx, bounds);

        painter.rect_filled(bounds, 0.0, Color32::WHITE);
        if let Some(texture) = &self.template_texture {
            painter.image(
                texture.id(),
                bounds,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        self.handle_pointer(ui, &response, &view);

        // Paint at most once per frame from the latest gesture target.
        if let Some(preview) = self.gesture.on_frame() {
            self.preview = Some(preview);
        }
        if !self.gesture.is_active() {
            self.preview = None;
        }

        let items = self.editor.scene().items();
        self.textures.retain_items(items);
        paint_content(
            ctx,
            &painter,
            items,
            &view,
            &mut self.textures,
            self.preview.as_ref(),
        );

        // Clip the composed preview to the template's visible outline.
        if let Some(mask) = &self.mask_texture {
            paint_outline_mask(&painter, mask, bounds, ui.visuals().panel_fill);
        }

        if let Some(selected) = self.editor.scene().selected_item() {
            let frame = match &self.preview {
                Some((id, frame)) if *id == selected.id => *frame,
                _ => selected.frame,
            };
            paint_controls(&painter, &control_layout(view.screen_rect(&frame)));
        }

        if self.gesture.is_active() {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for CustomizerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_shortcuts(ctx);

        let mut toolbar_action = None;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar_action = toolbar(ui, &mut self.editor);
        });
        match toolbar_action {
            Some(ToolbarAction::Export(format)) => self.run_export(format),
            Some(ToolbarAction::SaveDesign) => self.save_design(),
            None => {}
        }

        egui::SidePanel::right("properties")
            .default_width(240.0)
            .show(ctx, |ui| properties_panel(ui, &mut self.editor));

        if let Some((message, at)) = &self.notice {
            if at.elapsed() < NOTICE_TTL {
                let message = message.clone();
                egui::TopBottomPanel::bottom("notice").show(ctx, |ui| {
                    ui.label(message);
                });
            } else {
                self.notice = None;
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ctx, ui));
    }
}
