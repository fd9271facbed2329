//! The host-UI contract: a façade bundling the scene store, history,
//! zoom, and the active template. Toolbar/sidebar hosts talk to this and
//! nothing else. Every discrete edit commits exactly one history entry;
//! gesture previews never do.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::export::{ExportArtifact, ExportFormat, export_scene};
use crate::geometry::{ZOOM_MAX, ZOOM_MIN, clamp_zoom};
use crate::gesture::GestureCommit;
use crate::history::History;
use crate::item::{CanvasItem, Frame, ImageItem, TextItem};
use crate::scene::{LayerDirection, Scene};
use crate::template::Template;

const ZOOM_STEP: f32 = 0.25;

/// One committed point in time: the full item collection plus the sibling
/// editor state that undoes together with it (the chosen template).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub items: Vec<CanvasItem>,
    pub template: Option<String>,
}

pub struct Editor {
    scene: Scene,
    history: History<Snapshot>,
    /// Templates the catalog has handed over, by name.
    templates: BTreeMap<String, Template>,
    active_template: Option<String>,
    zoom: f32,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            scene: Scene::new(),
            history: History::new(),
            templates: BTreeMap::new(),
            active_template: None,
            zoom: 1.0,
        }
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn template(&self) -> Option<&Template> {
        self.active_template
            .as_deref()
            .and_then(|name| self.templates.get(name))
    }

    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Registers a catalog template. The first one registered becomes
    /// active.
    pub fn register_template(&mut self, template: Template) {
        let name = template.name().to_owned();
        self.templates.insert(name.clone(), template);
        if self.active_template.is_none() {
            self.active_template = Some(name);
            self.commit();
        }
    }

    pub fn set_active_template(&mut self, name: &str) {
        if self.templates.contains_key(name) && self.active_template.as_deref() != Some(name) {
            self.active_template = Some(name.to_owned());
            self.commit();
        }
    }

    fn commit(&mut self) {
        let snapshot = Snapshot {
            items: self.scene.items().to_vec(),
            template: self.active_template.clone(),
        };
        self.history.set_and_commit(|_| snapshot);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.scene.set_items(snapshot.items);
        if snapshot.template.is_some() {
            self.active_template = snapshot.template;
        }
    }

    /// Decodes the uploaded bytes for their intrinsic dimensions and adds
    /// an image item sized to them (capped), selected, with history
    /// committed. Returns the new item's id.
    pub fn add_image(&mut self, bytes: Vec<u8>) -> Result<String, image::ImageError> {
        let decoded = image::load_from_memory(&bytes)?.to_rgba8();
        let (ow, oh) = (decoded.width(), decoded.height());
        drop(decoded);

        // Initial frame: up to 300 template units wide, aspect preserved.
        let width = (ow as f32).min(300.0);
        let height = width * oh as f32 / ow.max(1) as f32;
        let frame = Frame::new(40.0, 40.0, width, height);
        let id = self.scene.add_image(frame, ImageItem::new(bytes, ow, oh));
        self.commit();
        Ok(id)
    }

    /// Adds a text item at a default frame, selected, committed.
    pub fn add_text(&mut self, text: &str) -> String {
        let frame = Frame::new(80.0, 80.0, 260.0, 60.0);
        let id = self.scene.add_text(frame, TextItem::new(text));
        self.commit();
        id
    }

    /// Discrete field edit (styling, opacity, lock…): applies and commits.
    /// A locked/missing-id no-op commits nothing, so undo never has to
    /// step over a duplicate snapshot.
    pub fn update_item(&mut self, id: &str, apply: impl FnOnce(&mut CanvasItem)) {
        if self.scene.update_item(id, apply) {
            self.commit();
        }
    }

    pub fn set_locked(&mut self, id: &str, locked: bool) {
        if self.scene.set_locked(id, locked) {
            self.commit();
        }
    }

    pub fn move_layer(&mut self, id: &str, direction: LayerDirection) {
        if self.scene.move_layer(id, direction) {
            self.commit();
        }
    }

    pub fn bring_to_front(&mut self, id: &str) {
        if self.scene.bring_to_front(id) {
            self.commit();
        }
    }

    pub fn remove_item(&mut self, id: &str) {
        if self.scene.remove_item(id) {
            self.commit();
        }
    }

    pub fn clear_canvas(&mut self) {
        if self.scene.clear() {
            self.commit();
        }
    }

    pub fn select(&mut self, id: Option<&str>) {
        self.scene.select(id);
    }

    /// Applies a finished gesture's single store mutation, then commits
    /// one history entry. This is the gesture controller's commit contract.
    /// A commit racing a deletion mutates nothing and records nothing.
    pub fn apply_gesture(&mut self, commit: GestureCommit) {
        let applied = match &commit {
            GestureCommit::Move { id, x, y } => self.scene.move_item(id, *x, *y),
            GestureCommit::Resize { id, width, height } => {
                self.scene.resize_item(id, *width, *height)
            }
            GestureCommit::Rotate { id, rotation } => self.scene.rotate_item(id, *rotation),
        };
        if applied {
            self.commit();
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo().cloned() {
            self.restore(snapshot);
        }
    }

    pub fn redo(&mut self) {
        if let Some(snapshot) = self.history.redo().cloned() {
            self.restore(snapshot);
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = clamp_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = clamp_zoom(self.zoom - ZOOM_STEP);
    }

    pub fn zoom_reset(&mut self) {
        self.zoom = 1.0;
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < ZOOM_MAX
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > ZOOM_MIN
    }

    /// Serializes the current design (items plus template choice) so it
    /// can be stored and reloaded later.
    pub fn design_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Snapshot {
            items: self.scene.items().to_vec(),
            template: self.active_template.clone(),
        })
    }

    /// Loads a previously saved design, replacing the scene. The load is
    /// itself one undoable step.
    pub fn load_design_json(&mut self, json: &str) -> serde_json::Result<()> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        self.restore(snapshot);
        self.commit();
        Ok(())
    }

    /// Exports the current scene snapshot. Fails (logged, surfaced) when
    /// no template is loaded.
    pub fn export(
        &self,
        format: ExportFormat,
        export_size: Option<(u32, u32)>,
    ) -> Result<ExportArtifact, ExportError> {
        let Some(template) = self.template() else {
            warn!("export: no template loaded");
            return Err(ExportError::NoTemplate);
        };
        export_scene(template, self.scene.items(), export_size, format)
    }
}
