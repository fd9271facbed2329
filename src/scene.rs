use log::debug;

use crate::item::{CanvasItem, Frame, ImageItem, ItemKind, TextItem, normalize_rotation};

/// Direction argument for [`Scene::move_layer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerDirection {
    Up,
    Down,
    Front,
    Back,
}

/// The authoritative scene state: the ordered item collection plus the
/// current selection.
///
/// Every operation is a pure state transition given the current state and
/// its arguments. Mutations addressing a missing or locked item are silent
/// no-ops: gesture commits and history restores can race with deletions,
/// and stale references are tolerated by design. Array order always equals
/// ascending paint order (`z_index`).
#[derive(Clone, Debug, Default)]
pub struct Scene {
    items: Vec<CanvasItem>,
    selected: Option<String>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CanvasItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&CanvasItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The selected item, if the selection still points at a live id.
    /// A dangling selection reads as `None`.
    pub fn selected_item(&self) -> Option<&CanvasItem> {
        self.selected.as_deref().and_then(|id| self.item(id))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_item().map(|item| item.id.as_str())
    }

    /// Sets the selection without validating the id; readers treat a
    /// dangling selection as empty.
    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_owned);
    }

    fn next_z_index(&self) -> u32 {
        self.items.iter().map(|item| item.z_index).max().unwrap_or(0) + 1
    }

    fn push_selected(&mut self, mut item: CanvasItem) -> String {
        item.z_index = self.next_z_index();
        let id = item.id.clone();
        debug!("scene: add {} item {id} (z={})", item.kind_name(), item.z_index);
        self.items.push(item);
        self.selected = Some(id.clone());
        id
    }

    /// Appends an image item, assigns id and next z-index, selects it.
    /// Returns the new id.
    pub fn add_image(&mut self, frame: Frame, image: ImageItem) -> String {
        self.push_selected(CanvasItem::new(frame, ItemKind::Image(image)))
    }

    /// Appends a text item, assigns id and next z-index, selects it.
    /// Returns the new id.
    pub fn add_text(&mut self, frame: Frame, text: TextItem) -> String {
        self.push_selected(CanvasItem::new(frame, ItemKind::Text(text)))
    }

    /// Applies `apply` to the item unless it is locked or missing. The
    /// frame is re-clamped to the minimum size and the rotation normalized
    /// afterwards, so no caller can smuggle in an invalid geometry.
    /// Returns whether the edit was applied, so callers can skip history
    /// commits for no-ops.
    pub fn update_item(&mut self, id: &str, apply: impl FnOnce(&mut CanvasItem)) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        if item.locked {
            return false;
        }
        apply(item);
        item.frame.clamp_min_size();
        item.frame.rotation = normalize_rotation(item.frame.rotation);
        true
    }

    pub fn move_item(&mut self, id: &str, x: f32, y: f32) -> bool {
        self.update_item(id, |item| {
            item.frame.x = x;
            item.frame.y = y;
        })
    }

    /// Resizes the item, clamping both axes to the minimum size. Aspect
    /// preservation is the gesture controller's job; the clamp here is the
    /// last line of defense.
    pub fn resize_item(&mut self, id: &str, width: f32, height: f32) -> bool {
        self.update_item(id, |item| {
            item.frame.width = width;
            item.frame.height = height;
        })
    }

    pub fn rotate_item(&mut self, id: &str, degrees: f32) -> bool {
        self.update_item(id, |item| {
            item.frame.rotation = degrees;
        })
    }

    /// Locking is the one field edit that must bypass the locked check,
    /// otherwise a locked item could never be unlocked.
    pub fn set_locked(&mut self, id: &str, locked: bool) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) if item.locked != locked => {
                item.locked = locked;
                true
            }
            _ => false,
        }
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        if index + 1 == self.items.len() {
            return false;
        }
        let next = self.next_z_index();
        self.items[index].z_index = next;
        self.sort_by_z();
        true
    }

    /// Reorders the item within the paint order and renumbers all items'
    /// z-indices to a dense 1..=N matching array order. Returns false when
    /// the item is missing or already at the requested boundary.
    pub fn move_layer(&mut self, id: &str, direction: LayerDirection) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        let last = self.items.len() - 1;
        let moved = match direction {
            LayerDirection::Up if index < last => {
                self.items.swap(index, index + 1);
                true
            }
            LayerDirection::Down if index > 0 => {
                self.items.swap(index, index - 1);
                true
            }
            LayerDirection::Front if index < last => {
                let item = self.items.remove(index);
                self.items.push(item);
                true
            }
            LayerDirection::Back if index > 0 => {
                let item = self.items.remove(index);
                self.items.insert(0, item);
                true
            }
            _ => false,
        };
        if moved {
            self.renumber();
        }
        moved
    }

    /// Deletes the item; selection pointing at it is cleared.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.items.len() != before
    }

    /// Wholesale replacement, used by history restore. Selection self-heals
    /// if its target no longer exists.
    pub fn set_items(&mut self, items: Vec<CanvasItem>) {
        self.items = items;
        self.sort_by_z();
        if let Some(selected) = self.selected.as_deref() {
            if !self.items.iter().any(|item| item.id == selected) {
                self.selected = None;
            }
        }
    }

    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        self.selected = None;
        had_items
    }

    /// Topmost item containing `point`, in template space.
    pub fn hit_test(&self, point: egui::Pos2) -> Option<&CanvasItem> {
        self.items.iter().rev().find(|item| item.frame.contains(point))
    }

    fn sort_by_z(&mut self) {
        self.items.sort_by_key(|item| item.z_index);
    }

    fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.z_index = index as u32 + 1;
        }
    }
}
