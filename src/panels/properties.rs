use egui::Ui;

use crate::editor::Editor;
use crate::item::{FontStyle, FontWeight, ItemKind, TextAlign, TextItem, TextStroke};
use crate::scene::LayerDirection;

/// Right-hand sidebar: per-item fields for the selected item. Each change
/// is a discrete edit and commits one history entry via the editor.
pub fn properties_panel(ui: &mut Ui, editor: &mut Editor) {
    let Some(item) = editor.scene().selected_item() else {
        ui.label("Nothing selected.");
        return;
    };
    let id = item.id.clone();
    let mut locked = item.locked;
    let kind = item.kind.clone();
    let frame = item.frame;

    ui.heading(match kind {
        ItemKind::Image(_) => "Image",
        ItemKind::Text(_) => "Text",
    });
    ui.label(format!(
        "{}×{} at ({}, {}), {}°",
        frame.width, frame.height, frame.x, frame.y, frame.rotation
    ));

    if ui.checkbox(&mut locked, "Locked").changed() {
        editor.set_locked(&id, locked);
    }

    ui.separator();
    ui.label("Layer");
    ui.horizontal(|ui| {
        for (label, direction) in [
            ("▲", LayerDirection::Up),
            ("▼", LayerDirection::Down),
            ("⤒", LayerDirection::Front),
            ("⤓", LayerDirection::Back),
        ] {
            if ui.button(label).clicked() {
                editor.move_layer(&id, direction);
            }
        }
    });

    ui.separator();
    match kind {
        ItemKind::Image(image) => {
            let mut opacity = image.opacity;
            let response = ui.add(
                egui::Slider::new(&mut opacity, 0.0..=1.0).text("Opacity"),
            );
            if response.changed() {
                editor.update_item(&id, |item| {
                    if let ItemKind::Image(image) = &mut item.kind {
                        image.opacity = opacity;
                    }
                });
            }
        }
        ItemKind::Text(text) => {
            let mut edited = text.clone();
            if text_fields(ui, &mut edited) {
                editor.update_item(&id, |item| {
                    if let ItemKind::Text(text) = &mut item.kind {
                        *text = edited;
                    }
                });
            }
        }
    }

    ui.separator();
    if ui.button("🗑 Delete item").clicked() {
        editor.remove_item(&id);
    }
}

/// Edits the copy in place; returns true when anything changed.
fn text_fields(ui: &mut Ui, text: &mut TextItem) -> bool {
    let mut changed = false;

    changed |= ui.text_edit_multiline(&mut text.text).changed();
    changed |= ui
        .add(egui::DragValue::new(&mut text.font_size).range(6.0..=200.0).prefix("Size "))
        .changed();
    ui.horizontal(|ui| {
        ui.label("Family");
        changed |= ui.text_edit_singleline(&mut text.font_family).changed();
    });
    ui.horizontal(|ui| {
        ui.label("Color");
        changed |= ui.text_edit_singleline(&mut text.color).changed();
    });

    ui.horizontal(|ui| {
        changed |= ui
            .selectable_value(&mut text.font_weight, FontWeight::Normal, "Regular")
            .changed();
        changed |= ui
            .selectable_value(&mut text.font_weight, FontWeight::Bold, "Bold")
            .changed();
        changed |= ui
            .selectable_value(&mut text.font_style, FontStyle::Normal, "Upright")
            .changed();
        changed |= ui
            .selectable_value(&mut text.font_style, FontStyle::Italic, "Italic")
            .changed();
    });
    ui.horizontal(|ui| {
        for (label, align) in [
            ("Left", TextAlign::Left),
            ("Center", TextAlign::Center),
            ("Right", TextAlign::Right),
        ] {
            changed |= ui.selectable_value(&mut text.text_align, align, label).changed();
        }
    });

    changed |= ui
        .add(
            egui::DragValue::new(&mut text.line_height)
                .range(0.5..=4.0)
                .speed(0.05)
                .prefix("Line height "),
        )
        .changed();
    changed |= ui
        .add(
            egui::DragValue::new(&mut text.letter_spacing)
                .range(-5.0..=40.0)
                .speed(0.1)
                .prefix("Letter spacing "),
        )
        .changed();
    changed |= ui.checkbox(&mut text.underline, "Underline").changed();

    let mut outlined = text.stroke.is_some();
    if ui.checkbox(&mut outlined, "Outline").changed() {
        text.stroke = outlined.then(|| TextStroke {
            color: "#000000".to_owned(),
            width: 1.0,
        });
        changed = true;
    }
    if let Some(stroke) = &mut text.stroke {
        ui.horizontal(|ui| {
            ui.label("Outline color");
            changed |= ui.text_edit_singleline(&mut stroke.color).changed();
        });
        changed |= ui
            .add(
                egui::DragValue::new(&mut stroke.width)
                    .range(0.1..=10.0)
                    .speed(0.1)
                    .prefix("Outline width "),
            )
            .changed();
    }

    changed
}
