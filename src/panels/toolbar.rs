use egui::Ui;

use crate::editor::Editor;
use crate::export::ExportFormat;

/// Something the toolbar asked the host shell to do.
#[derive(Clone, Copy, Debug)]
pub enum ToolbarAction {
    Export(ExportFormat),
    SaveDesign,
}

/// Top toolbar: edit operations, undo/redo, zoom, template picker,
/// export. Everything routes through the [`Editor`] façade.
pub fn toolbar(ui: &mut Ui, editor: &mut Editor) -> Option<ToolbarAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        if ui.button("Add text").clicked() {
            editor.add_text("Your text");
        }
        if ui.button("Clear").clicked() {
            editor.clear_canvas();
        }
        ui.label("(drop an image file onto the canvas to add it)");

        ui.separator();

        if ui
            .add_enabled(editor.can_undo(), egui::Button::new("⟲ Undo"))
            .clicked()
        {
            editor.undo();
        }
        if ui
            .add_enabled(editor.can_redo(), egui::Button::new("⟳ Redo"))
            .clicked()
        {
            editor.redo();
        }

        ui.separator();

        if ui
            .add_enabled(editor.can_zoom_out(), egui::Button::new("−"))
            .clicked()
        {
            editor.zoom_out();
        }
        if ui
            .button(format!("{:.0}%", editor.zoom() * 100.0))
            .clicked()
        {
            editor.zoom_reset();
        }
        if ui
            .add_enabled(editor.can_zoom_in(), egui::Button::new("+"))
            .clicked()
        {
            editor.zoom_in();
        }

        ui.separator();

        let active = editor
            .template()
            .map(|t| t.name().to_owned())
            .unwrap_or_else(|| "<none>".to_owned());
        let names: Vec<String> = editor.template_names().map(str::to_owned).collect();
        egui::ComboBox::from_label("Template")
            .selected_text(active.clone())
            .show_ui(ui, |ui| {
                for name in names {
                    if ui.selectable_label(name == active, &name).clicked() {
                        editor.set_active_template(&name);
                    }
                }
            });

        ui.separator();

        for (label, format) in [
            ("SVG", ExportFormat::Svg),
            ("PNG", ExportFormat::Png),
            ("JPEG", ExportFormat::Jpeg),
            ("PDF", ExportFormat::Pdf),
        ] {
            if ui.button(label).clicked() {
                action = Some(ToolbarAction::Export(format));
            }
        }

        ui.separator();

        if ui.button("💾 Save design").clicked() {
            action = Some(ToolbarAction::SaveDesign);
        }
    });

    action
}
