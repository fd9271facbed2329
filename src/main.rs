#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use customizer_canvas::CustomizerApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Product Customizer",
        options,
        Box::new(|cc| Ok(Box::new(CustomizerApp::new(cc)))),
    )
}
