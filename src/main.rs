mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::DdeaApp;
use config::Settings;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Diagonal Differential Expression Alley",
        options,
        Box::new(|_cc| Ok(Box::new(DdeaApp::new(settings)))),
    )
}
