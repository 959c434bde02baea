mod app;
mod color;
mod config;
mod data;
mod format;
mod state;
mod ui;

use app::CustomerDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::resolve(std::env::args().skip(1));
    log::debug!("Startup configuration: {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Customer Segmentation Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(CustomerDashboardApp::new(&config)))),
    )
}
