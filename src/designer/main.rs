mod app;
mod preview;

use app::CaseDesignerApp;
use case_studio::logging::init_logging;
use case_studio::settings::Settings;
use tracing::warn;

fn main() -> eframe::Result<()> {
    init_logging();

    let settings = Settings::load().unwrap_or_else(|e| {
        warn!(error = %e, "Could not load settings, using defaults");
        Settings::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 800.0])
            .with_min_inner_size([640.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Phone Case Designer",
        options,
        Box::new(|cc| Ok(Box::new(CaseDesignerApp::new(cc, settings)))),
    )
}
