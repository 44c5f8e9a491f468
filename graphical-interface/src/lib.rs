use itinerary::config::TrackerConfig;

mod map;
mod plugins;
mod state;
mod types;
mod widgets;
mod windows;
use map::TrackerApp;

pub fn run(config: TrackerConfig) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Santa Tracker",
        options,
        Box::new(move |cc| Ok(Box::new(TrackerApp::new(cc.egui_ctx.clone(), &config)))),
    )
}
