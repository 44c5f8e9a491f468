use chrono::Local;
use egui::{Color32, RichText};
use itinerary::{loader::LoadState, Projection};

/// Panel telling where Santa is and how the feed is doing.
pub struct WidgetStatus;

impl WidgetStatus {
    pub fn show(&self, ctx: &egui::Context, load_state: &LoadState, projection: &Projection) {
        egui::Window::new("Santa Tracker")
            .resizable(false)
            .movable(false)
            .collapsible(true)
            .fixed_pos([20.0, 20.0])
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(whereabouts(projection))
                        .strong()
                        .size(18.0)
                        .color(Color32::from_rgb(220, 40, 40)),
                );
                ui.separator();

                let summary = projection.summary();
                ui.label(format!(
                    "{} visited · {} current · {} to go",
                    summary.departed, summary.present, summary.upcoming
                ));
                ui.label(
                    RichText::new(feed_label(load_state))
                        .size(12.0)
                        .color(Color32::from_gray(160)),
                );
                ui.label(
                    RichText::new(format!(
                        "Updated {}",
                        projection
                            .evaluated_at
                            .with_timezone(&Local)
                            .format("%H:%M:%S")
                    ))
                    .size(12.0)
                    .color(Color32::from_gray(160)),
                );
            });
    }
}

/// One line describing the current position of the tour.
pub fn whereabouts(projection: &Projection) -> String {
    if let Some(stop) = projection.current_stop() {
        return format!("Santa is in {}, {}", stop.city, stop.region);
    }
    if let Some(stop) = projection.last_departed() {
        if projection.next_upcoming().is_some() {
            return format!("Santa just left {}, {}", stop.city, stop.region);
        }
        return "Santa has finished his tour".to_string();
    }
    if projection.destinations.is_empty() {
        return "No destinations to show".to_string();
    }
    "Santa hasn't taken off yet".to_string()
}

pub fn feed_label(load_state: &LoadState) -> String {
    match load_state {
        LoadState::Pending => "Loading route...".to_string(),
        LoadState::Loaded(itinerary) => format!("Route of {} stops loaded", itinerary.len()),
        LoadState::Unavailable(reason) => format!("Route unavailable: {reason}"),
    }
}
