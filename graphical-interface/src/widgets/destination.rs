use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};
use egui::{Color32, RichText};
use itinerary::{Presence, ProjectedDestination};

/// Popup with the schedule of the selected destination.
pub struct WidgetDestination {
    pub selected_destination: String,
}

impl WidgetDestination {
    pub fn new(selected_destination: &str) -> Self {
        Self {
            selected_destination: selected_destination.to_string(),
        }
    }

    /// Shows the popup. Returns `false` once the user closes it.
    pub fn show(&mut self, ctx: &egui::Context, destination: &ProjectedDestination) -> bool {
        let mut open = true;
        let screen_width = ctx.screen_rect().width();

        egui::Window::new(destination.city.as_str())
            .id(egui::Id::new(("destination", &self.selected_destination)))
            .resizable(false)
            .movable(false)
            .collapsible(true)
            .open(&mut open)
            .fixed_pos([screen_width - 340., 60.])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Location:").size(16.0).strong());
                    ui.label(
                        RichText::new(format!("{}, {}", destination.city, destination.region))
                            .size(16.0),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Arrival:").size(16.0).strong());
                    ui.label(RichText::new(format_stop_time(&destination.arrival, &Local)).size(16.0));
                });
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Departure:").size(16.0).strong());
                    ui.label(
                        RichText::new(format_stop_time(&destination.departure, &Local)).size(16.0),
                    );
                });
                ui.separator();
                ui.label(
                    RichText::new(presence_label(destination.presence()))
                        .size(16.0)
                        .color(presence_color(destination.presence())),
                );
            });

        open
    }
}

/// `Tue Dec 24 2024 @ 18:05` in the given time zone.
pub fn format_stop_time<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    instant
        .with_timezone(tz)
        .format("%a %b %d %Y @ %H:%M")
        .to_string()
}

pub fn presence_label(presence: Presence) -> &'static str {
    match presence {
        Presence::Upcoming => "Santa hasn't been here yet",
        Presence::Present => "Santa is here!",
        Presence::Departed => "Santa has been here",
    }
}

fn presence_color(presence: Presence) -> Color32 {
    match presence {
        Presence::Upcoming => Color32::from_rgb(120, 200, 120),
        Presence::Present => Color32::from_rgb(255, 90, 90),
        Presence::Departed => Color32::from_rgb(100, 160, 255),
    }
}
