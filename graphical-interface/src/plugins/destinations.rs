use std::{cell::RefCell, rc::Rc};

use egui::{include_image, Color32, Image, ImageSource, Rect, Response, Stroke, Vec2};
use itinerary::ProjectedDestination;
use walkers::{Plugin, Projector};

use crate::{
    state::SelectionState,
    types::{to_position, MarkerIcon, MarkerStyle},
};

const MARKER_SIZE: f32 = 30.0;
const HALO_FILL: Color32 = Color32::from_rgba_premultiplied(200, 30, 30, 70);
const HALO_STROKE: Color32 = Color32::from_rgb(220, 40, 40);

pub struct Destinations<'a> {
    destinations: &'a [ProjectedDestination],
    selection_state: Rc<RefCell<SelectionState>>,
}

impl<'a> Destinations<'a> {
    pub fn new(
        destinations: &'a [ProjectedDestination],
        selection_state: Rc<RefCell<SelectionState>>,
    ) -> Self {
        Self {
            destinations,
            selection_state,
        }
    }
}

impl Plugin for Destinations<'_> {
    fn run(self: Box<Self>, ui: &mut egui::Ui, _response: &Response, projector: &Projector) {
        for destination in self.destinations {
            draw(
                destination,
                ui,
                projector,
                &mut self.selection_state.borrow_mut(),
            );
        }
    }
}

fn icon_image(icon: MarkerIcon) -> ImageSource<'static> {
    match icon {
        MarkerIcon::Tree => include_image!("../../assets/tree-marker.svg"),
        MarkerIcon::Santa => include_image!("../../assets/santa-marker.svg"),
        MarkerIcon::Gift => include_image!("../../assets/gift-marker.svg"),
    }
}

fn draw(
    destination: &ProjectedDestination,
    ui: &mut egui::Ui,
    projector: &Projector,
    selection_state: &mut SelectionState,
) {
    let screen_position = projector.project(to_position(&destination.location)).to_pos2();
    let style = MarkerStyle::for_presence(destination.presence());

    let symbol_size = Vec2::splat(MARKER_SIZE);

    let clickable_area = Rect::from_center_size(screen_position, symbol_size);
    let response = ui
        .allocate_rect(clickable_area, egui::Sense::click())
        .on_hover_text(format!("{}, {}", destination.city, destination.region));

    if style.highlighted {
        let radius = MARKER_SIZE * 0.75;
        ui.painter().circle_filled(screen_position, radius, HALO_FILL);
        ui.painter()
            .circle_stroke(screen_position, radius, Stroke::new(2.0, HALO_STROKE));
    }

    let mut image = Image::new(icon_image(style.icon)).fit_to_exact_size(symbol_size);
    if response.hovered() {
        image = image.tint(Color32::from_rgb(255, 230, 150));
    }

    ui.put(clickable_area, image);

    if response.clicked() {
        selection_state.toggle_destination_selection(&destination.id);
    }
}
