use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use itinerary::{Itinerary, ProjectedDestination, Projection};

/// Tracks which destination has its popup open.
pub struct SelectionState {
    pub destination: Option<String>,
}

impl SelectionState {
    pub fn new() -> SelectionState {
        Self { destination: None }
    }

    /// If the provided destination is already selected, it will be deselected.
    /// Otherwise, it will be selected.
    pub fn toggle_destination_selection(&mut self, id: &str) {
        if self.destination.as_deref() == Some(id) {
            self.destination = None;
        } else {
            self.destination = Some(id.to_string());
        }
    }
}

/// Tracks the projection currently on screen.
pub struct ViewState {
    pub projection: Projection,
    itinerary: Option<Arc<Itinerary>>,
}

impl ViewState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            projection: Projection::empty(now),
            itinerary: None,
        }
    }

    /// Projects again when the sampled instant or the loaded itinerary changed
    /// since the last call. Returns whether the projection was rebuilt.
    pub fn refresh(&mut self, itinerary: Option<Arc<Itinerary>>, now: DateTime<Utc>) -> bool {
        let same_itinerary = match (&self.itinerary, &itinerary) {
            (Some(current), Some(latest)) => Arc::ptr_eq(current, latest),
            (None, None) => true,
            _ => false,
        };
        if same_itinerary && self.projection.evaluated_at == now {
            return false;
        }

        self.projection = Projection::evaluate(itinerary.as_deref(), &now.with_timezone(&Local));
        self.itinerary = itinerary;
        true
    }

    pub fn destination(&self, id: &str) -> Option<&ProjectedDestination> {
        self.projection.destinations.iter().find(|d| d.id == id)
    }
}
