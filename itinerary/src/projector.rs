use chrono::{DateTime, Datelike, TimeZone, Utc};
use log::warn;

use crate::{
    errors::ItineraryError,
    reanchor::{reanchor, TimeOfYear},
    types::{Destination, FeedInstant, Itinerary, Presence, ProjectedDestination},
};

/// Classifies every destination relative to `now`.
///
/// Schedules are moved onto `now`'s year in `now`'s time zone before being
/// compared. A destination counts as departed from its departure instant on,
/// and as present strictly after its arrival until then. The output keeps
/// the input order.
pub fn project<Tz: TimeZone>(
    destinations: &[Destination],
    now: &DateTime<Tz>,
) -> Vec<ProjectedDestination> {
    destinations
        .iter()
        .filter_map(|destination| match project_one(destination, now) {
            Ok(projected) => Some(projected),
            Err(e) => {
                warn!("Leaving destination '{}' off the map: {e}", destination.id);
                None
            }
        })
        .collect()
}

/// Same as [`project`], with a missing itinerary projecting to nothing.
pub fn project_itinerary<Tz: TimeZone>(
    itinerary: Option<&Itinerary>,
    now: &DateTime<Tz>,
) -> Vec<ProjectedDestination> {
    match itinerary {
        Some(itinerary) => project(&itinerary.destinations, now),
        None => Vec::new(),
    }
}

fn project_one<Tz: TimeZone>(
    destination: &Destination,
    now: &DateTime<Tz>,
) -> Result<ProjectedDestination, ItineraryError> {
    let tz = now.timezone();
    let year = now.year();

    let arrival = anchor(&destination.arrival, year, &tz)?;
    let departure = anchor(&destination.departure, year, &tz)?;

    let now = now.with_timezone(&Utc);
    let has_departed = now >= departure;
    let is_present = now > arrival && !has_departed;

    Ok(ProjectedDestination {
        id: destination.id.clone(),
        location: destination.location,
        city: destination.city.clone(),
        region: destination.region.clone(),
        arrival,
        departure,
        is_present,
        has_departed,
        extra: destination.extra.clone(),
    })
}

fn anchor<Tz: TimeZone>(
    instant: &FeedInstant,
    year: i32,
    tz: &Tz,
) -> Result<DateTime<Utc>, ItineraryError> {
    let time_of_year = TimeOfYear::of(&instant.wall_clock(tz));
    reanchor(time_of_year, year, tz).map(|anchored| anchored.with_timezone(&Utc))
}

/// Number of destinations in each state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresenceSummary {
    pub upcoming: usize,
    pub present: usize,
    pub departed: usize,
}

/// One evaluation of an itinerary at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub evaluated_at: DateTime<Utc>,
    pub destinations: Vec<ProjectedDestination>,
}

impl Projection {
    pub fn empty(evaluated_at: DateTime<Utc>) -> Self {
        Self {
            evaluated_at,
            destinations: Vec::new(),
        }
    }

    pub fn evaluate<Tz: TimeZone>(itinerary: Option<&Itinerary>, now: &DateTime<Tz>) -> Self {
        Self {
            evaluated_at: now.with_timezone(&Utc),
            destinations: project_itinerary(itinerary, now),
        }
    }

    /// The destination the tour is at right now, if any.
    pub fn current_stop(&self) -> Option<&ProjectedDestination> {
        self.destinations
            .iter()
            .find(|d| d.presence() == Presence::Present)
    }

    /// The departed destination that was left most recently.
    pub fn last_departed(&self) -> Option<&ProjectedDestination> {
        self.destinations
            .iter()
            .filter(|d| d.presence() == Presence::Departed)
            .max_by_key(|d| d.departure)
    }

    /// The upcoming destination with the earliest arrival.
    pub fn next_upcoming(&self) -> Option<&ProjectedDestination> {
        self.destinations
            .iter()
            .filter(|d| d.presence() == Presence::Upcoming)
            .min_by_key(|d| d.arrival)
    }

    pub fn summary(&self) -> PresenceSummary {
        self.destinations
            .iter()
            .fold(PresenceSummary::default(), |mut summary, d| {
                match d.presence() {
                    Presence::Upcoming => summary.upcoming += 1,
                    Presence::Present => summary.present += 1,
                    Presence::Departed => summary.departed += 1,
                }
                summary
            })
    }
}
