//! Itinerary loading and presence projection for the Santa tracker.
//!
//! The feed publishes a yearly tour with a placeholder year. [`projector`]
//! moves each stop onto the current year and tells whether the tour is
//! still to come, at the stop, or already gone.

pub mod clock;
pub mod config;
pub mod errors;
pub mod feed;
pub mod loader;
pub mod projector;
pub mod reanchor;
pub mod timer;
pub mod types;

pub use errors::{ConfigError, ItineraryError};
pub use projector::{project, project_itinerary, PresenceSummary, Projection};
pub use types::{Destination, FeedInstant, Itinerary, Location, Presence, ProjectedDestination};
