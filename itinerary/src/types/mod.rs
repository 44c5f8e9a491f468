mod location;
pub use location::Location;

mod feed_instant;
pub use feed_instant::FeedInstant;

mod destination;
pub use destination::{Destination, Itinerary};

mod projected;
pub use projected::{Presence, ProjectedDestination};
