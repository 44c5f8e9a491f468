mod destinations;
pub use destinations::Destinations;
