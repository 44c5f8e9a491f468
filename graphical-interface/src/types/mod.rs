mod marker;
pub use marker::{to_position, MarkerIcon, MarkerStyle};
