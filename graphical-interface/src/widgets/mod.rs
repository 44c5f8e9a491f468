mod destination;
mod status;
pub use destination::WidgetDestination;
pub use status::WidgetStatus;
