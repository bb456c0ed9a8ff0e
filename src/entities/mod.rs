mod booking;
mod coordinates;
mod location;
mod position;
mod route;
mod selection;
mod session;
mod suggestion;
mod viewport;
mod waypoint;

pub use booking::{BookingForm, BookingHandoff};
pub use coordinates::Coordinates;
pub use location::{Field, LocationPoint, CURRENT_LOCATION};
pub use position::PositionError;
pub use route::{Route, RoutePlan, TRAVEL_MODE};
pub use selection::Selection;
pub use session::Snapshot;
pub use suggestion::{is_searchable, Suggestion, SuggestionState, MAX_SUGGESTIONS};
pub use viewport::{bounding_rect, fit, Viewport, DEFAULT_CENTER, DEFAULT_ZOOM, FIT_PADDING};
pub use waypoint::Waypoint;

#[cfg(test)]
pub use booking::sample_form;
