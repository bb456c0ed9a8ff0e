use async_trait::async_trait;
use tokio::sync::watch;

use crate::entities::{
    BookingForm, BookingHandoff, Field, LocationPoint, Route, Snapshot, SuggestionState, Viewport,
    Waypoint,
};
use crate::error::Error;

#[async_trait]
pub trait LocationAPI {
    async fn set_from_text(&self, field: Field, address: String) -> Result<LocationPoint, Error>;
    async fn set_from_suggestion(
        &self,
        field: Field,
        suggestion_id: String,
    ) -> Result<LocationPoint, Error>;
    /// `Ok(None)` when a locate is already in progress.
    async fn set_from_device_location(&self, field: Field)
        -> Result<Option<LocationPoint>, Error>;
    async fn set_use_different_end(&self, enabled: bool) -> Result<(), Error>;
}

#[async_trait]
pub trait SuggestionAPI {
    async fn suggestions(&self, field: Field) -> Result<SuggestionState, Error>;
    async fn dismiss_suggestions(&self, field: Field) -> Result<(), Error>;
}

#[async_trait]
pub trait WaypointAPI {
    async fn load_waypoints(&self) -> Result<Vec<Waypoint>, Error>;
    async fn list_waypoints(&self) -> Result<Vec<Waypoint>, Error>;
    async fn toggle_waypoint(&self, id: String) -> Result<Vec<Waypoint>, Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn compose_route(&self) -> Result<Route, Error>;
    async fn navigation_url(&self) -> Result<Option<String>, Error>;
    async fn fit_viewport(&self) -> Result<Viewport, Error>;
}

#[async_trait]
pub trait SessionAPI {
    async fn snapshot(&self) -> Result<Snapshot, Error>;
    async fn notify(&self, message: String) -> Result<(), Error>;
    async fn mount_map(&self) -> Result<(), Error>;
    fn subscribe(&self) -> watch::Receiver<u64>;
}

#[async_trait]
pub trait BookingAPI {
    async fn request_booking(&self, form: BookingForm) -> Result<BookingHandoff, Error>;
}

pub trait API: LocationAPI + SuggestionAPI + WaypointAPI + RouteAPI + SessionAPI + BookingAPI {}
