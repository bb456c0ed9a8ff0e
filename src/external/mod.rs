pub mod kml;
pub mod nominatim;
pub mod positioning;

use async_trait::async_trait;

use crate::entities::{Coordinates, PositionError, Suggestion, Waypoint};
use crate::error::Error;

/// Turns free text into candidate resolved locations.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn search(
        &self,
        input: &str,
        country_scope: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>, Error>;
}

/// Read-only list of points of interest, fetched once per session.
#[async_trait]
pub trait WaypointSource: Send + Sync {
    async fn fetch_waypoints(&self) -> Result<Vec<Waypoint>, Error>;
}

/// Single-shot device position.
#[async_trait]
pub trait Positioner: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}
