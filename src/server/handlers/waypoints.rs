use axum::extract::{Extension, Json, Path};

use crate::entities::Waypoint;
use crate::error::Error;
use crate::server::DynAPI;

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Waypoint>>, Error> {
    let waypoints = api.list_waypoints().await?;

    Ok(waypoints.into())
}

/// Responds with the selection in stop order.
pub async fn toggle(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Waypoint>>, Error> {
    let selection = api.toggle_waypoint(id).await?;

    Ok(selection.into())
}
