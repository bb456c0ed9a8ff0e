use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::entities::{Field, LocationPoint, SuggestionState};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct AddressParams {
    address: String,
}

#[derive(Serialize, Deserialize)]
pub struct DifferentEndParams {
    enabled: bool,
}

pub async fn set_address(
    Extension(api): Extension<DynAPI>,
    Path(field): Path<Field>,
    Json(params): Json<AddressParams>,
) -> Result<Json<LocationPoint>, Error> {
    let point = api.set_from_text(field, params.address).await?;

    Ok(point.into())
}

pub async fn suggestions(
    Extension(api): Extension<DynAPI>,
    Path(field): Path<Field>,
) -> Result<Json<SuggestionState>, Error> {
    let state = api.suggestions(field).await?;

    Ok(state.into())
}

pub async fn select_suggestion(
    Extension(api): Extension<DynAPI>,
    Path((field, id)): Path<(Field, String)>,
) -> Result<Json<LocationPoint>, Error> {
    let point = api.set_from_suggestion(field, id).await?;

    Ok(point.into())
}

pub async fn dismiss(
    Extension(api): Extension<DynAPI>,
    Path(field): Path<Field>,
) -> Result<Json<()>, Error> {
    api.dismiss_suggestions(field).await?;

    Ok(().into())
}

/// `null` when another locate is already running.
pub async fn locate(
    Extension(api): Extension<DynAPI>,
    Path(field): Path<Field>,
) -> Result<Json<Option<LocationPoint>>, Error> {
    let point = api.set_from_device_location(field).await?;

    Ok(point.into())
}

pub async fn set_different_end(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<DifferentEndParams>,
) -> Result<Json<()>, Error> {
    api.set_use_different_end(params.enabled).await?;

    Ok(().into())
}
