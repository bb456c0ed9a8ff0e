use axum::extract::{Extension, Json};

use crate::entities::{BookingForm, BookingHandoff};
use crate::error::Error;
use crate::server::DynAPI;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(form): Json<BookingForm>,
) -> Result<Json<BookingHandoff>, Error> {
    let booking = api.request_booking(form).await?;

    Ok(booking.into())
}
