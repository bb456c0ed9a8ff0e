use async_trait::async_trait;

use super::{Engine, BOOKING_THANKS_MESSAGE};
use crate::{
    api::BookingAPI,
    entities::{BookingForm, BookingHandoff},
    error::{invalid_state_error, Error},
    handoff,
};

#[async_trait]
impl BookingAPI for Engine {
    #[tracing::instrument(skip(self, form), fields(people = form.people_count))]
    async fn request_booking(&self, form: BookingForm) -> Result<BookingHandoff, Error> {
        let mailto = {
            let session = self.session.lock().await;
            let plan = session.plan();

            if !plan.is_bookable() {
                return Err(invalid_state_error());
            }
            form.validate()?;

            handoff::booking_link(&self.config.booking_address, &form, &plan)
        };

        self.notifier.show(BOOKING_THANKS_MESSAGE.to_string()).await;

        Ok(BookingHandoff { mailto })
    }
}

#[tokio::test]
async fn booking_requires_a_bookable_route() {
    use super::mocks::*;
    use crate::api::{LocationAPI, SessionAPI, WaypointAPI};
    use crate::entities::{sample_form, Coordinates, Field};

    let engine = engine(
        MockResolver::new(),
        MockSource::with(stops()),
        MockPositioner::at(Coordinates::new(-33.9, 18.4)),
    );
    engine.load_waypoints().await.unwrap();

    let err = engine.request_booking(sample_form()).await.unwrap_err();
    assert!(err.is_invalid_state_error());

    engine.set_from_device_location(Field::Start).await.unwrap();
    engine.toggle_waypoint("a".into()).await.unwrap();

    let incomplete = BookingForm {
        phone: " ".into(),
        ..sample_form()
    };
    let err = engine.request_booking(incomplete).await.unwrap_err();
    assert!(err.is_invalid_input_error());

    let booking = engine.request_booking(sample_form()).await.unwrap();
    assert!(booking.mailto.starts_with("mailto:info@beerroute.co.za?subject="));
    assert!(booking.mailto.contains("Alpha%20Brewing"));

    let snapshot = engine.snapshot().await.unwrap();
    assert_eq!(snapshot.notification.as_deref(), Some(BOOKING_THANKS_MESSAGE));
}
