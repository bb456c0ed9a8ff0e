use async_trait::async_trait;
use tokio::time::timeout;

use super::helpers::BusyGuard;
use super::Engine;
use crate::{
    api::LocationAPI,
    entities::{Field, LocationPoint, PositionError},
    error::{invalid_input_error, position_error, Error},
};

#[async_trait]
impl LocationAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn set_from_text(&self, field: Field, address: String) -> Result<LocationPoint, Error> {
        let point = LocationPoint::from_text(address.clone());

        self.session.lock().await.set_point(field, point.clone());
        self.revision.bump();

        self.search(field).restart(&address).await;

        Ok(point)
    }

    #[tracing::instrument(skip(self))]
    async fn set_from_suggestion(
        &self,
        field: Field,
        suggestion_id: String,
    ) -> Result<LocationPoint, Error> {
        let search = self.search(field);
        let suggestion = search
            .find(&suggestion_id)
            .await
            .ok_or_else(invalid_input_error)?;
        search.supersede().await;

        let point = LocationPoint::from_suggestion(&suggestion);
        self.session.lock().await.set_point(field, point.clone());
        self.revision.bump();

        Ok(point)
    }

    #[tracing::instrument(skip(self))]
    async fn set_from_device_location(
        &self,
        field: Field,
    ) -> Result<Option<LocationPoint>, Error> {
        let _guard = match BusyGuard::acquire(&self.locating, &self.revision) {
            Some(guard) => guard,
            None => {
                tracing::debug!("locate already in progress");
                return Ok(None);
            }
        };

        self.search(field).supersede().await;

        let position = timeout(
            self.config.geolocation_timeout,
            self.positioner.current_position(),
        )
        .await
        .unwrap_or(Err(PositionError::Timeout));

        match position {
            Ok(coords) => {
                let point = LocationPoint::from_device(coords);
                self.session.lock().await.set_point(field, point.clone());
                self.revision.bump();

                Ok(Some(point))
            }
            Err(cause) => {
                tracing::warn!("device location failed: {:?}", cause);
                self.notifier.show(cause.message().to_string()).await;

                Err(position_error(cause))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn set_use_different_end(&self, enabled: bool) -> Result<(), Error> {
        let mut session = self.session.lock().await;
        if session.use_different_end == enabled {
            return Ok(());
        }
        session.use_different_end = enabled;
        drop(session);

        if !enabled {
            self.end_search.supersede().await;
        }
        self.revision.bump();

        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn suggestion_selection_resolves_point() {
    use super::mocks::*;
    use crate::api::SuggestionAPI;
    use crate::entities::Coordinates;
    use std::time::Duration;

    let engine = engine(MockResolver::new(), MockSource::empty(), MockPositioner::unsupported());

    let typed = engine.set_from_text(Field::Start, "Cape Town".into()).await.unwrap();
    assert_eq!(typed.coords, None);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let point = engine
        .set_from_suggestion(Field::Start, "Cape Town-1".into())
        .await
        .unwrap();

    assert_eq!(point.address, "Cape Town 1");
    assert_eq!(point.coords, Some(Coordinates::new(-33.91, 18.4)));
    assert!(engine.suggestions(Field::Start).await.unwrap().suggestions.is_empty());

    let err = engine
        .set_from_suggestion(Field::Start, "Cape Town-1".into())
        .await
        .unwrap_err();
    assert!(err.is_invalid_input_error());
}

#[tokio::test]
async fn device_location_sets_sentinel() {
    use super::mocks::*;
    use crate::entities::{Coordinates, CURRENT_LOCATION};

    let here = Coordinates::new(-33.92, 18.42);
    let engine = engine(MockResolver::new(), MockSource::empty(), MockPositioner::at(here));

    let point = engine
        .set_from_device_location(Field::End)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(point.address, CURRENT_LOCATION);
    assert_eq!(point.coords, Some(here));
    assert_eq!(engine.session.lock().await.end, point);
}

#[tokio::test(start_paused = true)]
async fn concurrent_locate_is_a_no_op() {
    use super::mocks::*;
    use crate::entities::Coordinates;
    use std::time::Duration;

    let positioner = MockPositioner {
        delay: Duration::from_secs(1),
        ..MockPositioner::at(Coordinates::new(-33.92, 18.42))
    };
    let engine = engine(MockResolver::new(), MockSource::empty(), positioner);

    let (first, second) = futures::join!(
        engine.set_from_device_location(Field::Start),
        engine.set_from_device_location(Field::Start),
    );

    assert!(first.unwrap().is_some());
    assert_eq!(second.unwrap(), None);
    assert!(!engine.locating.load(std::sync::atomic::Ordering::Acquire));
}

#[tokio::test]
async fn locate_failure_keeps_point_and_notifies() {
    use super::mocks::*;
    use crate::api::SessionAPI;

    for cause in [
        PositionError::PermissionDenied,
        PositionError::PositionUnavailable,
        PositionError::Unsupported,
    ] {
        let engine = engine(
            MockResolver::new(),
            MockSource::empty(),
            MockPositioner::failing(cause),
        );
        engine.set_from_text(Field::Start, "Somerset West".into()).await.unwrap();

        let err = engine.set_from_device_location(Field::Start).await.unwrap_err();
        assert!(err.is_position_error());
        assert_eq!(err.message, cause.message());

        let snapshot = engine.snapshot().await.unwrap();
        assert_eq!(snapshot.start.address, "Somerset West");
        assert_eq!(snapshot.notification.as_deref(), Some(cause.message()));
        assert!(!snapshot.locating);
    }
}

#[tokio::test(start_paused = true)]
async fn slow_locate_times_out() {
    use super::mocks::*;
    use crate::entities::Coordinates;
    use std::time::Duration;

    let positioner = MockPositioner {
        delay: Duration::from_secs(60),
        ..MockPositioner::at(Coordinates::new(-33.92, 18.42))
    };
    let engine = engine(MockResolver::new(), MockSource::empty(), positioner);

    let err = engine.set_from_device_location(Field::Start).await.unwrap_err();

    assert_eq!(err, position_error(PositionError::Timeout));
    assert_eq!(engine.session.lock().await.start.coords, None);
}

#[tokio::test]
async fn round_trip_toggle_is_idempotent() {
    use super::mocks::*;

    let engine = engine(MockResolver::new(), MockSource::empty(), MockPositioner::unsupported());
    let revision = engine.revision.current();

    engine.set_use_different_end(false).await.unwrap();
    assert_eq!(engine.revision.current(), revision);

    engine.set_use_different_end(true).await.unwrap();
    assert!(engine.session.lock().await.use_different_end);
    assert!(engine.revision.current() > revision);
}

#[tokio::test(start_paused = true)]
async fn round_trip_drops_pending_end_lookup() {
    use super::mocks::*;
    use std::sync::Arc;
    use std::time::Duration;

    let resolver = Arc::new(MockResolver::new());
    let engine = engine_with(resolver.clone(), MockSource::empty(), MockPositioner::unsupported());

    engine.set_use_different_end(true).await.unwrap();
    engine.set_from_text(Field::End, "Franschhoek".into()).await.unwrap();
    engine.set_use_different_end(false).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(resolver.calls().is_empty());
    assert_eq!(engine.session.lock().await.end.address, "Franschhoek");
}
