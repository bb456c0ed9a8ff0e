use async_trait::async_trait;

use super::{Engine, LOAD_ERROR_MESSAGE};
use crate::{
    api::WaypointAPI,
    entities::Waypoint,
    error::{invalid_input_error, Error},
};

#[async_trait]
impl WaypointAPI for Engine {
    /// Fetches the waypoint list. A failed fetch raises the load banner and
    /// leaves the list empty; it is never returned as an error.
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    async fn load_waypoints(&self) -> Result<Vec<Waypoint>, Error> {
        {
            let mut session = self.session.lock().await;
            session.is_loading = true;
            session.load_error = None;
        }
        self.revision.bump();

        let fetched = self.source.fetch_waypoints().await;

        let mut session = self.session.lock().await;
        session.is_loading = false;
        match fetched {
            Ok(waypoints) => {
                tracing::info!("loaded {} waypoints", waypoints.len());
                session.waypoints = waypoints;
            }
            Err(err) => {
                tracing::error!("waypoint fetch failed: {:?}", err);
                session.waypoints.clear();
                session.load_error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
        let waypoints = session.waypoints.clone();
        drop(session);

        self.revision.bump();

        Ok(waypoints)
    }

    async fn list_waypoints(&self) -> Result<Vec<Waypoint>, Error> {
        Ok(self.session.lock().await.waypoints.clone())
    }

    /// Returns the selection after the toggle, in stop order.
    #[tracing::instrument(skip(self))]
    async fn toggle_waypoint(&self, id: String) -> Result<Vec<Waypoint>, Error> {
        let mut session = self.session.lock().await;

        let waypoint = session
            .waypoints
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(invalid_input_error)?;

        let selected = session.selection.toggle(waypoint);
        tracing::debug!("{} {}", if selected { "selected" } else { "deselected" }, id);

        let selection = session.selection.as_slice().to_vec();
        drop(session);

        self.revision.bump();

        Ok(selection)
    }
}

#[tokio::test]
async fn failed_load_raises_banner() {
    use super::mocks::*;
    use crate::api::SessionAPI;

    let engine = engine(MockResolver::new(), MockSource::failing(), MockPositioner::unsupported());

    let waypoints = engine.load_waypoints().await.unwrap();
    assert!(waypoints.is_empty());

    let snapshot = engine.snapshot().await.unwrap();
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.load_error.as_deref(), Some(LOAD_ERROR_MESSAGE));
    assert!(engine.toggle_waypoint("a".into()).await.unwrap_err().is_invalid_input_error());
}

#[tokio::test]
async fn toggle_keeps_stop_order() {
    use super::mocks::*;
    use crate::api::{LocationAPI, RouteAPI};
    use crate::entities::{Coordinates, Field};

    let engine = engine(
        MockResolver::new(),
        MockSource::with(stops()),
        MockPositioner::at(Coordinates::new(-33.9, 18.4)),
    );
    assert_eq!(engine.load_waypoints().await.unwrap().len(), 3);
    engine.set_from_device_location(Field::Start).await.unwrap();

    engine.toggle_waypoint("a".into()).await.unwrap();
    engine.toggle_waypoint("b".into()).await.unwrap();
    let selection = engine.toggle_waypoint("c".into()).await.unwrap();
    let ids: Vec<&str> = selection.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    let selection = engine.toggle_waypoint("b".into()).await.unwrap();
    let ids: Vec<&str> = selection.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);

    let route = engine.compose_route().await.unwrap();
    assert_eq!(
        route.points,
        vec![
            Coordinates::new(-33.9, 18.4),
            Coordinates::new(-33.8, 18.5),
            Coordinates::new(-34.0, 19.0),
            Coordinates::new(-33.9, 18.4),
        ]
    );
}
