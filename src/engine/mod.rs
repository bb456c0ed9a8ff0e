mod booking_api;
mod helpers;
mod location_api;
mod notifier;
mod route_api;
mod session_api;
mod suggestion_api;
mod waypoint_api;

#[cfg(test)]
mod mocks;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    api::API,
    config::Config,
    entities::{Coordinates, Field, LocationPoint, RoutePlan, Selection, Waypoint},
    error::Error,
    external::{
        kml::KmlSource, nominatim::Nominatim, positioning, AddressResolver, Positioner,
        WaypointSource,
    },
};

use helpers::Revision;
use notifier::Notifier;
use route_api::MapSettle;
use suggestion_api::SuggestionField;

pub const LOAD_ERROR_MESSAGE: &str =
    "Failed to load brewery data from the map. Please ensure the map is public and accessible.";
pub const BOOKING_THANKS_MESSAGE: &str =
    "Thank you for your request, we will get back to you as soon as possible by whatsapp.";

/// The single source of truth shared by every view of a planning session.
#[derive(Debug, Default)]
struct Session {
    start: LocationPoint,
    end: LocationPoint,
    use_different_end: bool,
    waypoints: Vec<Waypoint>,
    selection: Selection,
    is_loading: bool,
    load_error: Option<String>,
}

impl Session {
    fn set_point(&mut self, field: Field, point: LocationPoint) {
        match field {
            Field::Start => self.start = point,
            Field::End => self.end = point,
        }
    }

    fn plan(&self) -> RoutePlan<'_> {
        RoutePlan {
            start: &self.start,
            end: &self.end,
            use_different_end: self.use_different_end,
            selection: self.selection.as_slice(),
        }
    }

    /// Every loaded waypoint plus every resolved route point.
    fn visible_points(&self) -> Vec<Coordinates> {
        let mut points: Vec<Coordinates> = self.waypoints.iter().map(|w| w.coords).collect();
        points.extend(self.plan().points());
        points
    }
}

/// One planning session. Views read it through snapshots and change it only
/// through the API traits.
pub struct Engine {
    id: Uuid,
    config: Config,
    source: Arc<dyn WaypointSource>,
    positioner: Arc<dyn Positioner>,
    session: Mutex<Session>,
    start_search: SuggestionField,
    end_search: SuggestionField,
    notifier: Notifier,
    map: MapSettle,
    locating: Arc<AtomicBool>,
    revision: Revision,
}

impl Engine {
    pub fn new(
        config: Config,
        resolver: Arc<dyn AddressResolver>,
        source: Arc<dyn WaypointSource>,
        positioner: Arc<dyn Positioner>,
    ) -> Self {
        let revision = Revision::new();

        Self {
            id: Uuid::new_v4(),
            start_search: SuggestionField::new(Field::Start, resolver.clone(), &config, &revision),
            end_search: SuggestionField::new(Field::End, resolver, &config, &revision),
            notifier: Notifier::new(config.notification_ttl, &revision),
            map: MapSettle::new(config.map_settle_delay, &revision),
            config,
            source,
            positioner,
            session: Mutex::new(Session::default()),
            locating: Arc::new(AtomicBool::new(false)),
            revision,
        }
    }

    /// Wires the real providers described by `config`.
    #[tracing::instrument(name = "Engine::from_config", skip_all)]
    pub fn from_config(config: Config) -> Result<Self, Error> {
        let resolver = Arc::new(Nominatim::new(&config)?);
        let source = Arc::new(KmlSource::new(&config)?);
        let positioner = positioning::from_config(&config);

        Ok(Self::new(config, resolver, source, positioner))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    fn search(&self, field: Field) -> &SuggestionField {
        match field {
            Field::Start => &self.start_search,
            Field::End => &self.end_search,
        }
    }

    /// Cancels every pending timer and disregards in-flight lookups.
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub async fn shutdown(&self) {
        futures::join!(
            self.start_search.supersede(),
            self.end_search.supersede(),
            self.notifier.cancel(),
            self.map.cancel(),
        );
    }
}

impl API for Engine {}

#[tokio::test]
async fn new_engine() {
    use crate::entities::Viewport;
    use mocks::*;

    let engine = engine(MockResolver::new(), MockSource::empty(), MockPositioner::unsupported());
    let snapshot = crate::api::SessionAPI::snapshot(&engine).await.unwrap();

    assert_eq!(snapshot.session_id, engine.id());
    assert_eq!(snapshot.start, LocationPoint::default());
    assert!(snapshot.selection.is_empty());
    assert!(!snapshot.route.actionable);
    assert_eq!(snapshot.viewport, Viewport::default());
    assert_eq!(snapshot.notification, None);
}

#[tokio::test(start_paused = true)]
async fn shutdown_drops_pending_lookups() {
    use crate::api::{LocationAPI, SuggestionAPI};
    use mocks::*;
    use std::time::Duration;

    let resolver = Arc::new(MockResolver::new());
    let engine = engine_with(resolver.clone(), MockSource::empty(), MockPositioner::unsupported());

    engine.set_from_text(Field::Start, "Stellenbosch".into()).await.unwrap();
    engine.set_from_text(Field::End, "Franschhoek".into()).await.unwrap();
    engine.shutdown().await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(resolver.calls().is_empty());
    assert!(!engine.suggestions(Field::End).await.unwrap().searching);
}
