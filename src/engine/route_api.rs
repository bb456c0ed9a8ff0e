use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::helpers::{Revision, Timer};
use super::Engine;
use crate::{
    api::RouteAPI,
    entities::{fit, Route, Viewport},
    error::Error,
};

#[derive(Debug, Default)]
struct SettleState {
    timer: Timer,
    settled: bool,
}

/// Tracks whether a freshly mounted map has had time to size itself.
#[derive(Clone, Debug)]
pub struct MapSettle {
    state: Arc<Mutex<SettleState>>,
    delay: Duration,
    revision: Revision,
}

impl MapSettle {
    pub fn new(delay: Duration, revision: &Revision) -> Self {
        Self {
            state: Arc::new(Mutex::new(SettleState::default())),
            delay,
            revision: revision.clone(),
        }
    }

    pub async fn mount(&self) {
        let mut state = self.state.lock().await;
        let generation = state.timer.restart();
        state.settled = false;

        let this = self.clone();
        state.timer.set_task(tokio::spawn(async move {
            tokio::time::sleep(this.delay).await;

            let mut state = this.state.lock().await;
            if state.timer.is_current(generation) {
                state.settled = true;
                drop(state);
                this.revision.bump();
            }
        }));
        drop(state);

        self.revision.bump();
    }

    pub async fn is_settled(&self) -> bool {
        self.state.lock().await.settled
    }

    pub async fn cancel(&self) {
        self.state.lock().await.timer.restart();
    }
}

#[async_trait]
impl RouteAPI for Engine {
    async fn compose_route(&self) -> Result<Route, Error> {
        Ok(self.session.lock().await.plan().compose())
    }

    async fn navigation_url(&self) -> Result<Option<String>, Error> {
        let session = self.session.lock().await;
        Ok(session.plan().navigation_url(&self.config.navigation_base))
    }

    async fn fit_viewport(&self) -> Result<Viewport, Error> {
        Ok(fit(self.session.lock().await.visible_points()))
    }
}

#[tokio::test(start_paused = true)]
async fn map_settles_after_delay() {
    let settle = MapSettle::new(Duration::from_millis(100), &Revision::new());
    assert!(!settle.is_settled().await);

    settle.mount().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!settle.is_settled().await);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(settle.is_settled().await);
}

#[tokio::test]
async fn route_follows_selection_and_start() {
    use super::mocks::*;
    use crate::api::{LocationAPI, WaypointAPI};
    use crate::entities::{Coordinates, DEFAULT_CENTER};

    let engine = engine(
        MockResolver::new(),
        MockSource::with(stops()),
        MockPositioner::at(Coordinates::new(-33.9, 18.4)),
    );
    assert_eq!(
        engine.fit_viewport().await.unwrap(),
        Viewport::Center {
            center: DEFAULT_CENTER,
            zoom: 6
        }
    );

    engine.load_waypoints().await.unwrap();
    engine.set_from_device_location(crate::entities::Field::Start).await.unwrap();
    engine.toggle_waypoint("a".into()).await.unwrap();
    engine.toggle_waypoint("b".into()).await.unwrap();

    let route = engine.compose_route().await.unwrap();
    assert!(route.actionable);
    assert!(route.bookable);
    assert_eq!(route.points.len(), 4);
    assert_eq!(route.points[0], route.points[3]);

    let url = engine.navigation_url().await.unwrap().unwrap();
    assert_eq!(
        url,
        "https://www.google.com/maps/dir/?api=1&origin=-33.9,18.4&destination=-33.9,18.4\
         &waypoints=-33.8,18.5|-33.7,18.6&travelmode=driving"
    );

    engine.toggle_waypoint("a".into()).await.unwrap();
    engine.toggle_waypoint("b".into()).await.unwrap();
    let route = engine.compose_route().await.unwrap();
    assert_eq!(route.points, vec![Coordinates::new(-33.9, 18.4)]);
    assert!(!route.actionable);
    assert_eq!(engine.navigation_url().await.unwrap(), None);

    match engine.fit_viewport().await.unwrap() {
        Viewport::Bounds {
            south_west,
            north_east,
            ..
        } => {
            assert_eq!(south_west, Coordinates::new(-34.0, 18.4));
            assert_eq!(north_east, Coordinates::new(-33.7, 19.0));
        }
        viewport => panic!("expected bounds, got {:?}", viewport),
    }
}
