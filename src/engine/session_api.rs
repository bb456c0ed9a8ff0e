use std::sync::atomic::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;

use super::Engine;
use crate::{
    api::SessionAPI,
    entities::{fit, Snapshot},
    error::Error,
    handoff,
};

#[async_trait]
impl SessionAPI for Engine {
    /// Every derived value in the snapshot is computed from one locked read
    /// of the session, so route, links and viewport always agree.
    async fn snapshot(&self) -> Result<Snapshot, Error> {
        let revision = self.revision.current();

        let session = self.session.lock().await;
        let plan = session.plan();
        let route = plan.compose();
        let navigation_url = plan.navigation_url(&self.config.navigation_base);
        let share = navigation_url.as_deref().map(handoff::share_links);
        let viewport = fit(session.visible_points());

        let start = session.start.clone();
        let end = session.end.clone();
        let use_different_end = session.use_different_end;
        let waypoints = session.waypoints.clone();
        let selection = session.selection.as_slice().to_vec();
        let is_loading = session.is_loading;
        let load_error = session.load_error.clone();
        drop(session);

        Ok(Snapshot {
            session_id: self.id,
            revision,
            taken_at: Utc::now(),
            start,
            end,
            use_different_end,
            waypoints,
            selection,
            route,
            navigation_url,
            share,
            viewport,
            map_settled: self.map.is_settled().await,
            notification: self.notifier.current().await,
            is_loading,
            load_error,
            locating: self.locating.load(Ordering::Acquire),
            start_suggestions: self.start_search.state().await,
            end_suggestions: self.end_search.state().await,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn notify(&self, message: String) -> Result<(), Error> {
        self.notifier.show(message).await;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn mount_map(&self) -> Result<(), Error> {
        self.map.mount().await;
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

#[tokio::test]
async fn subscribers_see_changes() {
    use super::mocks::*;
    use crate::api::LocationAPI;
    use crate::entities::Field;

    let engine = engine(MockResolver::new(), MockSource::empty(), MockPositioner::unsupported());
    let mut changes = engine.subscribe();
    let before = *changes.borrow_and_update();

    engine.set_from_text(Field::Start, "Ca".into()).await.unwrap();

    changes.changed().await.unwrap();
    assert!(*changes.borrow() > before);

    let snapshot = engine.snapshot().await.unwrap();
    assert_eq!(snapshot.revision, engine.revision.current());
    assert_eq!(snapshot.start.address, "Ca");
}

#[tokio::test]
async fn share_links_follow_navigation_url() {
    use super::mocks::*;
    use crate::api::{LocationAPI, WaypointAPI};
    use crate::entities::{Coordinates, Field};

    let engine = engine(
        MockResolver::new(),
        MockSource::with(stops()),
        MockPositioner::at(Coordinates::new(-33.9, 18.4)),
    );
    engine.load_waypoints().await.unwrap();
    engine.set_from_device_location(Field::Start).await.unwrap();

    let snapshot = engine.snapshot().await.unwrap();
    assert!(snapshot.navigation_url.is_none());
    assert!(snapshot.share.is_none());

    engine.toggle_waypoint("c".into()).await.unwrap();
    let snapshot = engine.snapshot().await.unwrap();
    let url = snapshot.navigation_url.unwrap();
    assert_eq!(snapshot.share, Some(handoff::share_links(&url)));
}

#[tokio::test(start_paused = true)]
async fn mounted_map_reports_settled() {
    use super::mocks::*;
    use std::time::Duration;

    let engine = engine(MockResolver::new(), MockSource::empty(), MockPositioner::unsupported());

    engine.mount_map().await.unwrap();
    assert!(!engine.snapshot().await.unwrap().map_settled);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(engine.snapshot().await.unwrap().map_settled);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_notification_timer() {
    use super::mocks::*;
    use std::time::Duration;

    let engine = engine(MockResolver::new(), MockSource::empty(), MockPositioner::unsupported());

    engine.notify("Route copied".into()).await.unwrap();
    engine.shutdown().await;
    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(
        engine.snapshot().await.unwrap().notification.as_deref(),
        Some("Route copied")
    );
}
