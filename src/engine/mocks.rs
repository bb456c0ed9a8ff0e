use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::Engine;
use crate::{
    config::Config,
    entities::{Coordinates, PositionError, Suggestion, Waypoint},
    error::{data_unavailable_error, upstream_error, Error},
    external::{AddressResolver, Positioner, WaypointSource},
};

/// Answers every query with `count` suggestions labelled after the input.
/// Suggestion `n` sits at `(-33.9 - n/100, 18.4)`.
#[derive(Debug)]
pub struct MockResolver {
    calls: Mutex<Vec<String>>,
    delay: Duration,
    fail: bool,
    count: usize,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(vec![]),
            delay: Duration::ZERO,
            fail: false,
            count: 3,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressResolver for MockResolver {
    async fn search(
        &self,
        input: &str,
        _country_scope: &str,
        _limit: usize,
    ) -> Result<Vec<Suggestion>, Error> {
        self.calls.lock().unwrap().push(input.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.fail {
            return Err(upstream_error());
        }

        Ok((0..self.count)
            .map(|n| Suggestion {
                id: format!("{}-{}", input, n),
                label: format!("{} {}", input, n),
                coords: Coordinates::new(-33.9 - n as f64 / 100.0, 18.4),
            })
            .collect())
    }
}

#[derive(Debug)]
pub struct MockSource(Option<Vec<Waypoint>>);

impl MockSource {
    pub fn with(waypoints: Vec<Waypoint>) -> Self {
        Self(Some(waypoints))
    }

    pub fn empty() -> Self {
        Self(Some(vec![]))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl WaypointSource for MockSource {
    async fn fetch_waypoints(&self) -> Result<Vec<Waypoint>, Error> {
        self.0.clone().ok_or_else(|| data_unavailable_error())
    }
}

#[derive(Debug)]
pub struct MockPositioner {
    pub result: Result<Coordinates, PositionError>,
    pub delay: Duration,
}

impl MockPositioner {
    pub fn at(coords: Coordinates) -> Self {
        Self {
            result: Ok(coords),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(err: PositionError) -> Self {
        Self {
            result: Err(err),
            delay: Duration::ZERO,
        }
    }

    pub fn unsupported() -> Self {
        Self::failing(PositionError::Unsupported)
    }
}

#[async_trait]
impl Positioner for MockPositioner {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.result
    }
}

/// A: (-33.8, 18.5), B: (-33.7, 18.6), C: (-34.0, 19.0)
pub fn stops() -> Vec<Waypoint> {
    vec![
        Waypoint::new("a", "Alpha Brewing", "1 Alpha Rd", Coordinates::new(-33.8, 18.5)),
        Waypoint::new("b", "Beta Beers", "2 Beta St", Coordinates::new(-33.7, 18.6)),
        Waypoint::new("c", "Gamma Taps", "3 Gamma Ave", Coordinates::new(-34.0, 19.0)),
    ]
}

pub fn engine(resolver: MockResolver, source: MockSource, positioner: MockPositioner) -> Engine {
    engine_with(Arc::new(resolver), source, positioner)
}

/// Keeps a handle on the resolver so tests can inspect its calls.
pub fn engine_with(
    resolver: Arc<MockResolver>,
    source: MockSource,
    positioner: MockPositioner,
) -> Engine {
    Engine::new(
        Config::default(),
        resolver,
        Arc::new(source),
        Arc::new(positioner),
    )
}
