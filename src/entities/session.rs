use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{LocationPoint, Route, SuggestionState, Viewport, Waypoint};
use crate::handoff::ShareLinks;

/// Read-only picture of a planning session, with every derived value
/// computed from the same state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub session_id: Uuid,
    pub revision: u64,
    pub taken_at: DateTime<Utc>,
    pub start: LocationPoint,
    pub end: LocationPoint,
    pub use_different_end: bool,
    pub waypoints: Vec<Waypoint>,
    pub selection: Vec<Waypoint>,
    pub route: Route,
    pub navigation_url: Option<String>,
    pub share: Option<ShareLinks>,
    pub viewport: Viewport,
    pub map_settled: bool,
    pub notification: Option<String>,
    pub is_loading: bool,
    pub load_error: Option<String>,
    pub locating: bool,
    pub start_suggestions: SuggestionState,
    pub end_suggestions: SuggestionState,
}
