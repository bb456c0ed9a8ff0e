use std::time::Duration;

use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::entities::Snapshot;
use crate::error::Error;
use crate::server::DynAPI;

/// Longest a `changes` request is held open before answering with the
/// current snapshot.
const LONG_POLL: Duration = Duration::from_secs(30);

#[derive(Serialize, Deserialize)]
pub struct ChangesParams {
    since: u64,
}

pub async fn find(Extension(api): Extension<DynAPI>) -> Result<Json<Snapshot>, Error> {
    let snapshot = api.snapshot().await?;

    Ok(snapshot.into())
}

/// Waits for a revision newer than `since`, then responds with a snapshot.
pub async fn changes(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<ChangesParams>,
) -> Result<Json<Snapshot>, Error> {
    let mut revisions = api.subscribe();

    let newer = async {
        loop {
            let current = *revisions.borrow_and_update();
            if current > params.since || revisions.changed().await.is_err() {
                break;
            }
        }
    };

    if tokio::time::timeout(LONG_POLL, newer).await.is_err() {
        tracing::debug!("no change since revision {}", params.since);
    }

    let snapshot = api.snapshot().await?;

    Ok(snapshot.into())
}

pub async fn mount_map(Extension(api): Extension<DynAPI>) -> Result<Json<()>, Error> {
    api.mount_map().await?;

    Ok(().into())
}
