mod handlers;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::api::API;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{bookings, locations, session, waypoints};

pub type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/session", get(session::find))
        .route("/session/changes", get(session::changes))
        .route("/session/map", post(session::mount_map))
        .route("/session/different_end", patch(locations::set_different_end))
        .route("/locations/:field/address", patch(locations::set_address))
        .route(
            "/locations/:field/suggestions",
            get(locations::suggestions).delete(locations::dismiss),
        )
        .route(
            "/locations/:field/suggestions/:id",
            post(locations::select_suggestion),
        )
        .route("/locations/:field/locate", post(locations::locate))
        .route("/waypoints", get(waypoints::list))
        .route("/waypoints/:id/toggle", post(waypoints::toggle))
        .route("/bookings", post(bookings::create))
        .layer(Extension(api))
}

/// Serves until `shutdown` resolves, then lets in-flight requests finish.
pub async fn serve<F>(api: DynAPI, addr: SocketAddr, shutdown: F) -> Result<(), Error>
where
    F: Future<Output = ()>,
{
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|err| {
            tracing::error!("server error: {:?}", err);
            unexpected_error()
        })
}
