use std::sync::Arc;

use itinera::api::WaypointAPI;
use itinera::config::Config;
use itinera::engine::Engine;
use itinera::error::Error;
use itinera::server::serve;

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("could not listen for ctrl-c: {:?}", err);
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let addr = config.listen_addr;

    let engine = Arc::new(Engine::from_config(config)?);
    tracing::info!("session {} started", engine.id());

    let waypoints = engine.load_waypoints().await?;
    if waypoints.is_empty() {
        tracing::warn!("no waypoints available, routes can only be start to end");
    }

    let served = serve(engine.clone(), addr, ctrl_c()).await;

    engine.shutdown().await;
    tracing::info!("session {} stopped", engine.id());

    served
}
