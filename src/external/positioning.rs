use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::Config,
    entities::{Coordinates, PositionError},
    external::Positioner,
};

/// Reports a configured position, for hosts that know where they are.
#[derive(Debug)]
pub struct FixedPositioner(pub Coordinates);

#[async_trait]
impl Positioner for FixedPositioner {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Ok(self.0)
    }
}

#[derive(Debug)]
pub struct UnsupportedPositioner;

#[async_trait]
impl Positioner for UnsupportedPositioner {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Err(PositionError::Unsupported)
    }
}

pub fn from_config(config: &Config) -> Arc<dyn Positioner> {
    match config.device_position {
        Some(coordinates) => Arc::new(FixedPositioner(coordinates)),
        None => {
            tracing::info!("no device position configured, geolocation is unsupported");
            Arc::new(UnsupportedPositioner)
        }
    }
}

#[test]
fn configured_position_is_reported() {
    use tokio_test::block_on;

    let config = Config {
        device_position: Some(Coordinates::new(-33.9, 18.4)),
        ..Config::default()
    };

    let positioner = from_config(&config);
    assert_eq!(
        block_on(positioner.current_position()),
        Ok(Coordinates::new(-33.9, 18.4))
    );

    let positioner = from_config(&Config::default());
    assert_eq!(
        block_on(positioner.current_position()),
        Err(PositionError::Unsupported)
    );
}
