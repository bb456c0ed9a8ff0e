use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// A point of interest loaded from the waypoint source. Always resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub name: String,
    pub address: String,
    pub coords: Coordinates,
}

impl Waypoint {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        coords: Coordinates,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            coords,
        }
    }
}
