use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Suggestion};

/// Address shown for a point resolved from the device position.
pub const CURRENT_LOCATION: &str = "My Current Location";

/// Identity of a location input. Each field owns its own point and its own
/// suggestion lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Start,
    End,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// A user-controlled start or end location.
///
/// Points are never edited in place: every edit or resolution builds a new
/// value, and only a resolution step may produce coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    pub address: String,
    pub coords: Option<Coordinates>,
}

impl LocationPoint {
    pub fn from_text(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            coords: None,
        }
    }

    pub fn from_suggestion(suggestion: &Suggestion) -> Self {
        Self {
            address: suggestion.label.clone(),
            coords: Some(suggestion.coords),
        }
    }

    pub fn from_device(coords: Coordinates) -> Self {
        Self {
            address: CURRENT_LOCATION.into(),
            coords: Some(coords),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.coords.is_some()
    }
}

#[test]
fn text_edit_drops_resolved_coordinates() {
    let suggestion = Suggestion {
        id: "1".into(),
        label: "Cape Town".into(),
        coords: Coordinates::new(-33.9, 18.4),
    };

    let resolved = LocationPoint::from_suggestion(&suggestion);
    assert!(resolved.is_resolved());

    let edited = LocationPoint::from_text(format!("{} CBD", resolved.address));
    assert_eq!(edited.address, "Cape Town CBD");
    assert_eq!(edited.coords, None);

    // retyping the exact resolved label still does not trust the old pair
    let retyped = LocationPoint::from_text(resolved.address.clone());
    assert_eq!(retyped.coords, None);
}

#[test]
fn device_point_uses_sentinel() {
    let point = LocationPoint::from_device(Coordinates::new(-33.9, 18.4));

    assert_eq!(point.address, CURRENT_LOCATION);
    assert_eq!(point.coords, Some(Coordinates::new(-33.9, 18.4)));
}
