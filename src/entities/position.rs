use serde::{Deserialize, Serialize};

/// Why the device position could not be obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unsupported,
}

impl PositionError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Location permission denied. Please enable location services in your browser settings."
            }
            Self::PositionUnavailable => {
                "Location information is unavailable. Please check your network connection and try again."
            }
            Self::Timeout => "The request to get user location timed out. Please try again.",
            Self::Unsupported => {
                "Geolocation is not supported by your browser. Please enter an address manually."
            }
        }
    }
}

#[test]
fn each_cause_has_its_own_message() {
    use std::collections::HashSet;

    let causes = [
        PositionError::PermissionDenied,
        PositionError::PositionUnavailable,
        PositionError::Timeout,
        PositionError::Unsupported,
    ];

    let messages: HashSet<&str> = causes.iter().map(|c| c.message()).collect();
    assert_eq!(messages.len(), causes.len());
}
