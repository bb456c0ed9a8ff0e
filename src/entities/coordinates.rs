use std::fmt;
use std::str::FromStr;

use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        coordinates.to_string()
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Coord {
            x: coordinates.lng,
            y: coordinates.lat,
        }
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::from(Coord::from(coordinates))
    }
}

impl From<Coord<f64>> for Coordinates {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }
}

/// Parses `"lat,lng"`, the same order the value is displayed in.
impl FromStr for Coordinates {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"lat,lng\", got {:?}", s))?;

        let lat: f64 = lat.trim().parse().map_err(|_| format!("bad latitude {:?}", lat))?;
        let lng: f64 = lng.trim().parse().map_err(|_| format!("bad longitude {:?}", lng))?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(format!("coordinates out of range: {}", s));
        }

        Ok(Self { lat, lng })
    }
}

#[test]
fn display_is_lat_first() {
    let location: String = Coordinates::new(-33.9, 18.4).into();
    assert_eq!(location, "-33.9,18.4");
}

#[test]
fn parse_round_trips_display() {
    let parsed: Coordinates = " -33.9 , 18.4 ".parse().unwrap();
    assert_eq!(parsed, Coordinates::new(-33.9, 18.4));

    assert!("18.4".parse::<Coordinates>().is_err());
    assert!("-95.0,18.4".parse::<Coordinates>().is_err());
}

#[test]
fn geo_coord_uses_lng_as_x() {
    let coord: Coord<f64> = Coordinates::new(-33.9, 18.4).into();
    assert_eq!(coord.x, 18.4);
    assert_eq!(coord.y, -33.9);
}
