use geo_types::{Coord, Rect};
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Shown when there is nothing to fit: the whole service region.
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: -28.94,
    lng: 24.55,
};
pub const DEFAULT_ZOOM: u8 = 6;

/// Margin, in pixels, kept around fitted bounds.
pub const FIT_PADDING: u32 = 50;

/// The map region a client should show.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewport {
    Bounds {
        south_west: Coordinates,
        north_east: Coordinates,
        padding: u32,
    },
    Center {
        center: Coordinates,
        zoom: u8,
    },
}

impl Default for Viewport {
    fn default() -> Self {
        Self::Center {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

pub fn bounding_rect<I>(points: I) -> Option<Rect<f64>>
where
    I: IntoIterator<Item = Coordinates>,
{
    points.into_iter().map(Coord::from).fold(None, |rect, c| {
        let rect = match rect {
            None => Rect::new(c, c),
            Some(rect) => {
                let (min, max) = (rect.min(), rect.max());
                Rect::new(
                    Coord {
                        x: min.x.min(c.x),
                        y: min.y.min(c.y),
                    },
                    Coord {
                        x: max.x.max(c.x),
                        y: max.y.max(c.y),
                    },
                )
            }
        };

        Some(rect)
    })
}

pub fn fit<I>(points: I) -> Viewport
where
    I: IntoIterator<Item = Coordinates>,
{
    match bounding_rect(points) {
        Some(rect) => Viewport::Bounds {
            south_west: rect.min().into(),
            north_east: rect.max().into(),
            padding: FIT_PADDING,
        },
        None => Viewport::default(),
    }
}

#[test]
fn empty_set_falls_back_to_region() {
    assert_eq!(
        fit(vec![]),
        Viewport::Center {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM
        }
    );
}

#[test]
fn single_point_is_a_degenerate_box() {
    let point = Coordinates::new(-33.9, 18.4);

    assert_eq!(
        fit(vec![point]),
        Viewport::Bounds {
            south_west: point,
            north_east: point,
            padding: FIT_PADDING,
        }
    );
}

#[test]
fn box_encloses_every_point() {
    let points = vec![
        Coordinates::new(-33.9, 18.4),
        Coordinates::new(-33.7, 18.6),
        Coordinates::new(-34.2, 19.1),
        Coordinates::new(-33.8, 18.5),
    ];

    assert_eq!(
        fit(points),
        Viewport::Bounds {
            south_west: Coordinates::new(-34.2, 18.4),
            north_east: Coordinates::new(-33.7, 19.1),
            padding: FIT_PADDING,
        }
    );
}
