use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, LocationPoint, Waypoint};

pub const TRAVEL_MODE: &str = "driving";

/// Derived route. Never stored; rebuilt from a [`RoutePlan`] on demand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub points: Vec<Coordinates>,
    pub actionable: bool,
    pub bookable: bool,
}

/// Borrowed view of everything the route depends on.
#[derive(Clone, Copy, Debug)]
pub struct RoutePlan<'a> {
    pub start: &'a LocationPoint,
    pub end: &'a LocationPoint,
    pub use_different_end: bool,
    pub selection: &'a [Waypoint],
}

impl<'a> RoutePlan<'a> {
    /// The end point when a separate one is requested, otherwise the start
    /// again (round trip).
    pub fn effective_end(&self) -> &'a LocationPoint {
        if self.use_different_end {
            self.end
        } else {
            self.start
        }
    }

    /// `[start?, ...selection, effective_end?]`. The destination is only
    /// appended once there is at least one stop to route to.
    pub fn points(&self) -> Vec<Coordinates> {
        let mut points = Vec::with_capacity(self.selection.len() + 2);

        if let Some(start) = self.start.coords {
            points.push(start);
        }

        points.extend(self.selection.iter().map(|w| w.coords));

        if let Some(end) = self.effective_end().coords {
            if !self.selection.is_empty() {
                points.push(end);
            }
        }

        points
    }

    /// Enough resolved points to hand the trip to external navigation. A
    /// round trip with no stops has nowhere to go and is not actionable; a
    /// direct trip to a separate end point is.
    pub fn is_actionable(&self) -> bool {
        self.start.is_resolved()
            && self.effective_end().is_resolved()
            && (self.use_different_end || !self.selection.is_empty())
    }

    /// Transport booking needs at least one real stop.
    pub fn is_bookable(&self) -> bool {
        self.start.is_resolved()
            && !self.selection.is_empty()
            && (!self.use_different_end || self.end.is_resolved())
    }

    pub fn compose(&self) -> Route {
        Route {
            points: self.points(),
            actionable: self.is_actionable(),
            bookable: self.is_bookable(),
        }
    }

    /// Directions link with the selection as ordered intermediate stops.
    /// `None` unless the plan is actionable.
    pub fn navigation_url(&self, base: &str) -> Option<String> {
        if !self.is_actionable() {
            return None;
        }

        let origin: String = self.start.coords?.into();
        let destination: String = self.effective_end().coords?.into();

        let mut url = format!(
            "{}?api=1&origin={}&destination={}",
            base, origin, destination
        );

        if !self.selection.is_empty() {
            let stops: Vec<String> = self.selection.iter().map(|w| w.coords.into()).collect();
            url.push_str("&waypoints=");
            url.push_str(&stops.join("|"));
        }

        url.push_str("&travelmode=");
        url.push_str(TRAVEL_MODE);

        Some(url)
    }
}

#[cfg(test)]
const BASE: &str = "https://www.google.com/maps/dir/";

#[cfg(test)]
fn resolved(lat: f64, lng: f64) -> LocationPoint {
    LocationPoint {
        address: "somewhere".into(),
        coords: Some(Coordinates::new(lat, lng)),
    }
}

#[cfg(test)]
fn stops() -> (Waypoint, Waypoint) {
    (
        Waypoint::new("a", "A", "1 A Street", Coordinates::new(-33.8, 18.5)),
        Waypoint::new("b", "B", "2 B Street", Coordinates::new(-33.7, 18.6)),
    )
}

#[test]
fn unresolved_start_is_never_actionable() {
    let start = LocationPoint::from_text("Cape Town");
    let (a, _) = stops();

    for end in [LocationPoint::default(), resolved(-34.0, 18.5)] {
        for use_different_end in [false, true] {
            for selection in [vec![], vec![a.clone()]] {
                let plan = RoutePlan {
                    start: &start,
                    end: &end,
                    use_different_end,
                    selection: &selection,
                };

                assert!(!plan.is_actionable());
                assert!(!plan.is_bookable());
                assert_eq!(plan.navigation_url(BASE), None);
            }
        }
    }
}

#[test]
fn round_trip_needs_a_stop() {
    let start = resolved(-33.9, 18.4);
    let end = LocationPoint::default();
    let (a, _) = stops();

    let empty = RoutePlan {
        start: &start,
        end: &end,
        use_different_end: false,
        selection: &[],
    };
    assert!(!empty.is_actionable());
    assert_eq!(empty.points(), vec![Coordinates::new(-33.9, 18.4)]);

    let selection = vec![a];
    let through_a = RoutePlan {
        selection: &selection,
        ..empty
    };
    assert!(through_a.is_actionable());
    assert_eq!(
        through_a.points(),
        vec![
            Coordinates::new(-33.9, 18.4),
            Coordinates::new(-33.8, 18.5),
            Coordinates::new(-33.9, 18.4),
        ]
    );
}

#[test]
fn direct_trip_to_distinct_end_is_actionable_but_not_bookable() {
    let start = resolved(-33.9, 18.4);
    let end = resolved(-34.1, 18.9);

    let plan = RoutePlan {
        start: &start,
        end: &end,
        use_different_end: true,
        selection: &[],
    };

    assert!(plan.is_actionable());
    assert!(!plan.is_bookable());
    assert_eq!(
        plan.navigation_url(BASE).unwrap(),
        "https://www.google.com/maps/dir/?api=1&origin=-33.9,18.4&destination=-34.1,18.9&travelmode=driving"
    );
}

#[test]
fn unresolved_different_end_blocks_both_predicates() {
    let start = resolved(-33.9, 18.4);
    let end = LocationPoint::from_text("Stellenbosch");
    let (a, _) = stops();
    let selection = vec![a];

    let plan = RoutePlan {
        start: &start,
        end: &end,
        use_different_end: true,
        selection: &selection,
    };

    assert!(!plan.is_actionable());
    assert!(!plan.is_bookable());
    // stops are still drawn, the missing end is simply left off
    assert_eq!(plan.points().len(), 2);
}

#[test]
fn empty_selection_is_never_bookable() {
    let start = resolved(-33.9, 18.4);
    let end = resolved(-34.1, 18.9);

    for use_different_end in [false, true] {
        let plan = RoutePlan {
            start: &start,
            end: &end,
            use_different_end,
            selection: &[],
        };

        assert!(!plan.is_bookable());
    }
}

#[test]
fn round_trip_through_two_stops() {
    let start = resolved(-33.9, 18.4);
    let end = LocationPoint::default();
    let (a, b) = stops();
    let selection = vec![a, b];

    let plan = RoutePlan {
        start: &start,
        end: &end,
        use_different_end: false,
        selection: &selection,
    };
    let route = plan.compose();

    assert_eq!(
        route.points,
        vec![
            Coordinates::new(-33.9, 18.4),
            Coordinates::new(-33.8, 18.5),
            Coordinates::new(-33.7, 18.6),
            Coordinates::new(-33.9, 18.4),
        ]
    );
    assert!(route.actionable);
    assert!(route.bookable);
    assert_eq!(
        plan.navigation_url(BASE).unwrap(),
        "https://www.google.com/maps/dir/?api=1&origin=-33.9,18.4&destination=-33.9,18.4&waypoints=-33.8,18.5|-33.7,18.6&travelmode=driving"
    );
}

#[test]
fn navigation_url_keeps_selection_order() {
    let start = resolved(-33.9, 18.4);
    let end = resolved(-34.1, 18.9);
    let (a, b) = stops();
    let selection = vec![b, a];

    let plan = RoutePlan {
        start: &start,
        end: &end,
        use_different_end: true,
        selection: &selection,
    };

    let url = plan.navigation_url(BASE).unwrap();
    assert!(url.contains("&destination=-34.1,18.9&waypoints=-33.7,18.6|-33.8,18.5&"));
}
