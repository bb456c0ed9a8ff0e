use serde::{Deserialize, Serialize};

use crate::entities::Waypoint;

/// The user's chosen stops, in visit order.
///
/// `toggle` is the only mutation, so membership and visit order can never
/// disagree: first added is first visited, and removing then re-adding a stop
/// moves it to the end.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    waypoints: Vec<Waypoint>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the waypoint is selected after the call.
    pub fn toggle(&mut self, waypoint: Waypoint) -> bool {
        match self.waypoints.iter().position(|w| w.id == waypoint.id) {
            Some(index) => {
                self.waypoints.remove(index);
                false
            }
            None => {
                self.waypoints.push(waypoint);
                true
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.waypoints.iter().any(|w| w.id == id)
    }

    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[cfg(test)]
fn waypoint(id: &str) -> Waypoint {
    use crate::entities::Coordinates;

    Waypoint::new(id, id.to_uppercase(), "", Coordinates::new(-33.8, 18.5))
}

#[cfg(test)]
fn ids(selection: &Selection) -> Vec<&str> {
    selection.as_slice().iter().map(|w| w.id.as_str()).collect()
}

#[test]
fn toggle_appends_then_removes() {
    let mut selection = Selection::new();

    assert!(selection.toggle(waypoint("a")));
    assert!(selection.toggle(waypoint("b")));
    assert!(selection.toggle(waypoint("c")));
    assert_eq!(ids(&selection), vec!["a", "b", "c"]);

    assert!(!selection.toggle(waypoint("b")));
    assert_eq!(ids(&selection), vec!["a", "c"]);
}

#[test]
fn re_adding_moves_to_end() {
    let mut selection = Selection::new();

    selection.toggle(waypoint("a"));
    selection.toggle(waypoint("b"));
    selection.toggle(waypoint("a"));
    selection.toggle(waypoint("a"));

    assert_eq!(ids(&selection), vec!["b", "a"]);
}

#[test]
fn membership_follows_toggle_parity() {
    let sequence = ["a", "b", "a", "c", "b", "b", "d", "a", "c", "c"];
    let mut selection = Selection::new();
    let mut expected: Vec<&str> = vec![];

    for id in sequence {
        selection.toggle(waypoint(id));

        match expected.iter().position(|e| *e == id) {
            Some(index) => {
                expected.remove(index);
            }
            None => expected.push(id),
        }

        assert_eq!(ids(&selection), expected);
    }

    for id in ["a", "b", "c", "d"] {
        let count = sequence.iter().filter(|s| **s == id).count();
        assert_eq!(selection.contains(id), count % 2 == 1, "parity of {}", id);
    }

    assert_eq!(ids(&selection), vec!["b", "d", "a", "c"]);
}
