use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, CURRENT_LOCATION};

/// Shortest input, in characters, that is worth sending to the resolver.
pub const MIN_QUERY_CHARS: usize = 3;

/// Most suggestions a single lookup may produce.
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub label: String,
    pub coords: Coordinates,
}

/// What a location input shows under the text box.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionState {
    pub searching: bool,
    pub suggestions: Vec<Suggestion>,
}

pub fn is_searchable(input: &str) -> bool {
    input.chars().count() >= MIN_QUERY_CHARS && input != CURRENT_LOCATION
}

#[test]
fn short_and_sentinel_inputs_are_not_searchable() {
    assert!(!is_searchable(""));
    assert!(!is_searchable("Ca"));
    assert!(!is_searchable("Ké"));
    assert!(!is_searchable(CURRENT_LOCATION));

    assert!(is_searchable("Cap"));
    assert!(is_searchable("My Current Location 2"));
}
