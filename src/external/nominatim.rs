use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    entities::{Coordinates, Suggestion},
    error::{invalid_input_error, upstream_error, Error},
    external::AddressResolver,
};

/// Nominatim reports `place_id` as a number, some mirrors as a string.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaceId {
    Number(u64),
    Text(String),
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        match id {
            PlaceId::Number(n) => n.to_string(),
            PlaceId::Text(s) => s,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    pub place_id: PlaceId,
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

impl Place {
    fn into_suggestion(self) -> Option<Suggestion> {
        let lat = self.lat.trim().parse().ok()?;
        let lng = self.lon.trim().parse().ok()?;

        Some(Suggestion {
            id: self.place_id.into(),
            label: self.display_name,
            coords: Coordinates::new(lat, lng),
        })
    }
}

/// Keeps places with usable coordinates, at most `limit` of them, in the
/// order the provider ranked them.
pub fn into_suggestions(places: Vec<Place>, limit: usize) -> Vec<Suggestion> {
    places
        .into_iter()
        .filter_map(|place| {
            let name = place.display_name.clone();
            let suggestion = place.into_suggestion();
            if suggestion.is_none() {
                tracing::warn!("skipping place with unparseable coordinates: {}", name);
            }
            suggestion
        })
        .take(limit)
        .collect()
}

#[derive(Debug)]
pub struct Nominatim {
    client: reqwest::Client,
    api_base: String,
}

impl Nominatim {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            api_base: config.nominatim_api_base.clone(),
        })
    }
}

#[async_trait]
impl AddressResolver for Nominatim {
    #[tracing::instrument(skip(self))]
    async fn search(
        &self,
        input: &str,
        country_scope: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>, Error> {
        let url = format!("https://{}/search", self.api_base);

        let res = self
            .client
            .get(url)
            .query(&[("format", "json")])
            .query(&[("q", input)])
            .query(&[("countrycodes", country_scope)])
            .query(&[("limit", limit)])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let places: Vec<Place> = res.json().await?;

        Ok(into_suggestions(places, limit))
    }
}

#[test]
fn parses_nominatim_payload() {
    let body = r#"[
        {"place_id": 123, "display_name": "Cape Town, Western Cape, South Africa", "lat": "-33.9288", "lon": "18.4172", "type": "city"},
        {"place_id": "abc", "display_name": "Cape Point", "lat": "-34.35", "lon": "18.49"},
        {"place_id": 7, "display_name": "Broken", "lat": "north", "lon": "18.0"}
    ]"#;

    let places: Vec<Place> = serde_json::from_str(body).unwrap();
    let suggestions = into_suggestions(places, 5);

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].id, "123");
    assert_eq!(suggestions[0].label, "Cape Town, Western Cape, South Africa");
    assert_eq!(suggestions[0].coords, Coordinates::new(-33.9288, 18.4172));
    assert_eq!(suggestions[1].id, "abc");
}

#[test]
fn caps_suggestions_at_limit() {
    let places: Vec<Place> = (0..8)
        .map(|i| Place {
            place_id: PlaceId::Number(i),
            display_name: format!("Place {}", i),
            lat: "-33.9".into(),
            lon: "18.4".into(),
        })
        .collect();

    let suggestions = into_suggestions(places, 5);

    assert_eq!(suggestions.len(), 5);
    assert_eq!(suggestions[4].label, "Place 4");
}
