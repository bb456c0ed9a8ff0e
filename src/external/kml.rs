//! Waypoints from a KML map export (e.g. a public Google My Maps layer).

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    config::Config,
    entities::{Coordinates, Waypoint},
    error::{data_unavailable_error, Error},
    external::WaypointSource,
};

const UNNAMED: &str = "Unnamed Place";
const ADDRESS_FIELD: &str = "Address";

/// `kml`, `Document` and `Folder` all hold an ordered mix of children.
#[derive(Debug, Default, Deserialize)]
struct Container {
    #[serde(rename = "$value", default)]
    nodes: Vec<Node>,
}

#[derive(Debug, Deserialize)]
enum Node {
    Placemark(Placemark),
    Folder(Container),
    Document(Container),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Placemark {
    #[serde(rename = "@id", default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "ExtendedData", default)]
    extended_data: Option<ExtendedData>,
    #[serde(rename = "Point", default)]
    point: Option<Point>,
}

#[derive(Debug, Deserialize)]
struct ExtendedData {
    #[serde(rename = "Data", default)]
    data: Vec<Data>,
}

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(rename = "@name")]
    name: String,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Point {
    coordinates: String,
}

impl Container {
    fn flatten<'a>(&'a self, out: &mut Vec<&'a Placemark>) {
        for node in &self.nodes {
            match node {
                Node::Placemark(placemark) => out.push(placemark),
                Node::Folder(container) | Node::Document(container) => container.flatten(out),
                Node::Other => {}
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Placemark {
    /// A matching `Address` data field wins even when empty; otherwise fall
    /// back to `<address>`, then `<description>`.
    fn address(&self) -> String {
        let field = self
            .extended_data
            .iter()
            .flat_map(|extended| extended.data.iter())
            .find(|data| data.name == ADDRESS_FIELD);

        let address = match field {
            Some(data) => non_empty(&data.value),
            None => non_empty(&self.address).or_else(|| non_empty(&self.description)),
        };

        address.unwrap_or_default().to_string()
    }

    /// KML orders coordinates `lon,lat[,alt]`.
    fn coordinates(&self) -> Option<Coordinates> {
        let raw = self.point.as_ref()?.coordinates.trim();
        let mut parts = raw.split(',').map(str::trim);

        let lng: f64 = parts.next()?.parse().ok()?;
        let lat: f64 = parts.next()?.parse().ok()?;

        Some(Coordinates::new(lat, lng))
    }

    fn to_waypoint(&self, index: usize) -> Option<Waypoint> {
        let coords = match self.coordinates() {
            Some(coords) => coords,
            None => {
                if self.point.is_some() {
                    tracing::warn!("skipping placemark {} with unparseable coordinates", index);
                }
                return None;
            }
        };

        let id = non_empty(&self.id)
            .map(String::from)
            .unwrap_or_else(|| format!("placemark-{}", index));
        let name = non_empty(&self.name).unwrap_or(UNNAMED).to_string();

        Some(Waypoint::new(id, name, self.address(), coords))
    }
}

/// Every placemark at any depth, in document order. Generated ids count every
/// placemark, including those without a point.
pub fn parse_waypoints(kml: &str) -> Result<Vec<Waypoint>, Error> {
    let root: Container = quick_xml::de::from_str(kml)?;

    let mut placemarks = vec![];
    root.flatten(&mut placemarks);

    Ok(placemarks
        .iter()
        .enumerate()
        .filter_map(|(index, placemark)| placemark.to_waypoint(index))
        .collect())
}

#[derive(Debug)]
pub struct KmlSource {
    client: reqwest::Client,
    url: String,
}

impl KmlSource {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            url: config.waypoints_url.clone(),
        })
    }
}

#[async_trait]
impl WaypointSource for KmlSource {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch_waypoints(&self) -> Result<Vec<Waypoint>, Error> {
        let res = self.client.get(&self.url).send().await?;

        if !res.status().is_success() {
            tracing::error!("waypoint export responded with {}", res.status());
            return Err(data_unavailable_error());
        }

        let body = res.text().await?;
        let waypoints = parse_waypoints(&body)?;

        tracing::debug!("parsed {} waypoints from export", waypoints.len());

        Ok(waypoints)
    }
}

#[cfg(test)]
const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Brewery Route</name>
    <Placemark id="loose">
      <name>Harbour Tap</name>
      <address>Quay 4, Cape Town</address>
      <Point><coordinates>18.42,-33.90,0</coordinates></Point>
    </Placemark>
    <Folder>
      <name>Breweries</name>
      <Placemark>
        <name>Devil's Peak</name>
        <description>fallback text</description>
        <ExtendedData>
          <Data name="Address"><value> 95 Durham Ave, Salt River </value></Data>
          <Data name="Phone"><value>021 200 5818</value></Data>
        </ExtendedData>
        <Point>
          <coordinates>
            18.4641,-33.9303,0
          </coordinates>
        </Point>
      </Placemark>
      <Placemark>
        <name>No Point Here</name>
      </Placemark>
      <Placemark>
        <description>Only a description</description>
        <Point><coordinates>18.85,-33.93</coordinates></Point>
      </Placemark>
    </Folder>
  </Document>
</kml>
"#;

#[test]
fn parses_document_and_folder_placemarks() {
    let waypoints = parse_waypoints(SAMPLE).unwrap();

    assert_eq!(waypoints.len(), 3);

    assert_eq!(waypoints[0].id, "loose");
    assert_eq!(waypoints[0].name, "Harbour Tap");
    assert_eq!(waypoints[0].address, "Quay 4, Cape Town");
    assert_eq!(waypoints[0].coords, Coordinates::new(-33.90, 18.42));

    assert_eq!(waypoints[1].id, "placemark-1");
    assert_eq!(waypoints[1].name, "Devil's Peak");
    assert_eq!(waypoints[1].address, "95 Durham Ave, Salt River");
    assert_eq!(waypoints[1].coords, Coordinates::new(-33.9303, 18.4641));

    // index 2 had no point, so the next generated id skips it
    assert_eq!(waypoints[2].id, "placemark-3");
    assert_eq!(waypoints[2].name, UNNAMED);
    assert_eq!(waypoints[2].address, "Only a description");
}

#[test]
fn rejects_ill_formed_export() {
    let err = parse_waypoints("<kml><Document></Folder></kml>").unwrap_err();
    assert_eq!(err.code, 8);
}

#[test]
fn keeps_document_order_across_folders() {
    let kml = r#"<kml xmlns="http://www.opengis.net/kml/2.2">
      <Document>
        <name>Route</name>
        <Folder>
          <Placemark><name>First</name><Point><coordinates>18.1,-33.1</coordinates></Point></Placemark>
        </Folder>
        <Placemark><name>Second</name><Point><coordinates>18.2,-33.2</coordinates></Point></Placemark>
      </Document>
    </kml>"#;

    let waypoints = parse_waypoints(kml).unwrap();
    let named: Vec<(&str, &str)> = waypoints
        .iter()
        .map(|w| (w.id.as_str(), w.name.as_str()))
        .collect();

    assert_eq!(named, vec![("placemark-0", "First"), ("placemark-1", "Second")]);
}

#[test]
fn accepts_exports_without_a_top_level_document() {
    let folder_root = r#"<kml>
      <Folder>
        <Style id="icon"><IconStyle><scale>1.1</scale></IconStyle></Style>
        <Placemark><name>Folder Tap</name><Point><coordinates>18.3,-33.3</coordinates></Point></Placemark>
      </Folder>
      <Placemark><name>Loose Tap</name><Point><coordinates>18.4,-33.4</coordinates></Point></Placemark>
    </kml>"#;

    let waypoints = parse_waypoints(folder_root).unwrap();
    assert_eq!(waypoints.len(), 2);
    assert_eq!(waypoints[0].name, "Folder Tap");
    assert_eq!(waypoints[1].coords, Coordinates::new(-33.4, 18.4));

    let nested = r#"<kml><Document><Document><Folder>
      <Placemark id="deep"><name>Deep Tap</name><Point><coordinates>18.5,-33.5</coordinates></Point></Placemark>
    </Folder></Document></Document></kml>"#;

    let waypoints = parse_waypoints(nested).unwrap();
    assert_eq!(waypoints.len(), 1);
    assert_eq!(waypoints[0].id, "deep");
}
