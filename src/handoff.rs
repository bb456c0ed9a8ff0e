//! Links that hand a planned route to software outside the engine:
//! messaging, e-mail and the booking mailbox.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::entities::{BookingForm, RoutePlan};

pub const SHARE_SUBJECT: &str = "My Brewery Tour Plan";
pub const BOOKING_SUBJECT: &str = "New Brewery Tour Booking Request";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShareLinks {
    pub whatsapp: String,
    pub email: String,
}

/// Percent-encodes for URL query values. Spaces become `%20` rather than
/// `+` because mail clients do not decode `+` in `mailto:` bodies.
pub fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub fn share_message(navigation_url: &str) -> String {
    format!(
        "Check out this awesome brewery tour I planned: {}",
        navigation_url
    )
}

pub fn share_links(navigation_url: &str) -> ShareLinks {
    let message = encode(&share_message(navigation_url));

    ShareLinks {
        whatsapp: format!("https://api.whatsapp.com/send?text={}", message),
        email: format!("mailto:?subject={}&body={}", encode(SHARE_SUBJECT), message),
    }
}

/// `Start`, one `Stop n` line per selected waypoint, then `End`.
pub fn route_description(plan: &RoutePlan) -> String {
    let mut lines = Vec::with_capacity(plan.selection.len() + 2);

    lines.push(format!("Start: {}", plan.start.address));
    for (index, waypoint) in plan.selection.iter().enumerate() {
        lines.push(format!(
            "Stop {}: {} ({})",
            index + 1,
            waypoint.name,
            waypoint.address
        ));
    }
    lines.push(format!("End: {}", plan.effective_end().address));

    lines.join("\n")
}

pub fn booking_body(form: &BookingForm, plan: &RoutePlan) -> String {
    let rule = "-----------------------------";

    [
        "New Transport Booking Request".to_string(),
        rule.to_string(),
        format!("Name: {}", form.name.trim()),
        format!("Cellphone Number: {}", form.phone.trim()),
        format!("Email Address: {}", form.email.trim()),
        format!("Travel Dates: {}", form.dates.trim()),
        format!("Number of People: {}", form.people_count),
        rule.to_string(),
        "Requested Route:".to_string(),
        route_description(plan),
    ]
    .join("\n")
}

pub fn booking_link(booking_address: &str, form: &BookingForm, plan: &RoutePlan) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        booking_address,
        encode(BOOKING_SUBJECT),
        encode(&booking_body(form, plan))
    )
}

#[test]
fn encode_uses_percent_twenty_for_spaces() {
    assert_eq!(encode("a b+c"), "a%20b%2Bc");
    assert_eq!(encode("-33.9,18.4|x"), "-33.9%2C18.4%7Cx");
}

#[test]
fn share_links_embed_the_route_url() {
    let links = share_links("https://maps.example/dir?a=1&b=2");

    assert!(links
        .whatsapp
        .starts_with("https://api.whatsapp.com/send?text=Check%20out%20this%20awesome"));
    assert!(links.whatsapp.ends_with("https%3A%2F%2Fmaps.example%2Fdir%3Fa%3D1%26b%3D2"));
    assert!(links
        .email
        .starts_with("mailto:?subject=My%20Brewery%20Tour%20Plan&body=Check%20out"));
}

#[test]
fn booking_body_lists_stops_in_order() {
    use crate::entities::{sample_form, Coordinates, LocationPoint, Waypoint};

    let start = LocationPoint {
        address: "Sea Point".into(),
        coords: Some(Coordinates::new(-33.9, 18.4)),
    };
    let end = LocationPoint::default();
    let selection = vec![
        Waypoint::new("a", "Devil's Peak", "1 Brew St", Coordinates::new(-33.8, 18.5)),
        Waypoint::new("b", "Drifter", "2 Hop Rd", Coordinates::new(-33.7, 18.6)),
    ];
    let plan = RoutePlan {
        start: &start,
        end: &end,
        use_different_end: false,
        selection: &selection,
    };

    let body = booking_body(&sample_form(), &plan);

    assert!(body.starts_with("New Transport Booking Request\n"));
    assert!(body.contains("Number of People: 4\n"));
    assert!(body.ends_with(
        "Requested Route:\nStart: Sea Point\nStop 1: Devil's Peak (1 Brew St)\nStop 2: Drifter (2 Hop Rd)\nEnd: Sea Point"
    ));

    let link = booking_link("info@beerroute.co.za", &sample_form(), &plan);
    assert!(link.starts_with(
        "mailto:info@beerroute.co.za?subject=New%20Brewery%20Tour%20Booking%20Request&body=New%20Transport"
    ));
}
