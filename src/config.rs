use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::entities::{Coordinates, MAX_SUGGESTIONS};
use crate::error::{config_error, env_var_error, Error};

pub const KML_EXPORT_URL: &str =
    "https://www.google.com/maps/d/kml?mid=1HJtc-6GV8TMTTke3BAdM12QEQA7qHGs-&forcekml=1";

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Host of the Nominatim search API, without scheme.
    pub nominatim_api_base: String,
    pub user_agent: String,
    /// ISO 3166-1 country codes the address search is limited to.
    pub country_scope: String,
    pub suggestion_limit: usize,
    pub debounce: Duration,
    pub notification_ttl: Duration,
    pub map_settle_delay: Duration,
    pub geolocation_timeout: Duration,
    pub waypoints_url: String,
    pub navigation_base: String,
    pub booking_address: String,
    /// Position reported as the device location. Unset means geolocation is
    /// unsupported on this host.
    pub device_position: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            nominatim_api_base: "nominatim.openstreetmap.org".into(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
            country_scope: "za".into(),
            suggestion_limit: MAX_SUGGESTIONS,
            debounce: Duration::from_millis(500),
            notification_ttl: Duration::from_secs(5),
            map_settle_delay: Duration::from_millis(100),
            geolocation_timeout: Duration::from_secs(10),
            waypoints_url: KML_EXPORT_URL.into(),
            navigation_base: "https://www.google.com/maps/dir/".into(),
            booking_address: "info@beerroute.co.za".into(),
            device_position: None,
        }
    }
}

impl Config {
    /// Reads `ITINERA_*` variables, falling back to the defaults for any that
    /// are unset.
    pub fn from_env() -> Result<Self, Error> {
        let defaults = Self::default();

        let device_position = match optional_var("ITINERA_DEVICE_POSITION")? {
            Some(value) => Some(parse_var("ITINERA_DEVICE_POSITION", &value)?),
            None => None,
        };

        let suggestion_limit: usize =
            var_or("ITINERA_SUGGESTION_LIMIT", defaults.suggestion_limit)?;
        if suggestion_limit == 0 || suggestion_limit > MAX_SUGGESTIONS {
            return Err(config_error("ITINERA_SUGGESTION_LIMIT"));
        }

        Ok(Self {
            listen_addr: var_or("ITINERA_LISTEN_ADDR", defaults.listen_addr)?,
            nominatim_api_base: var_or("NOMINATIM_API_BASE", defaults.nominatim_api_base)?,
            user_agent: var_or("ITINERA_USER_AGENT", defaults.user_agent)?,
            country_scope: var_or("ITINERA_COUNTRY_SCOPE", defaults.country_scope)?,
            suggestion_limit,
            debounce: millis_or("ITINERA_DEBOUNCE_MS", defaults.debounce)?,
            notification_ttl: millis_or("ITINERA_NOTIFICATION_MS", defaults.notification_ttl)?,
            map_settle_delay: millis_or("ITINERA_MAP_SETTLE_MS", defaults.map_settle_delay)?,
            geolocation_timeout: millis_or(
                "ITINERA_GEOLOCATION_TIMEOUT_MS",
                defaults.geolocation_timeout,
            )?,
            waypoints_url: var_or("ITINERA_WAYPOINTS_URL", defaults.waypoints_url)?,
            navigation_base: var_or("ITINERA_NAVIGATION_BASE", defaults.navigation_base)?,
            booking_address: var_or("ITINERA_BOOKING_ADDRESS", defaults.booking_address)?,
            device_position,
        })
    }
}

fn optional_var(name: &str) -> Result<Option<String>, Error> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(env_var_error(err)),
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T, Error> {
    value.trim().parse().map_err(|_| {
        tracing::error!("could not parse {}={:?}", name, value);
        config_error(name)
    })
}

fn var_or<T: FromStr>(name: &str, default: T) -> Result<T, Error> {
    match optional_var(name)? {
        Some(value) => parse_var(name, &value),
        None => Ok(default),
    }
}

fn millis_or(name: &str, default: Duration) -> Result<Duration, Error> {
    match optional_var(name)? {
        Some(value) => Ok(Duration::from_millis(parse_var(name, &value)?)),
        None => Ok(default),
    }
}

#[test]
fn defaults_match_product_constants() {
    let config = Config::default();

    assert_eq!(config.suggestion_limit, 5);
    assert_eq!(config.debounce, Duration::from_millis(500));
    assert_eq!(config.notification_ttl, Duration::from_secs(5));
    assert_eq!(config.country_scope, "za");
    assert!(config.device_position.is_none());
}

#[test]
fn parse_var_reports_the_variable() {
    let err = parse_var::<u64>("ITINERA_DEBOUNCE_MS", "soon").unwrap_err();
    assert!(err.message.contains("ITINERA_DEBOUNCE_MS"));

    let position: Coordinates = parse_var("ITINERA_DEVICE_POSITION", "-33.9,18.4").unwrap();
    assert_eq!(position, Coordinates::new(-33.9, 18.4));
}
