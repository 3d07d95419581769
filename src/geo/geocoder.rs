// src/geo/geocoder.rs
use crate::geo::GeoPoint;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

const USER_AGENT: &str = "rental-scout/0.1 (rental listing search)";

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const CENSUS_URL: &str =
    "https://geocoding.geo.census.gov/geocoder/locations/onelineaddress";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Network(String),

    #[error("geocoder returned HTTP {0}")]
    Status(u16),

    #[error("no location matched")]
    NoMatch,

    #[error("malformed geocoder response: {0}")]
    Malformed(String),
}

/// Resolves a free-text location to a center point.
///
/// `None` means the query could not be resolved. That is an expected outcome:
/// callers carry on without proximity filtering.
pub trait Geocoder: Send + Sync {
    fn resolve(&self, query: &str) -> Option<GeoPoint>;
}

fn build_client(timeout: Duration) -> Result<Client, GeocodeError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| GeocodeError::Network(e.to_string()))
}

fn fetch_body(client: &Client, url: &str, params: &[(&str, &str)]) -> Result<String, GeocodeError> {
    let resp = client
        .get(url)
        .query(params)
        .send()
        .map_err(|e| GeocodeError::Network(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(GeocodeError::Status(status.as_u16()));
    }

    resp.text().map_err(|e| GeocodeError::Network(e.to_string()))
}

// ---------------------------------------------------------------------------
// Nominatim (OpenStreetMap)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NominatimMatch {
    lat: String,
    lon: String,
}

pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.unwrap_or_else(|| NOMINATIM_URL.to_string()),
        })
    }

    #[instrument(skip(self))]
    pub fn try_resolve(&self, query: &str) -> Result<GeoPoint, GeocodeError> {
        let body = fetch_body(
            &self.client,
            &self.base_url,
            &[("q", query), ("format", "json"), ("limit", "1")],
        )?;
        parse_nominatim(&body)
    }
}

impl Geocoder for NominatimGeocoder {
    fn resolve(&self, query: &str) -> Option<GeoPoint> {
        resolve_with(query, |q| self.try_resolve(q))
    }
}

/// First candidate wins.
pub fn parse_nominatim(body: &str) -> Result<GeoPoint, GeocodeError> {
    let matches: Vec<NominatimMatch> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Malformed(e.to_string()))?;

    let first = matches.first().ok_or(GeocodeError::NoMatch)?;

    let lat: f64 = first
        .lat
        .trim()
        .parse()
        .map_err(|e| GeocodeError::Malformed(format!("latitude: {e}")))?;
    let lon: f64 = first
        .lon
        .trim()
        .parse()
        .map_err(|e| GeocodeError::Malformed(format!("longitude: {e}")))?;

    GeoPoint::new(lat, lon)
        .ok_or_else(|| GeocodeError::Malformed(format!("coordinates out of range: {lat},{lon}")))
}

// ---------------------------------------------------------------------------
// US Census one-line address geocoder
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CensusResponse {
    result: CensusResult,
}

#[derive(Debug, Deserialize)]
struct CensusResult {
    #[serde(rename = "addressMatches", default)]
    address_matches: Vec<CensusMatch>,
}

#[derive(Debug, Deserialize)]
struct CensusMatch {
    coordinates: CensusCoordinates,
}

#[derive(Debug, Deserialize)]
struct CensusCoordinates {
    // x is longitude, y is latitude
    x: f64,
    y: f64,
}

pub struct CensusGeocoder {
    client: Client,
    base_url: String,
}

impl CensusGeocoder {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.unwrap_or_else(|| CENSUS_URL.to_string()),
        })
    }

    #[instrument(skip(self))]
    pub fn try_resolve(&self, query: &str) -> Result<GeoPoint, GeocodeError> {
        let body = fetch_body(
            &self.client,
            &self.base_url,
            &[
                ("address", query),
                ("benchmark", "Public_AR_Current"),
                ("format", "json"),
            ],
        )?;
        parse_census(&body)
    }
}

impl Geocoder for CensusGeocoder {
    fn resolve(&self, query: &str) -> Option<GeoPoint> {
        resolve_with(query, |q| self.try_resolve(q))
    }
}

pub fn parse_census(body: &str) -> Result<GeoPoint, GeocodeError> {
    let resp: CensusResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::Malformed(e.to_string()))?;

    let first = resp
        .result
        .address_matches
        .first()
        .ok_or(GeocodeError::NoMatch)?;

    let CensusCoordinates { x, y } = first.coordinates;
    GeoPoint::new(y, x)
        .ok_or_else(|| GeocodeError::Malformed(format!("coordinates out of range: {y},{x}")))
}

/// Shared failure policy: blank input never hits the network, and every
/// error collapses to `None` after being logged.
fn resolve_with<F>(query: &str, try_resolve: F) -> Option<GeoPoint>
where
    F: FnOnce(&str) -> Result<GeoPoint, GeocodeError>,
{
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    match try_resolve(query) {
        Ok(point) => {
            debug!(
                query,
                lat = point.latitude(),
                lon = point.longitude(),
                "Geocoded location"
            );
            Some(point)
        }
        Err(e) => {
            warn!(query, error = %e, "Location could not be geocoded");
            None
        }
    }
}
