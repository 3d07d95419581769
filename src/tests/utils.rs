// src/tests/utils.rs
use crate::domain::filter::HalfBathPolicy;
use crate::domain::search::SearchPipeline;
use crate::geo::{GeoPoint, Geocoder};
use crate::scraper::{FetchRequest, ListingSource, RawListing, ScraperError};
use crate::state::AppState;
use astra::{Body, Request, Response};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Mutex;

pub const CENTER: (f64, f64) = (41.925, -87.65);

/// Resolves only the locations it was given.
#[derive(Default)]
pub struct StaticGeocoder {
    points: HashMap<String, GeoPoint>,
}

impl StaticGeocoder {
    pub fn with(mut self, query: &str, lat: f64, lon: f64) -> Self {
        let point = GeoPoint::new(lat, lon).expect("valid test coordinate");
        self.points.insert(query.to_string(), point);
        self
    }
}

impl Geocoder for StaticGeocoder {
    fn resolve(&self, query: &str) -> Option<GeoPoint> {
        self.points.get(query.trim()).copied()
    }
}

/// Returns the same raw listings for every request and remembers the last one.
pub struct StaticSource {
    listings: Vec<RawListing>,
    pub last_request: Mutex<Option<FetchRequest>>,
}

impl StaticSource {
    pub fn new(listings: Vec<Value>) -> Self {
        Self {
            listings: listings
                .into_iter()
                .map(|v| v.as_object().cloned().expect("raw listing must be an object"))
                .collect(),
            last_request: Mutex::new(None),
        }
    }
}

impl ListingSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawListing>, ScraperError> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(self.listings.iter().take(request.max_results).cloned().collect())
    }
}

pub struct FailingSource;

impl ListingSource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn fetch(&self, _request: &FetchRequest) -> Result<Vec<RawListing>, ScraperError> {
        Err(ScraperError::Blocked("HTTP 403 Forbidden".into()))
    }
}

/// A raw listing `miles` due north of `CENTER`, or unlocated when `None`.
pub fn raw_listing(id: &str, beds: u32, full_baths: u32, miles_north: Option<f64>) -> Value {
    let mut raw = json!({
        "property_url": format!("https://www.realtor.com/rentals/details/{id}"),
        "street": format!("{id} N Clark St"),
        "city": "Chicago",
        "state": "IL",
        "zip_code": "60614",
        "list_price": 1800 + beds * 400,
        "beds": beds,
        "full_baths": full_baths,
        "half_baths": 0,
        "agent_name": "Pat Doe",
        "agent_email": format!("agent{id}@example.com"),
    });

    if let Some(miles) = miles_north {
        raw["latitude"] = json!(CENTER.0 + miles / 69.093);
        raw["longitude"] = json!(CENTER.1);
    }

    raw
}

/// The pipeline's geocoder knows "60614" and "Chicago, IL".
pub fn pipeline(source: impl ListingSource + 'static) -> SearchPipeline {
    let geocoder = StaticGeocoder::default()
        .with("60614", CENTER.0, CENTER.1)
        .with("Chicago, IL", 41.8781, -87.6298);

    SearchPipeline::new(Box::new(geocoder), Box::new(source), HalfBathPolicy::WholeUnit)
}

pub fn test_state(listings: Vec<Value>) -> AppState {
    AppState::new(pipeline(StaticSource::new(listings)))
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, form: &str) -> Request {
    let mut builder = http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub fn body_bytes(resp: Response) -> Vec<u8> {
    let mut buf = Vec::new();
    resp.into_body().reader().read_to_end(&mut buf).unwrap();
    buf
}

pub fn body_string(resp: Response) -> String {
    String::from_utf8(body_bytes(resp)).unwrap()
}

/// `sid=...` from a response's Set-Cookie header, ready to send back.
pub fn session_cookie(resp: &Response) -> Option<String> {
    let header = resp.headers().get("Set-Cookie")?.to_str().ok()?;
    header.split(';').next().map(|pair| pair.trim().to_string())
}

/// Cell values of the first worksheet, row by row.
pub fn xlsx_rows(buffer: Vec<u8>) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(buffer)).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range.rows().map(|row| row.to_vec()).collect()
}

pub fn text(value: &str) -> Data {
    Data::String(value.to_string())
}
