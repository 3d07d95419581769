// realtor.rs
use crate::domain::normalize::parse_list_date;
use crate::domain::property_type::PropertyType;
use crate::scraper::models::RentalProperty;
use crate::scraper::source::{FetchRequest, ListingSource, RawListing};
use crate::scraper::ScraperError;
use chrono::{NaiveDate, Utc};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::StatusCode;
use scraper::{Html, Selector};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

const SEARCH_BASE: &str = "https://www.realtor.com/apartments/";
const ZENROWS_URL: &str = "https://api.zenrows.com/v1/";

// Strings that show up on bot-challenge pages instead of search results.
const BLOCK_MARKERS: [&str; 4] = [
    "px-captcha",
    "captcha-delivery",
    "Access to this page has been denied",
    "Please verify you are a human",
];

/// Rental search pages on realtor.com, optionally fetched through ZenRows.
pub struct RealtorSource {
    client: Client,
    zenrows_api_key: Option<String>,
}

impl RealtorSource {
    pub fn new(timeout: Duration, zenrows_api_key: Option<String>) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(ScraperError::network)?;

        Ok(Self {
            client,
            zenrows_api_key,
        })
    }

    /// `https://www.realtor.com/apartments/<slug>[/type-a-b][/radius-N]`
    pub fn search_url(request: &FetchRequest) -> Result<Url, ScraperError> {
        let mut url = Url::parse(SEARCH_BASE).map_err(|e| ScraperError::Config(e.to_string()))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ScraperError::Config("search base cannot take a path".into()))?;
            segments.pop_if_empty();
            segments.push(&location_slug(&request.location));

            if !request.property_types.is_empty() {
                let types: Vec<&str> = request
                    .property_types
                    .iter()
                    .map(|t| realtor_type(*t))
                    .collect();
                segments.push(&format!("type-{}", types.join("-")));
            }

            if let Some(radius) = request.radius_miles.filter(|r| *r > 0.0) {
                segments.push(&format!("radius-{}", radius.ceil() as u32));
            }
        }

        Ok(url)
    }

    fn fetch_html(&self, url: &Url) -> Result<String, ScraperError> {
        let start = Instant::now();

        let resp = match &self.zenrows_api_key {
            Some(api_key) => {
                let mut headers = HeaderMap::new();
                headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));

                self.client
                    .get(ZENROWS_URL)
                    .headers(headers)
                    .query(&[
                        ("url", url.as_str()),
                        ("apikey", api_key.as_str()),
                        ("original_status", "true"),
                        ("mode", "auto"),
                    ])
                    .send()
            }
            None => self.client.get(url.as_str()).send(),
        }
        .map_err(ScraperError::network)?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(ScraperError::network)?;

        debug!(%status, elapsed = ?start.elapsed(), bytes = text.len(), "Fetched search page");

        check_page(status, &text)?;
        Ok(text)
    }
}

impl ListingSource for RealtorSource {
    fn name(&self) -> &'static str {
        "realtor"
    }

    #[instrument(skip(self, request), fields(location = %request.location))]
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawListing>, ScraperError> {
        let url = Self::search_url(request)?;
        info!(%url, "Fetching rental listings");

        let html = self.fetch_html(&url)?;
        let data = extract_next_data(&html)?;
        let listings = extract_listings(&data, request, Utc::now().date_naive())?;

        info!(count = listings.len(), "Rental listings fetched");
        Ok(listings)
    }
}

/// "Chicago, IL" -> "Chicago_IL", "Lincoln Park Chicago" -> "Lincoln-Park-Chicago"
pub fn location_slug(location: &str) -> String {
    location
        .split(',')
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join("-"))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn realtor_type(t: PropertyType) -> &'static str {
    match t {
        PropertyType::SingleFamily => "single-family-home",
        PropertyType::MultiFamily => "multi-family-home",
        PropertyType::Condos => "condo",
        PropertyType::CondoTownhome => "condo-townhome",
        PropertyType::Townhomes => "townhome",
        PropertyType::DuplexTriplex => "duplex-triplex",
        PropertyType::Farm => "farms-ranches",
        PropertyType::Land => "land",
        PropertyType::Mobile => "mfd-mobile-home",
    }
}

/// Classify a response before parsing: bot walls and error statuses are
/// failures, never "zero listings".
fn check_page(status: StatusCode, body: &str) -> Result<(), ScraperError> {
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ScraperError::Blocked(format!("HTTP {status}")));
    }

    if !status.is_success() {
        return Err(ScraperError::Status(status.as_u16()));
    }

    // ZenRows reports its own failures as a JSON body with a "code" field.
    if body.trim_start().starts_with('{') {
        if let Ok(json) = serde_json::from_str::<Value>(body) {
            if json.get("code").is_some() {
                return Err(ScraperError::Network(format!("ZenRows API error: {body}")));
            }
        }
    }

    if !body.contains("__NEXT_DATA__") {
        if let Some(marker) = BLOCK_MARKERS.iter().find(|m| body.contains(**m)) {
            return Err(ScraperError::Blocked(format!("challenge page ({marker})")));
        }
    }

    Ok(())
}

pub fn extract_next_data(html: &str) -> Result<Value, ScraperError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"script[id="__NEXT_DATA__"]"#)
        .map_err(|e| ScraperError::HtmlParse(e.to_string()))?;

    let element = document
        .select(&selector)
        .next()
        .ok_or(ScraperError::MissingNextData)?;

    let json_text: String = element.text().collect();
    serde_json::from_str(&json_text).map_err(|e| ScraperError::JsonParse(e.to_string()))
}

// Rental search pages have used both layouts.
const PROPERTY_POINTERS: [&str; 2] = [
    "/props/pageProps/properties",
    "/props/pageProps/searchResults/home_search/results",
];

pub fn extract_listings(
    data: &Value,
    request: &FetchRequest,
    today: NaiveDate,
) -> Result<Vec<RawListing>, ScraperError> {
    let arr = PROPERTY_POINTERS
        .iter()
        .find_map(|p| data.pointer(p).and_then(Value::as_array))
        .ok_or_else(|| ScraperError::UnexpectedShape("properties missing".to_string()))?;

    let mut listings = Vec::with_capacity(arr.len().min(request.max_results));

    for value in arr {
        if !value.is_object() {
            warn!("Skipping non-object rental record");
            continue;
        }

        let raw = match serde_json::from_value::<RentalProperty>(value.clone()) {
            Ok(prop) => prop.into_raw(request.include_extra),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable rental record");
                continue;
            }
        };

        if !listed_recently(&raw, request.listed_within_days, today) {
            continue;
        }

        listings.push(raw);
        if listings.len() >= request.max_results {
            break;
        }
    }

    Ok(listings)
}

/// Records without a readable list date are kept.
fn listed_recently(raw: &RawListing, days: u32, today: NaiveDate) -> bool {
    let Some(listed) = raw.get("list_date").and_then(Value::as_str).and_then(parse_list_date) else {
        return true;
    };

    (today - listed).num_days() <= i64::from(days)
}
