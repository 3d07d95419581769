// feed.rs
use crate::scraper::source::{FetchRequest, ListingSource, RawListing, LISTING_TYPE};
use crate::scraper::ScraperError;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// A JSON endpoint that already speaks the HomeHarvest column names
/// (`property_url`, `list_price`, `beds`, `full_baths`, ...).
pub struct FeedSource {
    client: Client,
    url: String,
}

impl FeedSource {
    pub fn new(url: String, timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ScraperError::network)?;

        Ok(Self { client, url })
    }

    pub fn query_params(request: &FetchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("location", request.location.clone()),
            ("listing_type", LISTING_TYPE.to_string()),
            ("past_days", request.listed_within_days.to_string()),
            ("limit", request.max_results.to_string()),
            ("extra_property_data", request.include_extra.to_string()),
        ];

        if let Some(radius) = request.radius_miles {
            params.push(("radius", radius.to_string()));
        }

        if !request.property_types.is_empty() {
            let types: Vec<&str> = request.property_types.iter().map(|t| t.as_str()).collect();
            params.push(("property_type", types.join(",")));
        }

        params
    }
}

impl ListingSource for FeedSource {
    fn name(&self) -> &'static str {
        "feed"
    }

    #[instrument(skip(self, request), fields(location = %request.location))]
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawListing>, ScraperError> {
        let resp = self
            .client
            .get(&self.url)
            .query(&Self::query_params(request))
            .send()
            .map_err(ScraperError::network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Status(status.as_u16()));
        }

        let body: Value = resp
            .json()
            .map_err(|e| ScraperError::JsonParse(e.without_url().to_string()))?;

        let listings = extract_feed_records(body, request.max_results)?;
        info!(count = listings.len(), "Feed listings fetched");
        Ok(listings)
    }
}

/// Accepts a bare array, or an object wrapping one under `properties` or
/// `listings`.
pub fn extract_feed_records(body: Value, max_results: usize) -> Result<Vec<RawListing>, ScraperError> {
    let records = match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            let wrapped = ["properties", "listings"]
                .into_iter()
                .find_map(|key| match obj.remove(key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                });

            match wrapped {
                Some(items) => items,
                None => {
                    return Err(ScraperError::UnexpectedShape(
                        "expected a 'properties' or 'listings' array".into(),
                    ))
                }
            }
        }
        other => {
            return Err(ScraperError::UnexpectedShape(format!(
                "expected an array, got {other}"
            )))
        }
    };

    let mut listings = Vec::new();
    for record in records {
        match record {
            Value::Object(obj) => listings.push(obj),
            other => warn!(record = %other, "Skipping non-object feed record"),
        }
        if listings.len() >= max_results {
            break;
        }
    }

    Ok(listings)
}
