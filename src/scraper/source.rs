// src/scraper/source.rs
use crate::domain::property_type::PropertyType;
use crate::scraper::ScraperError;
use serde_json::{Map, Value};

/// A loosely-typed listing record exactly as an upstream source produced it.
pub type RawListing = Map<String, Value>;

/// Every adapter searches rentals only.
pub const LISTING_TYPE: &str = "for_rent";

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub location: String,
    pub property_types: Vec<PropertyType>,
    /// Passed upstream as a hint; results are always re-filtered locally.
    pub radius_miles: Option<f64>,
    pub listed_within_days: u32,
    pub max_results: usize,
    pub include_extra: bool,
}

/// An upstream provider of rental listings.
///
/// `Ok(vec![])` means the provider answered and had nothing. Anything that
/// prevented an answer (network, blocking, garbage) must be an `Err`.
pub trait ListingSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawListing>, ScraperError>;
}

/// Insert `value` under `key` unless it is absent or JSON null.
pub(crate) fn put(raw: &mut RawListing, key: &str, value: Option<Value>) {
    match value {
        None | Some(Value::Null) => {}
        Some(v) => {
            raw.insert(key.to_string(), v);
        }
    }
}
