// src/domain/search.rs
use crate::domain::filter::{process, Constraints, HalfBathPolicy};
use crate::domain::listing::Listing;
use crate::domain::normalize::normalize_batch;
use crate::domain::property_type::PropertyType;
use crate::errors::ServerError;
use crate::geo::{GeoPoint, Geocoder};
use crate::scraper::{FetchRequest, ListingSource};
use std::time::Instant;
use tracing::{info, instrument, warn};

pub const DEFAULT_LOCATION: &str = "60614";

/// One search as submitted from the form.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub location: String,
    pub property_types: Vec<PropertyType>,
    pub radius_miles: f64,
    pub listed_within_days: u32,
    pub max_results: usize,
    pub include_extra: bool,
    pub min_beds: u32,
    pub min_baths: f64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            property_types: Vec::new(),
            radius_miles: 10.0,
            listed_within_days: 30,
            max_results: 100,
            include_extra: false,
            min_beds: 0,
            min_baths: 0.0,
        }
    }
}

impl SearchQuery {
    /// Build from decoded form/query pairs. Missing fields take defaults;
    /// present ones must parse and be in range.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ServerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = SearchQuery {
            location: String::new(),
            ..SearchQuery::default()
        };

        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "location" => query.location = value.to_string(),
                "property_type" if !value.is_empty() => {
                    let t = PropertyType::parse(value).ok_or_else(|| {
                        ServerError::BadRequest(format!("unknown property type '{value}'"))
                    })?;
                    if !query.property_types.contains(&t) {
                        query.property_types.push(t);
                    }
                }
                "radius" if !value.is_empty() => {
                    query.radius_miles = parse_in_range("radius", value, 0.0, 100.0)?;
                }
                "past_days" if !value.is_empty() => {
                    query.listed_within_days = parse_in_range("past_days", value, 1, 365)?;
                }
                "limit" if !value.is_empty() => {
                    query.max_results = parse_in_range("limit", value, 1, 1000)?;
                }
                "extra_data" => {
                    query.include_extra = matches!(value, "on" | "true" | "1" | "yes");
                }
                "min_beds" if !value.is_empty() => {
                    query.min_beds = parse_in_range("min_beds", value, 0, 20)?;
                }
                "min_baths" if !value.is_empty() => {
                    query.min_baths = parse_in_range("min_baths", value, 0.0, 20.0)?;
                }
                _ => {}
            }
        }

        if query.location.is_empty() {
            return Err(ServerError::BadRequest("location is required".into()));
        }

        Ok(query)
    }

    pub fn fetch_request(&self) -> FetchRequest {
        FetchRequest {
            location: self.location.clone(),
            property_types: self.property_types.clone(),
            radius_miles: Some(self.radius_miles),
            listed_within_days: self.listed_within_days,
            max_results: self.max_results,
            include_extra: self.include_extra,
        }
    }

    pub fn constraints(&self, half_baths: HalfBathPolicy) -> Constraints {
        Constraints {
            min_beds: self.min_beds,
            min_baths: self.min_baths,
            radius_miles: self.radius_miles,
            half_baths,
        }
    }
}

fn parse_in_range<T>(field: &str, value: &str, min: T, max: T) -> Result<T, ServerError>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
    let parsed: T = value
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("{field} must be a number, got '{value}'")))?;

    // NaN fails both comparisons, so it lands here too
    if !(parsed >= min && parsed <= max) {
        return Err(ServerError::BadRequest(format!(
            "{field} must be between {min} and {max}"
        )));
    }

    Ok(parsed)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    /// At least one listing survived filtering.
    Found,
    /// The source answered with zero listings.
    NoListings,
    /// Listings came back but none passed the filters.
    NoMatches,
    /// The source could not be queried at all.
    FetchFailed(String),
}

impl SearchStatus {
    pub fn message(&self) -> String {
        match self {
            SearchStatus::Found => "Rental listings found.".to_string(),
            SearchStatus::NoListings => {
                "No rental listings found. Adjust filters or expand radius.".to_string()
            }
            SearchStatus::NoMatches => "No listings match your filters.".to_string(),
            SearchStatus::FetchFailed(reason) => format!("Search failed: {reason}"),
        }
    }
}

/// The result of one search: the ranked working set for a session.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: SearchQuery,
    pub center: Option<GeoPoint>,
    pub fetched: usize,
    pub listings: Vec<Listing>,
    pub status: SearchStatus,
    pub half_baths: HalfBathPolicy,
}

impl SearchOutcome {
    /// Shown alongside results when the location didn't geocode.
    pub fn advisory(&self) -> Option<&'static str> {
        if self.center.is_none() && !matches!(self.status, SearchStatus::FetchFailed(_)) {
            Some("Location could not be geocoded; distance filtering was skipped.")
        } else {
            None
        }
    }
}

/// geocode -> fetch -> normalize -> filter/rank
pub struct SearchPipeline {
    geocoder: Box<dyn Geocoder>,
    source: Box<dyn ListingSource>,
    half_baths: HalfBathPolicy,
}

impl SearchPipeline {
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        source: Box<dyn ListingSource>,
        half_baths: HalfBathPolicy,
    ) -> Self {
        Self {
            geocoder,
            source,
            half_baths,
        }
    }

    #[instrument(skip(self, query), fields(location = %query.location, source = self.source.name()))]
    pub fn run(&self, query: &SearchQuery) -> SearchOutcome {
        let start = Instant::now();

        let center = self.geocoder.resolve(&query.location);
        if center.is_none() {
            warn!("Proceeding without proximity filtering");
        }

        let raws = match self.source.fetch(&query.fetch_request()) {
            Ok(raws) => raws,
            Err(e) => {
                warn!(error = %e, "Listing fetch failed");
                return SearchOutcome {
                    query: query.clone(),
                    center,
                    fetched: 0,
                    listings: Vec::new(),
                    status: SearchStatus::FetchFailed(e.to_string()),
                    half_baths: self.half_baths,
                };
            }
        };

        let fetched = raws.len();
        let listings = process(
            normalize_batch(&raws),
            center,
            &query.constraints(self.half_baths),
        );

        let status = if fetched == 0 {
            SearchStatus::NoListings
        } else if listings.is_empty() {
            SearchStatus::NoMatches
        } else {
            SearchStatus::Found
        };

        info!(
            fetched,
            kept = listings.len(),
            geocoded = center.is_some(),
            elapsed = ?start.elapsed(),
            "Search complete"
        );

        SearchOutcome {
            query: query.clone(),
            center,
            fetched,
            listings,
            status,
            half_baths: self.half_baths,
        }
    }
}
