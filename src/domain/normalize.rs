// src/domain/normalize.rs
//
// Raw listing maps -> canonical `Listing`. Every rule here is total: a field
// that is missing or malformed falls back to its default instead of failing.
//
//   counts (beds, baths)      -> 0
//   price, sqft               -> None (unknown, never 0)
//   strings                   -> "" for address parts, None for contacts
//   coordinates               -> None unless both parse and are in range

use crate::domain::listing::{Address, Contact, Listing};
use crate::geo::GeoPoint;
use crate::scraper::RawListing;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

const REALTOR_DETAIL_BASE: &str = "https://www.realtor.com/realestateandhomes-detail/";

pub fn normalize(raw: &RawListing) -> Listing {
    let (full_baths, half_baths) = bath_counts(raw);

    let location = match (
        number_field(raw, &["latitude", "lat"]),
        number_field(raw, &["longitude", "lon", "lng"]),
    ) {
        (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
        _ => None,
    };

    Listing {
        identity: identity(raw),
        address: Address {
            street: text_field(raw, &["street", "address_line", "line"]).unwrap_or_default(),
            unit: text_field(raw, &["unit"]),
            city: text_field(raw, &["city"]).unwrap_or_default(),
            region: text_field(raw, &["state", "state_code"]).unwrap_or_default(),
            postal_code: text_field(raw, &["zip_code", "postal_code", "zip"]).unwrap_or_default(),
        },
        location,
        list_price: amount_field(raw, &["list_price", "price", "list_price_min"]),
        beds: count_field(raw, &["beds", "bedrooms", "beds_min"]).unwrap_or(0),
        full_baths,
        half_baths,
        sqft: amount_field(raw, &["sqft", "sqft_min"]),
        property_type: text_field(raw, &["style", "property_type"]),
        listed_on: text_field(raw, &["list_date"]).and_then(|d| parse_list_date(&d)),
        agent: Contact {
            name: text_field(raw, &["agent_name"]),
            email: email_field(raw, &["agent_email"]),
            phone: phone_field(raw, &["agent_phones", "agent_phone"]),
        },
        office: Contact {
            name: text_field(raw, &["office_name"]),
            email: email_field(raw, &["office_email"]),
            phone: phone_field(raw, &["office_phones", "office_phone"]),
        },
        distance_miles: None,
    }
}

/// Normalize a whole fetch. Repeated identities get `#2`, `#3`, ... in fetch
/// order so the result set can be keyed by identity; nothing is dropped.
pub fn normalize_batch(raws: &[RawListing]) -> Vec<Listing> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raws.len());

    raws.iter()
        .map(|raw| {
            let mut listing = normalize(raw);

            if seen.contains(&listing.identity) {
                let base = listing.identity.clone();
                let mut n = 2;
                while seen.contains(&format!("{base}#{n}")) {
                    n += 1;
                }
                listing.identity = format!("{base}#{n}");
            }

            seen.insert(listing.identity.clone());
            listing
        })
        .collect()
}

fn identity(raw: &RawListing) -> String {
    if let Some(url) = text_field(raw, &["property_url", "url"]) {
        return url;
    }
    if let Some(permalink) = text_field(raw, &["permalink"]) {
        return format!("{REALTOR_DETAIL_BASE}{permalink}");
    }
    if let Some(id) = text_field(raw, &["property_id", "listing_id", "id"]) {
        return id;
    }

    let mut entries: Vec<(&String, &Value)> = raw.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    let json = serde_json::to_string(&entries).unwrap_or_default();
    let digest = Sha256::digest(json.as_bytes());
    let hex: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();
    format!("listing:{hex}")
}

fn bath_counts(raw: &RawListing) -> (u32, u32) {
    let full = count_field(raw, &["full_baths", "baths_full"]);
    let half = count_field(raw, &["half_baths", "baths_half"]);

    if full.is_some() || half.is_some() {
        return (full.unwrap_or(0), half.unwrap_or(0));
    }

    // Combined count like 1.5: whole part is full baths, a .5 is one half bath.
    match number_field(raw, &["baths", "bathrooms"]) {
        Some(total) if total >= 0.0 => {
            let whole = total.trunc();
            let half = if total - whole >= 0.5 { 1 } else { 0 };
            (to_u32(whole), half)
        }
        _ => (0, 0),
    }
}

pub fn parse_list_date(s: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .ok()
        .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | ' '))
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(raw: &RawListing, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| raw.get(*k).and_then(number))
}

fn text_field(raw: &RawListing, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| raw.get(*k).and_then(text))
}

fn count_field(raw: &RawListing, keys: &[&str]) -> Option<u32> {
    number_field(raw, keys)
        .filter(|n| *n >= 0.0)
        .map(|n| to_u32(n.trunc()))
}

/// Non-negative whole dollars / square feet.
fn amount_field(raw: &RawListing, keys: &[&str]) -> Option<i64> {
    number_field(raw, keys)
        .filter(|n| *n >= 0.0 && *n <= i64::MAX as f64)
        .map(|n| n.round() as i64)
}

/// A single plain address. Anything that could add mailto headers or extra
/// recipients (`?`, `&`, separators, whitespace) is rejected outright.
fn email_field(raw: &RawListing, keys: &[&str]) -> Option<String> {
    text_field(raw, keys).filter(|e| {
        e.matches('@').count() == 1
            && !e.starts_with('@')
            && !e.ends_with('@')
            && !e
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || "?&,;<>\"%#/\\".contains(c))
    })
}

/// Phones arrive as a string, a number, a list, or a list of `{number: ..}`.
fn phone_field(raw: &RawListing, keys: &[&str]) -> Option<String> {
    fn phone(value: &Value) -> Option<String> {
        match value {
            Value::Array(items) => items.iter().find_map(phone),
            Value::Object(obj) => obj.get("number").and_then(text),
            other => text(other),
        }
    }
    keys.iter().find_map(|k| raw.get(*k).and_then(phone))
}

fn to_u32(n: f64) -> u32 {
    n.min(u32::MAX as f64) as u32
}
