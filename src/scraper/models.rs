use crate::scraper::source::{put, RawListing};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// Rental search result as embedded in realtor.com's __NEXT_DATA__.
//
// prop
//  ├── property_id / listing_id / permalink / status / list_date
//  ├── list_price | list_price_min | list_price_max
//  ├── description
//  │    ├── beds | beds_min
//  │    ├── baths_full, baths_half | baths | baths_min
//  │    ├── sqft | sqft_min, lot_sqft, year_built
//  │    └── type
//  ├── location
//  │    └── address
//  │         ├── line, unit, city, state_code, postal_code
//  │         └── coordinate { lat, lon }
//  └── advertisers[]
//       ├── type ("seller" is the listing agent)
//       ├── name, email, phones[] { number }
//       └── office { name, email, phones[] }
//
// Leaf values stay as raw JSON. Realtor mixes numbers, numeric strings and
// nulls for the same field, and coercion is the normalizer's job. Typed
// fields go through `lenient`, so one badly shaped branch becomes `None`
// without losing the rest of the record.

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RentalProperty {
    pub property_id: Option<Value>,
    pub listing_id: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub permalink: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub href: Option<String>,
    pub status: Option<Value>,
    pub list_date: Option<Value>,

    pub list_price: Option<Value>,
    pub list_price_min: Option<Value>,

    #[serde(deserialize_with = "lenient")]
    pub description: Option<Description>,
    #[serde(deserialize_with = "lenient")]
    pub location: Option<Location>,
    #[serde(deserialize_with = "lenient")]
    pub advertisers: Option<Vec<Advertiser>>,
    #[serde(deserialize_with = "lenient")]
    pub tags: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Description {
    pub beds: Option<Value>,
    pub beds_min: Option<Value>,
    pub baths: Option<Value>,
    pub baths_min: Option<Value>,
    pub baths_full: Option<Value>,
    pub baths_half: Option<Value>,
    pub sqft: Option<Value>,
    pub sqft_min: Option<Value>,
    pub lot_sqft: Option<Value>,
    pub year_built: Option<Value>,
    #[serde(rename = "type")]
    pub property_type: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "lenient")]
    pub address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Address {
    pub line: Option<Value>,
    pub unit: Option<Value>,
    pub city: Option<Value>,
    pub state_code: Option<Value>,
    pub postal_code: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub coordinate: Option<Coordinate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Coordinate {
    pub lat: Option<Value>,
    pub lon: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Advertiser {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub advertiser_type: Option<String>,
    pub name: Option<Value>,
    pub email: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub phones: Option<Vec<Phone>>,
    #[serde(deserialize_with = "lenient")]
    pub office: Option<Office>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Office {
    pub name: Option<Value>,
    pub email: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub phones: Option<Vec<Phone>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Phone {
    pub number: Option<Value>,
}

fn first_phone(phones: &Option<Vec<Phone>>) -> Option<Value> {
    phones
        .as_ref()?
        .iter()
        .find_map(|p| p.number.clone().filter(|n| !n.is_null()))
}

fn non_null(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

impl RentalProperty {
    /// Flatten into the HomeHarvest column names the normalizer understands.
    pub fn into_raw(self, include_extra: bool) -> RawListing {
        let mut raw = RawListing::new();

        let url = self
            .permalink
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("https://www.realtor.com/realestateandhomes-detail/{p}"))
            .or(self.href.filter(|h| !h.is_empty()));
        put(&mut raw, "property_url", url.map(Value::String));
        put(&mut raw, "property_id", self.property_id);
        put(&mut raw, "listing_id", self.listing_id);
        put(&mut raw, "status", self.status);
        put(&mut raw, "list_date", self.list_date);
        put(
            &mut raw,
            "list_price",
            non_null(self.list_price).or(self.list_price_min),
        );

        if let Some(desc) = self.description {
            put(&mut raw, "beds", non_null(desc.beds).or(desc.beds_min));

            if desc.baths_full.is_some() || desc.baths_half.is_some() {
                put(&mut raw, "full_baths", desc.baths_full);
                put(&mut raw, "half_baths", desc.baths_half);
            } else {
                put(&mut raw, "baths", non_null(desc.baths).or(desc.baths_min));
            }

            put(&mut raw, "style", desc.property_type);

            if include_extra {
                put(&mut raw, "sqft", non_null(desc.sqft).or(desc.sqft_min));
                put(&mut raw, "lot_sqft", desc.lot_sqft);
                put(&mut raw, "year_built", desc.year_built);
            }
        }

        if let Some(address) = self.location.and_then(|l| l.address) {
            put(&mut raw, "street", address.line);
            put(&mut raw, "unit", address.unit);
            put(&mut raw, "city", address.city);
            put(&mut raw, "state", address.state_code);
            put(&mut raw, "zip_code", address.postal_code);

            if let Some(coord) = address.coordinate {
                put(&mut raw, "latitude", coord.lat);
                put(&mut raw, "longitude", coord.lon);
            }
        }

        let advertisers = self.advertisers.unwrap_or_default();
        let agent = advertisers
            .iter()
            .find(|a| a.advertiser_type.as_deref() == Some("seller"))
            .or_else(|| advertisers.first());

        if let Some(agent) = agent {
            put(&mut raw, "agent_name", agent.name.clone());
            put(&mut raw, "agent_email", agent.email.clone());
            put(&mut raw, "agent_phones", first_phone(&agent.phones));

            if let Some(office) = &agent.office {
                put(&mut raw, "office_name", office.name.clone());
                put(&mut raw, "office_email", office.email.clone());
                put(&mut raw, "office_phones", first_phone(&office.phones));
            }
        }

        if include_extra {
            if let Some(tags) = self.tags {
                let tags: Vec<Value> = tags.into_iter().filter(|t| t.is_string()).collect();
                if !tags.is_empty() {
                    raw.insert("tags".into(), Value::Array(tags));
                }
            }
        }

        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "property_id": "3951237581",
            "listing_id": "2961378921",
            "permalink": "2400-N-Lincoln-Ave-Apt-3_Chicago_IL_60614_M39512-37581",
            "status": "for_rent",
            "list_date": "2024-05-02T15:04:11Z",
            "list_price": null,
            "list_price_min": 2150,
            "description": {
                "beds": 2,
                "baths_full": 1,
                "baths_half": 1,
                "sqft": "950",
                "type": "apartment"
            },
            "location": {
                "address": {
                    "line": "2400 N Lincoln Ave",
                    "unit": "Apt 3",
                    "city": "Chicago",
                    "state_code": "IL",
                    "postal_code": "60614",
                    "coordinate": {"lat": 41.9243, "lon": -87.6468}
                }
            },
            "advertisers": [
                {"type": "community", "name": "Lincoln Lofts"},
                {
                    "type": "seller",
                    "name": "Pat Doe",
                    "email": "pat@example.com",
                    "phones": [{"number": null}, {"number": "3125550100"}],
                    "office": {"name": "North Side Realty", "email": "office@example.com"}
                }
            ],
            "tags": ["pets_allowed", 7]
        })
    }

    #[test]
    fn flattens_nested_rental() {
        let prop: RentalProperty = serde_json::from_value(sample()).unwrap();
        let raw = prop.into_raw(false);

        assert_eq!(
            raw["property_url"],
            "https://www.realtor.com/realestateandhomes-detail/2400-N-Lincoln-Ave-Apt-3_Chicago_IL_60614_M39512-37581"
        );
        assert_eq!(raw["list_price"], 2150);
        assert_eq!(raw["beds"], 2);
        assert_eq!(raw["full_baths"], 1);
        assert_eq!(raw["half_baths"], 1);
        assert!(!raw.contains_key("baths"));
        assert_eq!(raw["street"], "2400 N Lincoln Ave");
        assert_eq!(raw["unit"], "Apt 3");
        assert_eq!(raw["zip_code"], "60614");
        assert_eq!(raw["latitude"], 41.9243);
        assert_eq!(raw["agent_name"], "Pat Doe");
        assert_eq!(raw["agent_email"], "pat@example.com");
        assert_eq!(raw["agent_phones"], "3125550100");
        assert_eq!(raw["office_name"], "North Side Realty");

        // Extra data only on request
        assert!(!raw.contains_key("sqft"));
        assert!(!raw.contains_key("tags"));
    }

    #[test]
    fn include_extra_adds_details() {
        let prop: RentalProperty = serde_json::from_value(sample()).unwrap();
        let raw = prop.into_raw(true);

        assert_eq!(raw["sqft"], "950");
        assert_eq!(raw["tags"], json!(["pets_allowed"]));
    }

    #[test]
    fn combined_baths_used_when_split_missing() {
        let prop: RentalProperty = serde_json::from_value(json!({
            "description": {"beds_min": 1, "baths": "1.5"}
        }))
        .unwrap();
        let raw = prop.into_raw(false);

        assert_eq!(raw["beds"], 1);
        assert_eq!(raw["baths"], "1.5");
        assert!(!raw.contains_key("full_baths"));
    }

    #[test]
    fn mistyped_branches_do_not_sink_the_record() {
        let prop: RentalProperty = serde_json::from_value(json!({
            "property_id": "7",
            "permalink": 12345,
            "tags": "pets",
            "advertisers": "nope",
            "list_price": 2100,
            "description": {"beds": 2, "baths_full": 1},
            "location": {
                "address": {
                    "line": "1 Main St",
                    "coordinate": {"lat": 41.9, "lon": -87.6}
                }
            }
        }))
        .unwrap();
        let raw = prop.into_raw(true);

        assert_eq!(raw["property_id"], "7");
        assert_eq!(raw["beds"], 2);
        assert_eq!(raw["full_baths"], 1);
        assert_eq!(raw["street"], "1 Main St");
        assert_eq!(raw["latitude"], 41.9);
        assert!(!raw.contains_key("property_url"));
        assert!(!raw.contains_key("agent_name"));
        assert!(!raw.contains_key("tags"));
    }

    #[test]
    fn empty_record_flattens_to_empty_map() {
        let prop: RentalProperty = serde_json::from_value(json!({})).unwrap();
        assert!(prop.into_raw(true).is_empty());
    }
}
