use crate::domain::filter::HalfBathPolicy;
use crate::geo::GeoPoint;
use chrono::NaiveDate;

/// A rental listing in the one shape every downstream piece works with.
/// Built once per fetch by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Listing URL or source id; unique within one result set.
    pub identity: String,

    pub address: Address,
    pub location: Option<GeoPoint>,

    /// Monthly rent in whole dollars. `None` means unknown, not free.
    pub list_price: Option<i64>,

    pub beds: u32,
    pub full_baths: u32,
    pub half_baths: u32,

    pub sqft: Option<i64>,
    pub property_type: Option<String>,
    pub listed_on: Option<NaiveDate>,

    pub agent: Contact,
    pub office: Contact,

    /// Miles from the search center; only set when both ends are known.
    pub distance_miles: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub street: String,
    pub unit: Option<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Address {
    /// "2400 N Lincoln Ave Apt 3"
    pub fn street_line(&self) -> String {
        match &self.unit {
            Some(unit) if !self.street.is_empty() => format!("{} {}", self.street, unit),
            Some(unit) => unit.clone(),
            None => self.street.clone(),
        }
    }

    /// "2400 N Lincoln Ave Apt 3, Chicago, IL 60614", skipping blank parts.
    pub fn one_line(&self) -> String {
        let region_zip = [self.region.as_str(), self.postal_code.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        [self.street_line(), self.city.clone(), region_zip]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Listing {
    pub fn total_baths(&self, policy: HalfBathPolicy) -> f64 {
        f64::from(self.full_baths) + f64::from(self.half_baths) * policy.weight()
    }
}
