// src/domain/filter.rs

use crate::domain::listing::Listing;
use crate::geo::{distance_miles, GeoPoint};
use std::cmp::Ordering;

/// How much a half bath counts toward the minimum-baths threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HalfBathPolicy {
    /// total = full + half
    #[default]
    WholeUnit,
    /// total = full + 0.5 * half
    HalfUnit,
}

impl HalfBathPolicy {
    pub fn weight(self) -> f64 {
        match self {
            HalfBathPolicy::WholeUnit => 1.0,
            HalfBathPolicy::HalfUnit => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub min_beds: u32,
    pub min_baths: f64,
    pub radius_miles: f64,
    pub half_baths: HalfBathPolicy,
}

/// Filter by rooms, then (with a known center) by radius, and rank by distance.
///
/// Room filters run first so distances are only computed for survivors.
/// Listings without coordinates can't be checked against the radius and are
/// kept, sorted after every listing that has a distance. Without a center the
/// fetch order is left alone.
pub fn process(listings: Vec<Listing>, center: Option<GeoPoint>, constraints: &Constraints) -> Vec<Listing> {
    let rooms_ok = listings.into_iter().filter(|l| {
        l.beds >= constraints.min_beds && l.total_baths(constraints.half_baths) >= constraints.min_baths
    });

    let Some(center) = center else {
        return rooms_ok.collect();
    };

    let mut ranked: Vec<Listing> = rooms_ok
        .filter_map(|mut listing| {
            if let Some(point) = listing.location {
                let distance = distance_miles(center, point);
                if distance > constraints.radius_miles {
                    return None;
                }
                listing.distance_miles = Some(distance);
            }
            Some(listing)
        })
        .collect();

    // sort_by is stable, so distance-less listings keep their fetch order.
    ranked.sort_by(|a, b| match (a.distance_miles, b.distance_miles) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    ranked
}
