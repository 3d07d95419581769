pub mod geocoder;
pub mod point;

pub use geocoder::{CensusGeocoder, Geocoder, NominatimGeocoder};
pub use point::{distance_miles, GeoPoint};
