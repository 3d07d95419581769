use crate::domain::listing::Listing;
use std::collections::HashSet;

/// The chosen listings, in ranked order. Keyed by identity, so a selection
/// made on one rendering still applies if positions shift.
pub fn select(ranked: &[Listing], chosen: &HashSet<String>) -> Vec<Listing> {
    ranked
        .iter()
        .filter(|l| chosen.contains(&l.identity))
        .cloned()
        .collect()
}
