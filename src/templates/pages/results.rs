// templates/pages/results.rs

use crate::domain::filter::HalfBathPolicy;
use crate::domain::listing::Listing;
use crate::domain::outreach::{compose, mailto_href, thousands, ContactRole};
use crate::domain::search::{SearchOutcome, SearchStatus};
use crate::templates::{
    components::{card, notice, search_form},
    desktop_layout,
};
use maud::{html, Markup};

pub fn results_page(outcome: &SearchOutcome) -> Markup {
    let tone = match outcome.status {
        SearchStatus::Found => "ok",
        SearchStatus::FetchFailed(_) => "error",
        _ => "info",
    };

    desktop_layout(
        "Results",
        html! {
            (card("Search", search_form(&outcome.query)))

            section class="results" {
                (notice(tone, &outcome.status.message()))
                @if let Some(advisory) = outcome.advisory() {
                    (notice("warn", advisory))
                }

                @if !outcome.listings.is_empty() {
                    h2 {
                        (outcome.listings.len()) " of " (outcome.fetched)
                        " listings near " (outcome.query.location)
                    }
                    form method="post" action="/export" {
                        table class="listings" {
                            thead {
                                tr {
                                    th { "Export" }
                                    th { "Address" }
                                    th { "Price" }
                                    th { "Beds" }
                                    th { "Baths" }
                                    th { "Full / half" }
                                    th { "Sq ft" }
                                    th { "Distance" }
                                    th { "Listed" }
                                    th { "Agent" }
                                    th { "Office" }
                                }
                            }
                            tbody {
                                @for listing in &outcome.listings {
                                    (listing_row(listing, outcome.half_baths))
                                }
                            }
                        }
                        button type="submit" class="btn" { "Export selected" }
                    }
                }
            }
        },
    )
}

fn listing_row(listing: &Listing, half_baths: HalfBathPolicy) -> Markup {
    let address = listing.address.one_line();
    let address = if address.is_empty() { "Address unavailable".to_string() } else { address };

    html! {
        tr {
            td { input type="checkbox" name="id" value=(listing.identity); }
            td {
                @if listing.identity.starts_with("http") {
                    a href=(listing.identity) target="_blank" rel="noopener" { (address) }
                } @else {
                    (address)
                }
            }
            td {
                @match listing.list_price {
                    Some(price) => { "$" (thousands(price)) },
                    None => "—",
                }
            }
            td { (listing.beds) }
            td { (listing.total_baths(half_baths)) }
            td { (listing.full_baths) " / " (listing.half_baths) }
            td {
                @match listing.sqft {
                    Some(sqft) => { (thousands(sqft)) },
                    None => "—",
                }
            }
            td {
                @match listing.distance_miles {
                    Some(d) => { (format!("{d:.1}")) " mi" },
                    None => "—",
                }
            }
            td {
                @if let Some(listed) = listing.listed_on {
                    (listed.format("%b %-d, %Y").to_string())
                }
            }
            td {
                @if let Some(name) = &listing.agent.name {
                    span class="agent" { (name) " " }
                }
                @if let Some(phone) = &listing.agent.phone {
                    a class="tel" href={ "tel:" (phone) } { (phone) } " "
                }
                @if let Some(message) = compose(listing, ContactRole::Agent) {
                    a class="mailto" href=(mailto_href(&message)) { "Email agent" }
                }
            }
            td {
                @if let Some(name) = &listing.office.name {
                    span class="office" { (name) " " }
                }
                @if let Some(phone) = &listing.office.phone {
                    a class="tel" href={ "tel:" (phone) } { (phone) } " "
                }
                @if let Some(message) = compose(listing, ContactRole::Office) {
                    a class="mailto" href=(mailto_href(&message)) { "Email office" }
                }
            }
        }
    }
}
