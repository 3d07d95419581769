// templates/pages/home.rs

use crate::domain::search::SearchQuery;
use crate::templates::{
    components::{card, search_form},
    desktop_layout,
};
use maud::{html, Markup};

pub fn home_page(query: &SearchQuery) -> Markup {
    desktop_layout(
        "Search",
        html! {
            h1 { "Find rentals near you" }

            (card("Search", search_form(query)))

            p class="hint" {
                "Results are ranked by distance from the location you enter. "
                "Tick listings and export them to a spreadsheet for outreach."
            }
        },
    )
}
