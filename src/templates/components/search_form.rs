use crate::domain::property_type::PropertyType;
use crate::domain::search::SearchQuery;
use maud::{html, Markup};

/// The search form, pre-filled from `query`.
pub fn search_form(query: &SearchQuery) -> Markup {
    html! {
        form class="search-form" method="get" action="/search" {
            label for="location" { "Location" }
            input type="text" id="location" name="location" required
                placeholder="ZIP, city or address" value=(query.location);

            fieldset {
                legend { "Property types" }
                @for t in PropertyType::ALL {
                    label class="checkbox" {
                        input type="checkbox" name="property_type" value=(t.as_str())
                            checked[query.property_types.contains(&t)];
                        " " (t.label())
                    }
                }
            }

            label for="radius" { "Radius (miles)" }
            input type="number" id="radius" name="radius" min="0" max="100" step="0.5"
                value=(query.radius_miles);

            label for="past_days" { "Listed within (days)" }
            input type="number" id="past_days" name="past_days" min="1" max="365"
                value=(query.listed_within_days);

            label for="limit" { "Max results" }
            input type="number" id="limit" name="limit" min="1" max="1000"
                value=(query.max_results);

            label for="min_beds" { "Min beds" }
            input type="number" id="min_beds" name="min_beds" min="0" max="20"
                value=(query.min_beds);

            label for="min_baths" { "Min baths" }
            input type="number" id="min_baths" name="min_baths" min="0" max="20" step="0.5"
                value=(query.min_baths);

            label class="checkbox" {
                input type="checkbox" name="extra_data" value="on" checked[query.include_extra];
                " Include extra property data"
            }

            button type="submit" class="btn" { "Search" }
        }
    }
}
