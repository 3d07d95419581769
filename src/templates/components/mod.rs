use maud::{html, Markup};

pub mod error;
pub mod search_form;

pub use error::error_page;
pub use search_form::search_form;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// Status line shown above results. `tone` becomes a CSS modifier.
pub fn notice(tone: &str, message: &str) -> Markup {
    html! {
        p class={ "notice notice-" (tone) } role="status" { (message) }
    }
}
