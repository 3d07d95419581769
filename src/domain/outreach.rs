// src/domain/outreach.rs
use crate::domain::listing::Listing;
use url::form_urlencoded::byte_serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRole {
    Agent,
    Office,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutreachMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Pre-filled inquiry to the listing's agent or office. `None` when that
/// contact has no email address.
pub fn compose(listing: &Listing, role: ContactRole) -> Option<OutreachMessage> {
    let contact = match role {
        ContactRole::Agent => &listing.agent,
        ContactRole::Office => &listing.office,
    };
    let to = contact.email.clone()?;

    let street = listing.address.street_line();
    let place = if street.is_empty() {
        listing.address.one_line()
    } else {
        street
    };
    let place = if place.is_empty() { "your listing".to_string() } else { place };

    let subject = format!("Inquiry: {}-bedroom rental at {}", listing.beds, place);

    let greeting = match &contact.name {
        Some(name) => format!("Hi {name},"),
        None => "Hello,".to_string(),
    };
    let price = match listing.list_price {
        Some(p) => format!("listed at ${}/month", thousands(p)),
        None => "at the listed rent".to_string(),
    };

    let body = format!(
        "{greeting}\n\n\
         I'm interested in the {beds}-bedroom rental at {place}, {price}. \
         Would the owner consider a short-term lease (3 to 6 months)? \
         If so, I'd love to set up a showing.\n\n\
         Thank you!",
        beds = listing.beds,
    );

    Some(OutreachMessage { to, subject, body })
}

/// `mailto:` link with the subject and body pre-filled.
pub fn mailto_href(message: &OutreachMessage) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        message.to,
        percent_encode(&message.subject),
        percent_encode(&message.body)
    )
}

// form encoding writes spaces as '+', which mail clients show literally.
// A literal '+' is already escaped as %2B, so swapping is safe.
fn percent_encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect::<String>().replace('+', "%20")
}

pub fn thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}
