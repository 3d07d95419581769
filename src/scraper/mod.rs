mod feed;
mod models;
mod realtor;
mod scraper_error;
mod source;

pub use feed::FeedSource;
pub use realtor::RealtorSource;
pub use scraper_error::ScraperError;
pub use source::{FetchRequest, ListingSource, RawListing};
