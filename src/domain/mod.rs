pub mod filter;
pub mod listing;
pub mod normalize;
pub mod outreach;
pub mod property_type;
pub mod search;
pub mod selection;
pub mod session;
