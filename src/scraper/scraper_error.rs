use thiserror::Error;

/// Why a listing fetch failed. Any of these means "search failed", which the
/// UI reports differently from a fetch that returned zero listings.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Blocked by site: {0}")]
    Blocked(String),

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("HTML parse error: {0}")]
    HtmlParse(String),

    #[error("__NEXT_DATA__ not found")]
    MissingNextData,

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Unexpected data shape: {0}")]
    UnexpectedShape(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScraperError {
    /// Request URLs can carry the proxy API key, so they are stripped before
    /// the error reaches logs or the results page.
    pub fn network(e: reqwest::Error) -> Self {
        ScraperError::Network(e.without_url().to_string())
    }
}
