// state.rs
use crate::config::{Config, GeocoderKind, SourceKind};
use crate::domain::search::SearchPipeline;
use crate::domain::session::SessionStore;
use crate::errors::ServerError;
use crate::geo::{CensusGeocoder, Geocoder, NominatimGeocoder};
use crate::scraper::{FeedSource, ListingSource, RealtorSource};
use tracing::info;

/// Shared by every worker thread for the life of the server.
pub struct AppState {
    pub pipeline: SearchPipeline,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(pipeline: SearchPipeline) -> Self {
        Self {
            pipeline,
            sessions: SessionStore::new(),
        }
    }

    /// Wire up the configured geocoder and listing source.
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let geocoder: Box<dyn Geocoder> = match config.geocoder {
            GeocoderKind::Nominatim => Box::new(
                NominatimGeocoder::new(config.geocoder_url.clone(), config.http_timeout)
                    .map_err(|e| ServerError::Internal(format!("geocoder setup failed: {e}")))?,
            ),
            GeocoderKind::Census => Box::new(
                CensusGeocoder::new(config.geocoder_url.clone(), config.http_timeout)
                    .map_err(|e| ServerError::Internal(format!("geocoder setup failed: {e}")))?,
            ),
        };

        let source: Box<dyn ListingSource> = match &config.source {
            SourceKind::Realtor => Box::new(
                RealtorSource::new(config.http_timeout, config.zenrows_api_key.clone())
                    .map_err(|e| ServerError::Internal(format!("source setup failed: {e}")))?,
            ),
            SourceKind::Feed { url } => Box::new(
                FeedSource::new(url.clone(), config.http_timeout)
                    .map_err(|e| ServerError::Internal(format!("source setup failed: {e}")))?,
            ),
        };

        info!(
            geocoder = ?config.geocoder,
            source = source.name(),
            half_baths = ?config.half_baths,
            "Search pipeline ready"
        );

        Ok(Self::new(SearchPipeline::new(
            geocoder,
            source,
            config.half_baths,
        )))
    }
}
