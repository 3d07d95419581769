// config.rs
use crate::domain::filter::HalfBathPolicy;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocoderKind {
    Nominatim,
    Census,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Realtor,
    /// JSON feed speaking the HomeHarvest column names.
    Feed { url: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub http_timeout: Duration,
    pub geocoder: GeocoderKind,
    pub geocoder_url: Option<String>,
    pub source: SourceKind,
    pub zenrows_api_key: Option<String>,
    pub half_baths: HalfBathPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_workers: 8,
            http_timeout: Duration::from_secs(5),
            geocoder: GeocoderKind::Nominatim,
            geocoder_url: None,
            source: SourceKind::Realtor,
            zenrows_api_key: None,
            half_baths: HalfBathPolicy::WholeUnit,
        }
    }
}

impl Config {
    /// Read configuration from the process environment (after `.env` loading).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        let bind_addr = match get("BIND_ADDR") {
            Some(v) => v.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                value: v.clone(),
                reason: e.to_string(),
            })?,
            None => defaults.bind_addr,
        };

        let max_workers = match get("MAX_WORKERS") {
            Some(v) => parse_positive("MAX_WORKERS", &v)? as usize,
            None => defaults.max_workers,
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_positive("HTTP_TIMEOUT_SECS", &v)?),
            None => defaults.http_timeout,
        };

        let geocoder = match get("GEOCODER").as_deref() {
            None | Some("nominatim") => GeocoderKind::Nominatim,
            Some("census") => GeocoderKind::Census,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "GEOCODER",
                    value: other.to_string(),
                    reason: "expected 'nominatim' or 'census'".into(),
                })
            }
        };

        let source = match get("LISTING_SOURCE").as_deref() {
            None | Some("realtor") => SourceKind::Realtor,
            Some("feed") => SourceKind::Feed {
                url: get("LISTING_FEED_URL").ok_or(ConfigError::Missing("LISTING_FEED_URL"))?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LISTING_SOURCE",
                    value: other.to_string(),
                    reason: "expected 'realtor' or 'feed'".into(),
                })
            }
        };

        let half_baths = match get("HALF_BATH_WEIGHT").as_deref() {
            None | Some("whole") => HalfBathPolicy::WholeUnit,
            Some("half") => HalfBathPolicy::HalfUnit,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "HALF_BATH_WEIGHT",
                    value: other.to_string(),
                    reason: "expected 'whole' or 'half'".into(),
                })
            }
        };

        Ok(Self {
            bind_addr,
            max_workers,
            http_timeout,
            geocoder,
            geocoder_url: get("GEOCODER_URL"),
            source,
            zenrows_api_key: get("ZENROWS_API_KEY"),
            half_baths,
        })
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be greater than zero".into(),
        }),
        Err(e) => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
