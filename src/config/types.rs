//! Service configuration.
//!
//! A plain struct with working defaults; construct it programmatically and
//! override what a deployment (or a test) needs. The endpoint fields exist
//! so tests can point the service at a local fake instead of the public
//! APIs.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::constants::{
    CACHE_SWEEP_INTERVAL, DB_PATH, DEFAULT_BOUNDS_MARGIN, DEFAULT_CACHE_TTL, DEFAULT_USER_AGENT,
    HTTP_TIMEOUT_SECS, NOMINATIM_ENDPOINT, NOMINATIM_MIN_INTERVAL, OVERPASS_ENDPOINT,
    OVERPASS_MIN_INTERVAL, OVERPASS_QUERY_TIMEOUT_SECS, OVERPASS_RESULT_CAP,
};

/// Configuration for a [`crate::PoiService`].
///
/// # Examples
///
/// ```no_run
/// use poi_fetcher::Config;
/// use std::path::PathBuf;
/// use std::time::Duration;
///
/// let config = Config {
///     db_path: PathBuf::from("./cache.db"),
///     cache_ttl: Duration::from_secs(10 * 60),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file backing the durable cache tier.
    pub db_path: PathBuf,

    /// TTL applied to cache writes from the fetcher.
    pub cache_ttl: Duration,

    /// Interval between background sweeps of the durable tier.
    pub sweep_interval: Duration,

    /// Minimum spacing between Overpass dispatches.
    pub overpass_min_interval: Duration,

    /// Minimum spacing between Nominatim dispatches.
    pub nominatim_min_interval: Duration,

    /// Per-query record cap sent to Overpass.
    pub result_cap: usize,

    /// Server-side timeout hint for Overpass queries, in seconds.
    pub query_timeout_seconds: u64,

    /// Client-side HTTP timeout, in seconds.
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value.
    pub user_agent: String,

    /// Overpass interpreter endpoint.
    pub overpass_endpoint: String,

    /// Nominatim base URL (no trailing slash).
    pub nominatim_endpoint: String,

    /// Half-width in degrees of viewports derived from a map center.
    pub bounds_margin: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            cache_ttl: DEFAULT_CACHE_TTL,
            sweep_interval: CACHE_SWEEP_INTERVAL,
            overpass_min_interval: OVERPASS_MIN_INTERVAL,
            nominatim_min_interval: NOMINATIM_MIN_INTERVAL,
            result_cap: OVERPASS_RESULT_CAP,
            query_timeout_seconds: OVERPASS_QUERY_TIMEOUT_SECS,
            timeout_seconds: HTTP_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            overpass_endpoint: OVERPASS_ENDPOINT.to_string(),
            nominatim_endpoint: NOMINATIM_ENDPOINT.to_string(),
            bounds_margin: DEFAULT_BOUNDS_MARGIN,
        }
    }
}
