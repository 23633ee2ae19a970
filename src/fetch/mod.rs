//! The POI fetcher: filter id + viewport in, normalized POI list out.
//!
//! Cache-aside over the two-tier store, layered with per-upstream rate
//! limiting and in-flight deduplication. Failures never propagate to the
//! caller: the fetcher degrades to stale cache data when it can and an
//! empty list when it can't — an empty result means "no data available
//! now", not "confirmed zero POIs".

mod nominatim;
mod normalize;
mod queries;
mod upstream;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::dedup::RequestDeduplicator;
use crate::error_handling::{
    categorize_fetch_error, InfoType, ServiceStats, WarningType,
};
use crate::models::{Bounds, Poi};
use crate::rate_limiter::RateLimiter;

pub use nominatim::{GeocodingClient, NominatimApi};
pub use upstream::{OverpassApi, QueryApi};

/// Cache key for a filter + viewport combination. Also the dedup key: two
/// logical requests with equal keys share one network call.
pub fn cache_key(filter_id: &str, bounds: &Bounds) -> String {
    format!("locations-{filter_id}-{bounds}")
}

pub struct PoiFetcher {
    upstream: Arc<dyn QueryApi>,
    cache: Arc<CacheStore>,
    limiter: Arc<RateLimiter>,
    dedup: RequestDeduplicator<Vec<Poi>>,
    stats: Arc<ServiceStats>,
    cache_ttl: Duration,
    result_cap: usize,
    query_timeout_secs: u64,
}

impl PoiFetcher {
    pub fn new(
        upstream: Arc<dyn QueryApi>,
        cache: Arc<CacheStore>,
        limiter: Arc<RateLimiter>,
        stats: Arc<ServiceStats>,
        dedup_grace: Duration,
        config: &Config,
    ) -> Self {
        PoiFetcher {
            upstream,
            cache,
            limiter,
            dedup: RequestDeduplicator::new(dedup_grace),
            stats,
            cache_ttl: config.cache_ttl,
            result_cap: config.result_cap,
            query_timeout_secs: config.query_timeout_seconds,
        }
    }

    /// Forgets in-flight and recently resolved requests, so the next fetch
    /// for any key goes back upstream. Paired with a cache clear.
    pub async fn reset_in_flight(&self) {
        self.dedup.clear().await;
    }

    /// Fetches the POIs of one semantic type inside a viewport.
    ///
    /// Resolution order: valid cache entry, then a rate-limited and
    /// deduplicated upstream query, then stale cache data, then an empty
    /// list. Unknown filter ids are non-fatal and yield an empty list.
    pub async fn fetch_by_type(&self, filter_id: &str, bounds: &Bounds) -> Vec<Poi> {
        let key = cache_key(filter_id, bounds);

        if let Some(cached) = self.cache.get(&key).await {
            self.stats.increment_info(InfoType::CacheHit);
            debug!("cache hit for {key} ({} POIs)", cached.len());
            return cached;
        }

        let Some(fragment) = queries::overpass_fragment(filter_id) else {
            self.stats.increment_warning(WarningType::UnknownFilter);
            warn!("unknown location type: {filter_id}");
            return Vec::new();
        };
        let query =
            queries::build_overpass_query(fragment, bounds, self.result_cap, self.query_timeout_secs);

        self.limiter.throttle(self.upstream.name()).await;

        let upstream = Arc::clone(&self.upstream);
        let filter_owned = filter_id.to_string();
        let result = self
            .dedup
            .dedupe(&key, move || async move {
                let body = upstream.execute(&query).await?;
                normalize::parse_overpass_body(&body, &filter_owned)
            })
            .await;

        match result {
            Ok(pois) => {
                self.stats.increment_info(InfoType::UpstreamFetch);
                self.cache.set(&key, pois.clone(), self.cache_ttl).await;
                pois
            }
            Err(e) => {
                self.stats.increment_error(categorize_fetch_error(&e));
                error!("error fetching {filter_id}: {e}");

                if let Some(stale) = self.cache.get_stale(&key).await {
                    self.stats.increment_warning(WarningType::StaleCacheServed);
                    warn!("using stale cache for {filter_id}");
                    stale
                } else {
                    self.stats.increment_warning(WarningType::NoDataAvailable);
                    Vec::new()
                }
            }
        }
    }
}
