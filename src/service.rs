//! The long-lived POI service.
//!
//! Owns every piece of process-wide state the fetch path needs — HTTP
//! client, two-tier cache, rate limiter, deduplicator, statistics, and the
//! background sweeper — so consumers get explicit construction and
//! teardown instead of ambient globals. UI collaborators hold one instance
//! for the life of the page/session.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::cache::{init_db_pool_with_path, run_migrations, CacheStore};
use crate::config::{Config, DEDUP_GRACE, NOMINATIM_API, OVERPASS_API};
use crate::error_handling::{InitializationError, ServiceStats};
use crate::fetch::{GeocodingClient, NominatimApi, OverpassApi, PoiFetcher, QueryApi};
use crate::initialization::init_client;
use crate::markers;
use crate::models::{Bounds, CacheStats, Filter, Marker, Poi};
use crate::popular;
use crate::rate_limiter::RateLimiter;

pub struct PoiService {
    fetcher: PoiFetcher,
    geocoder: GeocodingClient,
    cache: Arc<CacheStore>,
    stats: Arc<ServiceStats>,
    sweeper: CancellationToken,
    bounds_margin: f64,
}

impl PoiService {
    /// Builds a service from configuration: opens (or creates) the cache
    /// database, applies migrations, and spawns the expiry sweeper.
    pub async fn new(config: Config) -> Result<Self, InitializationError> {
        let client = init_client(&config)?;
        let pool = init_db_pool_with_path(&config.db_path).await?;
        run_migrations(&pool).await?;

        let upstream: Arc<dyn QueryApi> = Arc::new(OverpassApi::new(
            Arc::clone(&client),
            config.overpass_endpoint.clone(),
        ));
        Self::from_parts(config, client, pool, upstream)
    }

    /// Assembles a service around an injected upstream — the seam tests
    /// use to substitute a fake Overpass API.
    pub fn from_parts(
        config: Config,
        client: Arc<reqwest::Client>,
        pool: Arc<sqlx::Pool<sqlx::Sqlite>>,
        upstream: Arc<dyn QueryApi>,
    ) -> Result<Self, InitializationError> {
        let mut intervals = HashMap::new();
        intervals.insert(OVERPASS_API.to_string(), config.overpass_min_interval);
        intervals.insert(NOMINATIM_API.to_string(), config.nominatim_min_interval);
        let limiter = Arc::new(RateLimiter::new(intervals, config.overpass_min_interval));

        let stats = Arc::new(ServiceStats::new());
        let cache = Arc::new(CacheStore::new(pool));
        let sweeper = cache.spawn_sweeper(config.sweep_interval);

        let fetcher = PoiFetcher::new(
            upstream,
            Arc::clone(&cache),
            Arc::clone(&limiter),
            Arc::clone(&stats),
            DEDUP_GRACE,
            &config,
        );
        let geocoder = GeocodingClient::new(
            NominatimApi::new(client, config.nominatim_endpoint.clone()),
            limiter,
            Arc::clone(&stats),
        );

        Ok(PoiService {
            fetcher,
            geocoder,
            cache,
            stats,
            sweeper,
            bounds_margin: config.bounds_margin,
        })
    }

    /// POIs of one semantic type within a viewport. Never fails: degraded
    /// paths yield stale data or an empty list.
    pub async fn fetch_by_type(&self, filter_id: &str, bounds: &Bounds) -> Vec<Poi> {
        self.fetcher.fetch_by_type(filter_id, bounds).await
    }

    /// Fetches every enabled Overpass-backed filter around a map center,
    /// in parallel. Different filter ids race independently; the shared
    /// rate limiter spaces their dispatches.
    pub async fn fetch_enabled(&self, filters: &[Filter], center: (f64, f64)) -> Vec<Poi> {
        let bounds = Bounds::from_center(center, self.bounds_margin);

        let fetches = filters
            .iter()
            .filter(|f| f.enabled && f.api_source == "overpass")
            .map(|f| self.fetcher.fetch_by_type(&f.id, &bounds));

        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Free-text location search across Japan.
    pub async fn search(&self, query: &str) -> Vec<Poi> {
        self.geocoder.search(query).await
    }

    /// Coordinates to address; `None` when the lookup fails.
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Option<String> {
        self.geocoder.reverse(lat, lon).await
    }

    /// Built-in curated destinations inside the viewport.
    pub fn popular_places(&self, bounds: &Bounds) -> Vec<Poi> {
        popular::popular_places_within(bounds)
    }

    /// Runs the display pipeline (proximity cap, zoom cap, clustering)
    /// over an already-fetched POI list.
    pub fn reduce_for_display(
        &self,
        pois: Vec<Poi>,
        center: (f64, f64),
        zoom: u8,
    ) -> Vec<Marker> {
        markers::reduce_for_display(pois, center, zoom)
    }

    /// Durable cache-tier entry counts, for diagnostics.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Drops every entry from both cache tiers, and forgets requests still
    /// inside the deduplicator's grace window so the next fetch really goes
    /// upstream.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        self.fetcher.reset_in_flight().await;
    }

    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }

    /// Stops the background sweeper. Idempotent.
    pub fn shutdown(&self) {
        self.sweeper.cancel();
    }
}

impl Drop for PoiService {
    fn drop(&mut self) {
        self.sweeper.cancel();
    }
}
