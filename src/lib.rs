//! POI data core for a Japan map explorer.
//!
//! Fetches points of interest from Overpass-compatible APIs, caches them in
//! a two-tier store (in-memory plus SQLite), spaces upstream calls through
//! a per-API rate limiter, collapses concurrent identical requests into one
//! network call, and thins dense result sets down to what a map viewport
//! can usefully display.
//!
//! # Example
//!
//! ```no_run
//! use poi_fetcher::{Bounds, Config, PoiService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     poi_fetcher::init_logger();
//!
//!     let service = PoiService::new(Config::default()).await?;
//!     let bounds = Bounds::from_center((35.6762, 139.6503), 0.1);
//!
//!     let cafes = service.fetch_by_type("cafes", &bounds).await;
//!     let markers = service.reduce_for_display(cafes, (35.6762, 139.6503), 14);
//!     println!("{} markers to draw", markers.len());
//!
//!     service.shutdown();
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
mod dedup;
mod error_handling;
mod fetch;
mod geo;
mod initialization;
mod markers;
mod models;
mod popular;
mod rate_limiter;
mod service;

pub use cache::{init_db_pool_with_path, run_migrations, CacheStore};
pub use config::Config;
pub use dedup::{RequestDeduplicator, SharedResult};
pub use error_handling::{
    CacheError, ErrorType, FetchError, InfoType, InitializationError, ServiceStats, WarningType,
};
pub use fetch::{
    cache_key, GeocodingClient, NominatimApi, OverpassApi, PoiFetcher, QueryApi,
};
pub use geo::{haversine_km, haversine_m, meters_per_pixel};
pub use initialization::{init_client, init_logger};
pub use markers::{cluster, filter_by_zoom, limit_by_proximity, reduce_for_display};
pub use models::{Bounds, CacheStats, Cluster, Filter, Marker, Poi};
pub use popular::{popular_places, popular_places_within};
pub use rate_limiter::RateLimiter;
pub use service::PoiService;
