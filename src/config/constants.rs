//! Configuration constants.
//!
//! Operational parameters used as defaults throughout the crate: cache
//! lifetimes, upstream spacing, result caps, and display thresholds.

use std::time::Duration;

use crate::models::Bounds;

/// How long fetched POI lists stay fresh in both cache tiers.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);
/// How often the background sweeper scans the durable tier for expired rows.
pub const CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);
/// Default SQLite file backing the durable cache tier.
pub const DB_PATH: &str = "./poi_cache.db";

/// Rate-limiter name for the Overpass query API.
pub const OVERPASS_API: &str = "overpass";
/// Rate-limiter name for the Nominatim geocoding API.
pub const NOMINATIM_API: &str = "nominatim";
/// Minimum spacing between consecutive Overpass dispatches.
pub const OVERPASS_MIN_INTERVAL: Duration = Duration::from_millis(1500);
/// Minimum spacing between consecutive Nominatim dispatches.
pub const NOMINATIM_MIN_INTERVAL: Duration = Duration::from_millis(1000);

/// How long a resolved request stays joinable in the deduplicator before
/// its key is evicted. Long enough that racing callers still share the
/// result, short enough that a deliberate retry gets a fresh request.
pub const DEDUP_GRACE: Duration = Duration::from_secs(1);

pub const OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";
pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

/// Server-side cap on records per Overpass query (`out body N;`). Bounds
/// both payload size and downstream rendering cost.
pub const OVERPASS_RESULT_CAP: usize = 150;
/// Server-side timeout hint passed in the Overpass query header.
pub const OVERPASS_QUERY_TIMEOUT_SECS: u64 = 30;
/// Client-side HTTP timeout for all upstream requests.
pub const HTTP_TIMEOUT_SECS: u64 = 10;
/// Maximum candidates requested from a Nominatim search.
pub const SEARCH_RESULT_LIMIT: usize = 20;

pub const DEFAULT_USER_AGENT: &str = "poi_fetcher/0.1 (Japan map explorer)";

/// Half-width in degrees of the viewport derived from a map center.
pub const DEFAULT_BOUNDS_MARGIN: f64 = 0.1;

/// Expanded coverage box for all of Japan, Okinawa through Hokkaido.
pub const JAPAN_BOUNDS: Bounds = Bounds {
    south: 24.0,
    west: 122.0,
    north: 45.5,
    east: 154.0,
};

// Marker density thresholds.

/// Default per-type marker cap for the proximity limiter.
pub const MAX_MARKERS_PER_TYPE: usize = 50;
/// At or above this zoom level every marker is shown.
pub const MIN_ZOOM_FOR_ALL: u8 = 15;
/// At or above this zoom level clustering is disabled entirely.
pub const CLUSTER_MAX_ZOOM: u8 = 16;
/// Pixel radius within which markers collapse into one cluster.
pub const CLUSTER_PIXEL_RADIUS: f64 = 60.0;
