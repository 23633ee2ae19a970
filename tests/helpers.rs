// Shared test helpers: database setup, test data, and fake upstreams.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use poi_fetcher::{init_db_pool_with_path, run_migrations, FetchError, Poi, QueryApi};

/// Creates a file-backed test pool with migrations applied.
///
/// File-backed rather than `sqlite::memory:` because each pooled connection
/// to an in-memory database gets its own empty database.
#[allow(dead_code)]
pub async fn create_test_pool(db_path: &Path) -> Arc<Pool<Sqlite>> {
    let pool = init_db_pool_with_path(db_path)
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

#[allow(dead_code)]
pub fn sample_poi(name: &str, lat: f64, lon: f64, poi_type: &str) -> Poi {
    Poi {
        lat,
        lon,
        name: name.to_string(),
        poi_type: poi_type.to_string(),
        tags: None,
        source: "overpass".to_string(),
        address: None,
    }
}

/// Fake upstream that counts invocations and returns a canned body after
/// an optional delay. The delay keeps concurrent callers overlapping so
/// deduplication is actually exercised.
#[allow(dead_code)]
pub struct CountingApi {
    pub calls: AtomicUsize,
    pub body: String,
    pub latency: Duration,
}

#[allow(dead_code)]
impl CountingApi {
    pub fn new(body: &str, latency: Duration) -> Self {
        CountingApi {
            calls: AtomicUsize::new(0),
            body: body.to_string(),
            latency,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryApi for CountingApi {
    fn name(&self) -> &'static str {
        "overpass"
    }

    async fn execute(&self, _query: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        Ok(self.body.clone())
    }
}

/// Fake upstream that always fails with an HTTP 504.
#[allow(dead_code)]
pub struct FailingApi;

#[async_trait]
impl QueryApi for FailingApi {
    fn name(&self) -> &'static str {
        "overpass"
    }

    async fn execute(&self, _query: &str) -> Result<String, FetchError> {
        Err(FetchError::StatusError(
            reqwest::StatusCode::GATEWAY_TIMEOUT,
        ))
    }
}

/// A minimal Overpass response body with two named cafe nodes.
#[allow(dead_code)]
pub const TWO_CAFES_BODY: &str = r#"{
    "elements": [
        {"lat": 35.681, "lon": 139.76, "tags": {"name": "Cafe A", "amenity": "cafe"}},
        {"lat": 35.682, "lon": 139.77, "tags": {"name:ja": "喫茶B", "amenity": "cafe"}}
    ]
}"#;
