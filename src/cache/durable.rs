//! Durable cache tier backed by SQLite.
//!
//! Larger capacity than the memory tier and survives process restarts.
//! Payloads are stored as JSON text; timestamps are unix milliseconds.
//! Expired rows are deleted lazily on read and in bulk by the periodic
//! sweep.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{error, info};
use sqlx::{Pool, Sqlite, SqlitePool};

use crate::error_handling::CacheError;
use crate::models::{CacheStats, Poi};

/// Initializes and returns the cache database connection pool.
///
/// Creates the database file if it doesn't exist and enables WAL mode for
/// concurrent access.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<Arc<Pool<Sqlite>>, CacheError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Cache database file created."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Cache database file already exists.")
        }
        Err(e) => {
            error!("Failed to create cache database file: {e}");
            return Err(CacheError::FileCreationError(e.to_string()));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path_str))
        .await
        .map_err(|e| {
            error!("Failed to connect to cache database: {e}");
            CacheError::SqlError(e)
        })?;

    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            CacheError::SqlError(e)
        })?;

    Ok(Arc::new(pool))
}

/// Applies the cache schema migrations from the `migrations/` directory.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), sqlx::migrate::MigrateError> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir.as_path()).await?;
    migrator.run(pool).await
}

pub(crate) struct DurableTier {
    pool: Arc<Pool<Sqlite>>,
}

impl DurableTier {
    pub(crate) fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        DurableTier { pool }
    }

    /// Reads an entry, deleting it lazily if its expiry has passed.
    ///
    /// Returns the payload together with its `expires_at` so the caller can
    /// promote it into the memory tier with the remaining lifetime.
    pub(crate) async fn get(&self, key: &str) -> Result<Option<(Vec<Poi>, i64)>, CacheError> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT data, expires_at FROM cache_entries WHERE key = ?")
                .bind(key)
                .fetch_optional(&*self.pool)
                .await?;

        let Some((data, expires_at)) = row else {
            return Ok(None);
        };

        if Utc::now().timestamp_millis() > expires_at {
            self.remove(key).await?;
            return Ok(None);
        }

        let pois: Vec<Poi> = serde_json::from_str(&data)?;
        Ok(Some((pois, expires_at)))
    }

    /// Reads an entry regardless of expiry, without deleting anything.
    /// Stale-fallback read path only.
    pub(crate) async fn get_stale(&self, key: &str) -> Result<Option<Vec<Poi>>, CacheError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT data FROM cache_entries WHERE key = ?")
                .bind(key)
                .fetch_optional(&*self.pool)
                .await?;

        match row {
            Some((data,)) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn set(
        &self,
        key: &str,
        data: &[Poi],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = Utc::now().timestamp_millis();
        let expires_at = now + ttl.as_millis() as i64;
        let payload = serde_json::to_string(data)?;

        sqlx::query(
            "INSERT INTO cache_entries (key, data, timestamp, expires_at) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET \
                 data = excluded.data, \
                 timestamp = excluded.timestamp, \
                 expires_at = excluded.expires_at",
        )
        .bind(key)
        .bind(payload)
        .bind(now)
        .bind(expires_at)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    pub(crate) async fn remove(&self, key: &str) -> Result<(), CacheError> {
        sqlx::query("DELETE FROM cache_entries WHERE key = ?")
            .bind(key)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    pub(crate) async fn clear(&self) -> Result<(), CacheError> {
        sqlx::query("DELETE FROM cache_entries")
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    /// Deletes every expired row; returns how many were removed.
    pub(crate) async fn sweep_expired(&self) -> Result<u64, CacheError> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE expires_at < ?")
            .bind(Utc::now().timestamp_millis())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub(crate) async fn stats(&self) -> Result<CacheStats, CacheError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cache_entries")
            .fetch_one(&*self.pool)
            .await?;
        let (expired,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM cache_entries WHERE expires_at < ?")
                .bind(Utc::now().timestamp_millis())
                .fetch_one(&*self.pool)
                .await?;

        Ok(CacheStats {
            total_entries: total as u64,
            expired_entries: expired as u64,
            valid_entries: (total - expired) as u64,
        })
    }
}
