//! Two-tier cache store.
//!
//! A fast in-process tier layered over the durable SQLite tier. Hot
//! repeated reads (same filter + viewport during a zoom/pan session) stay
//! synchronous-fast, while the durable tier survives restarts. A failing
//! durable tier degrades the store to memory-only; it never fails a fetch.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};
use sqlx::{Pool, Sqlite};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use super::durable::DurableTier;
use super::memory::MemoryTier;
use crate::models::{CacheStats, Poi};

pub struct CacheStore {
    memory: MemoryTier,
    durable: DurableTier,
}

impl CacheStore {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        CacheStore {
            memory: MemoryTier::new(),
            durable: DurableTier::new(pool),
        }
    }

    /// Normal read path. Never returns expired data.
    ///
    /// Checks the memory tier first; on miss, falls through to the durable
    /// tier and promotes a hit into memory with its remaining lifetime.
    pub async fn get(&self, key: &str) -> Option<Vec<Poi>> {
        if let Some(data) = self.memory.get(key).await {
            debug!("memory cache hit for {key}");
            return Some(data);
        }

        match self.durable.get(key).await {
            Ok(Some((data, expires_at))) => {
                let remaining_ms = expires_at - Utc::now().timestamp_millis();
                if remaining_ms > 0 {
                    self.memory
                        .set(key, data.clone(), Duration::from_millis(remaining_ms as u64))
                        .await;
                }
                debug!("durable cache hit for {key}");
                Some(data)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("durable cache read failed for {key}: {e}");
                None
            }
        }
    }

    /// Expired-allowed read, used exclusively by the fetcher's failure
    /// handler. Prefers the memory tier, which keeps entries past expiry
    /// until overwritten.
    pub async fn get_stale(&self, key: &str) -> Option<Vec<Poi>> {
        if let Some(data) = self.memory.get_stale(key).await {
            return Some(data);
        }
        match self.durable.get_stale(key).await {
            Ok(found) => found,
            Err(e) => {
                warn!("durable stale read failed for {key}: {e}");
                None
            }
        }
    }

    /// Write-through to both tiers with `expires_at = now + ttl`.
    pub async fn set(&self, key: &str, data: Vec<Poi>, ttl: Duration) {
        self.memory.set(key, data.clone(), ttl).await;
        if let Err(e) = self.durable.set(key, &data, ttl).await {
            warn!("durable cache write failed for {key}: {e}");
        }
    }

    pub async fn remove(&self, key: &str) {
        self.memory.remove(key).await;
        if let Err(e) = self.durable.remove(key).await {
            warn!("durable cache delete failed for {key}: {e}");
        }
    }

    pub async fn clear(&self) {
        self.memory.clear().await;
        if let Err(e) = self.durable.clear().await {
            warn!("durable cache clear failed: {e}");
        }
    }

    /// Deletes expired rows from the durable tier; returns the count.
    /// Idempotent and safe to call at any time.
    pub async fn sweep_expired(&self) -> u64 {
        match self.durable.sweep_expired().await {
            Ok(count) => count,
            Err(e) => {
                warn!("cache sweep failed: {e}");
                0
            }
        }
    }

    /// Durable-tier entry counts. Diagnostics only; a failing tier reports
    /// zeros rather than erroring.
    pub async fn stats(&self) -> CacheStats {
        match self.durable.stats().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!("cache stats query failed: {e}");
                CacheStats::default()
            }
        }
    }

    /// Spawns the periodic expiry sweep for the lifetime of the process.
    ///
    /// Returns a token that stops the task when cancelled.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> CancellationToken {
        let store = Arc::clone(self);
        let token = CancellationToken::new();
        let shutdown = token.clone();

        tokio::spawn(async move {
            let mut ticker = interval(every);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = store.sweep_expired().await;
                        if removed > 0 {
                            log::info!("cleared {removed} expired cache entries");
                        }
                    }
                    _ = shutdown.cancelled() => {
                        debug!("cache sweeper shutting down");
                        break;
                    }
                }
            }
        });

        token
    }
}
