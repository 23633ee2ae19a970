//! In-process cache tier.
//!
//! A small map guarded by an async `RwLock`, cleared when the process
//! exits. Reads never mutate: expired entries are simply skipped, which
//! keeps them available to the stale-fallback path until overwritten or
//! removed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::Poi;

struct MemoryEntry {
    data: Vec<Poi>,
    expires_at: Instant,
}

pub(crate) struct MemoryTier {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryTier {
    pub(crate) fn new() -> Self {
        MemoryTier {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the entry if present and not expired.
    pub(crate) async fn get(&self, key: &str) -> Option<Vec<Poi>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.data.clone()),
            _ => None,
        }
    }

    /// Returns the entry regardless of expiry. Stale-fallback read path only.
    pub(crate) async fn get_stale(&self, key: &str) -> Option<Vec<Poi>> {
        let entries = self.entries.read().await;
        entries.get(key).map(|entry| entry.data.clone())
    }

    pub(crate) async fn set(&self, key: &str, data: Vec<Poi>, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            MemoryEntry {
                data,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub(crate) async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    pub(crate) async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi() -> Poi {
        Poi {
            lat: 35.0,
            lon: 139.0,
            name: "テスト".to_string(),
            poi_type: "toilets".to_string(),
            tags: None,
            source: "overpass".to_string(),
            address: None,
        }
    }

    #[tokio::test]
    async fn get_skips_expired_but_get_stale_does_not() {
        let tier = MemoryTier::new();
        tier.set("k", vec![poi()], Duration::from_millis(20)).await;

        assert!(tier.get("k").await.is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(tier.get("k").await.is_none());
        assert_eq!(tier.get_stale("k").await.map(|d| d.len()), Some(1));
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let tier = MemoryTier::new();
        tier.set("a", vec![poi()], Duration::from_secs(60)).await;
        tier.set("b", vec![poi()], Duration::from_secs(60)).await;

        tier.remove("a").await;
        assert!(tier.get("a").await.is_none());
        assert!(tier.get("b").await.is_some());

        tier.clear().await;
        assert!(tier.get("b").await.is_none());
    }
}
