//! Two-tier POI cache: in-process map over a durable SQLite store.
//!
//! Both tiers key entries by opaque strings and stamp them with an expiry.
//! The memory tier answers hot reads synchronously-fast; the durable tier
//! survives restarts and is swept periodically. Normal reads never return
//! expired data — only the fetcher's failure handler uses the explicit
//! stale read path.

mod durable;
mod memory;
mod store;

pub use durable::{init_db_pool_with_path, run_migrations};
pub use store::CacheStore;
