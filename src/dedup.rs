//! In-flight request deduplication.
//!
//! Concurrent callers asking for the same key share one underlying network
//! call: the first caller's future is stored as a `Shared` handle and every
//! later caller awaits the same handle, success or failure alike. After a
//! call resolves its key stays joinable for a short grace window, then is
//! evicted so a deliberate retry gets a fresh request. A failed call never
//! poisons future independent calls for the same key.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use log::debug;
use tokio::sync::Mutex;

use crate::error_handling::FetchError;

/// Shared results must be cloneable for every waiter, so the error side is
/// wrapped in an `Arc`.
pub type SharedResult<T> = Result<T, Arc<FetchError>>;

type InFlight<T> = Shared<BoxFuture<'static, SharedResult<T>>>;

pub struct RequestDeduplicator<T: Clone + Send + Sync + 'static> {
    in_flight: Arc<Mutex<HashMap<String, InFlight<T>>>>,
    grace: Duration,
}

impl<T: Clone + Send + Sync + 'static> RequestDeduplicator<T> {
    pub fn new(grace: Duration) -> Self {
        RequestDeduplicator {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            grace,
        }
    }

    /// Runs `producer` for `key`, unless a call for the same key is already
    /// in flight — in that case the caller joins the existing call and
    /// receives its eventual result.
    ///
    /// The producer is only invoked for the caller that registers the key;
    /// its error is delivered to every waiter. The key is always cleared
    /// after resolution, on both success and failure paths.
    pub async fn dedupe<F, Fut>(&self, key: &str, producer: F) -> SharedResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let shared = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(existing) = in_flight.get(key) {
                debug!("joining in-flight request for {key}");
                existing.clone()
            } else {
                let fut = producer();
                let shared: InFlight<T> = async move { fut.await.map_err(Arc::new) }
                    .boxed()
                    .shared();
                in_flight.insert(key.to_string(), shared.clone());
                self.spawn_evictor(key.to_string(), shared.clone());
                shared
            }
        };

        shared.await
    }

    /// Number of keys currently tracked (in flight or within the grace
    /// window).
    pub async fn tracked_keys(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    /// Drops every tracked key. Subsequent calls start fresh requests
    /// instead of joining resolved ones still inside their grace window.
    pub async fn clear(&self) {
        self.in_flight.lock().await.clear();
    }

    /// Waits out the call, then the grace window, then evicts the key —
    /// unless a newer future has been registered under it in the meantime.
    fn spawn_evictor(&self, key: String, fut: InFlight<T>) {
        let in_flight = Arc::clone(&self.in_flight);
        let grace = self.grace;
        tokio::spawn(async move {
            let _ = fut.clone().await;
            tokio::time::sleep(grace).await;
            let mut map = in_flight.lock().await;
            if map.get(&key).is_some_and(|current| fut.ptr_eq(current)) {
                map.remove(&key);
            }
        });
    }
}
