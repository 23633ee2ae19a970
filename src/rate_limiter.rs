//! Per-upstream rate limiting.
//!
//! Enforces a minimum spacing between consecutive dispatches to a named
//! upstream API. Each API gets its own fair (FIFO) async mutex around a
//! last-dispatch timestamp, so concurrent callers are delayed in the order
//! they asked, never reordered. Only spacing is limited — completion order
//! is whatever the upstreams make of it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

struct ApiGate {
    min_interval: Duration,
    /// Timestamp of the last dispatch, set when the call is issued rather
    /// than when it completes.
    last_dispatch: Mutex<Option<Instant>>,
}

pub struct RateLimiter {
    gates: Mutex<HashMap<String, Arc<ApiGate>>>,
    intervals: HashMap<String, Duration>,
    default_interval: Duration,
}

impl RateLimiter {
    /// Creates a limiter with per-API minimum intervals. APIs not in the
    /// map fall back to `default_interval`.
    pub fn new(intervals: HashMap<String, Duration>, default_interval: Duration) -> Self {
        RateLimiter {
            gates: Mutex::new(HashMap::new()),
            intervals,
            default_interval,
        }
    }

    /// Waits until at least the configured interval has passed since the
    /// previous dispatch to `api_name`, then records "now" as the new
    /// last-dispatch time.
    ///
    /// The per-API mutex is held across the sleep; tokio's fair mutex then
    /// serves queued callers in request order.
    pub async fn throttle(&self, api_name: &str) {
        let gate = {
            let mut gates = self.gates.lock().await;
            Arc::clone(gates.entry(api_name.to_string()).or_insert_with(|| {
                let min_interval = self
                    .intervals
                    .get(api_name)
                    .copied()
                    .unwrap_or(self.default_interval);
                Arc::new(ApiGate {
                    min_interval,
                    last_dispatch: Mutex::new(None),
                })
            }))
        };

        let mut last = gate.last_dispatch.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < gate.min_interval {
                tokio::time::sleep(gate.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
