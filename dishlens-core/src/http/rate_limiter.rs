//! Per-host request spacing.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Keeps requests to the same host at least `min_delay` apart.
pub struct RateLimiter {
    min_delay: Duration,
    /// Start time of the latest request reserved per host (may be in the future).
    last_request: DashMap<String, Instant>,
}

impl RateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: DashMap::new(),
        }
    }

    /// Wait until `host` may be contacted again.
    ///
    /// The slot is reserved while holding the map entry, so concurrent callers
    /// queue up `min_delay` apart instead of all reading the same last time.
    pub async fn wait(&self, host: &str) {
        if self.min_delay.is_zero() {
            return;
        }

        let now = Instant::now();
        let slot = match self.last_request.entry(host.to_string()) {
            Entry::Occupied(mut entry) => {
                let slot = (*entry.get() + self.min_delay).max(now);
                entry.insert(slot);
                slot
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                now
            }
        };

        if slot > now {
            tracing::debug!(host, wait_ms = (slot - now).as_millis() as u64, "rate limited");
            sleep_until(slot).await;
        }
    }

    pub fn tracked_hosts(&self) -> usize {
        self.last_request.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}
