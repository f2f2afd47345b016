//! Minimum-interval rate limiter for external lookups
//!
//! Enforces a floor on the gap between the *end* of one geocode call and the
//! start of the next. Single-producer use only: the batch worker is the sole
//! caller, so no fairness or waiter queueing is needed.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Rate limiter enforcing a minimum inter-request interval
pub struct RateLimiter {
    last_completed: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    /// Create a limiter with an explicit minimum interval
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_completed: Mutex::new(None),
            min_interval,
        }
    }

    /// Create a limiter from a request rate in requests/second
    ///
    /// The rate must already be validated positive and finite.
    pub fn from_rate(requests_per_second: f64) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / requests_per_second))
    }

    /// Wait until the minimum interval since the last completed call has
    /// elapsed; returns immediately if it already has or no call was made yet
    pub async fn acquire(&self) {
        let last = self.last_completed.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }
    }

    /// Record that a call just completed; the next `acquire` measures from here
    pub async fn mark(&self) {
        let mut last = self.last_completed.lock().await;
        *last = Some(Instant::now());
    }
}
