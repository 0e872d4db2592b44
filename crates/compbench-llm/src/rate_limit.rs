//! Per-backend request spacing.
//!
//! Each backend (the parsing service and every model extractor) owns its own
//! [`RateLimiter`]; limits are never shared across backends.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum interval of `60 / requests_per_minute` seconds between
/// granted calls.
///
/// The check-and-record step runs under an async mutex, so concurrent callers
/// queue behind each other and each one observes the timestamp written by the
/// caller before it.
#[derive(Debug)]
pub struct RateLimiter {
    requests_per_minute: u32,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_minute` calls per minute.
    ///
    /// A value of 0 disables limiting.
    pub fn new(requests_per_minute: u32) -> Self {
        let min_interval = if requests_per_minute == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(60.0 / f64::from(requests_per_minute))
        };

        Self {
            requests_per_minute,
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Configured requests per minute.
    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    /// Minimum spacing between two granted calls.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a call is allowed, then record it.
    pub async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;

        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("Rate limiting: waiting {:.2}s", wait.as_secs_f64());
                tokio::time::sleep(wait).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_min_interval() {
        assert_eq!(RateLimiter::new(60).min_interval(), Duration::from_secs(1));
        assert_eq!(RateLimiter::new(30).min_interval(), Duration::from_secs(2));
        assert_eq!(RateLimiter::new(0).min_interval(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_call_is_immediate() {
        let limiter = RateLimiter::new(60);
        let start = Instant::now();

        limiter.acquire().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_call_waits_for_interval() {
        let limiter = RateLimiter::new(60); // 1 per second
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_passed() {
        let limiter = RateLimiter::new(60);
        limiter.acquire().await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        let before = Instant::now();
        limiter.acquire().await;

        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_are_spaced() {
        let limiter = Arc::new(RateLimiter::new(120)); // 0.5s spacing
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.acquire().await;
                    Instant::now()
                })
            })
            .collect();

        let mut granted = Vec::new();
        for handle in handles {
            granted.push(handle.await.unwrap());
        }
        granted.sort();

        for pair in granted.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(500));
        }
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiters_are_independent() {
        let parser = RateLimiter::new(1);
        let model = RateLimiter::new(1);
        let start = Instant::now();

        parser.acquire().await;
        model.acquire().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: consecutive grants are at least 60/R seconds apart
        #[test]
        fn test_consecutive_acquires_respect_interval(rpm in 1u32..=600, calls in 2usize..5) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();

            let gaps = runtime.block_on(async {
                let limiter = RateLimiter::new(rpm);
                let mut granted = Vec::new();
                for _ in 0..calls {
                    limiter.acquire().await;
                    granted.push(Instant::now());
                }
                granted.windows(2).map(|w| w[1] - w[0]).collect::<Vec<_>>()
            });

            let expected = Duration::from_secs_f64(60.0 / f64::from(rpm));
            for gap in gaps {
                prop_assert!(gap >= expected, "gap {:?} < {:?}", gap, expected);
            }
        }
    }
}
