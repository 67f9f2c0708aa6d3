//! Page pacing
//!
//! Controls the pause between consecutive page requests against one endpoint.
//! The default policy waits a fixed 500ms between pages; the token bucket
//! policy uses the governor crate.

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Default pause between pages
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// How requests for consecutive pages are spaced out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PacingPolicy {
    /// Sleep a fixed interval between pages
    FixedDelay {
        /// Pause in milliseconds
        millis: u64,
    },
    /// Token bucket shared by every request made through the pacer
    TokenBucket {
        /// Sustained request rate
        requests_per_second: u32,
        /// Bucket size
        burst: u32,
    },
    /// No pacing at all
    Unlimited,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::FixedDelay {
            millis: DEFAULT_PAGE_DELAY.as_millis() as u64,
        }
    }
}

impl PacingPolicy {
    /// Create a fixed delay policy
    pub fn fixed_delay(delay: Duration) -> Self {
        Self::FixedDelay {
            millis: delay.as_millis() as u64,
        }
    }

    /// Create a token bucket policy
    pub fn token_bucket(requests_per_second: u32, burst: u32) -> Self {
        Self::TokenBucket {
            requests_per_second,
            burst,
        }
    }

    /// Build the pacer for this policy
    pub fn build(&self) -> Arc<dyn Pacer> {
        match self {
            Self::FixedDelay { millis } => Arc::new(FixedDelay::new(Duration::from_millis(*millis))),
            Self::TokenBucket {
                requests_per_second,
                burst,
            } => Arc::new(RateLimiter::new(*requests_per_second, *burst)),
            Self::Unlimited => Arc::new(Unlimited),
        }
    }
}

/// Waits before a page request
#[async_trait]
pub trait Pacer: Send + Sync + std::fmt::Debug {
    /// Called before every request; `page` is zero-based within one fetch
    async fn before_page(&self, page: usize);
}

/// Fixed sleep between pages, nothing before the first one
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// Create a fixed delay pacer
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Get the configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Pacer for FixedDelay {
    async fn before_page(&self, page: usize) {
        if page > 0 && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter; zero values are clamped to one
    pub fn new(requests_per_second: u32, burst: u32) -> Self {
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(rate).allow_burst(burst);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

#[async_trait]
impl Pacer for RateLimiter {
    async fn before_page(&self, _page: usize) {
        self.wait().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

/// Never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

#[async_trait]
impl Pacer for Unlimited {
    async fn before_page(&self, _page: usize) {}
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_pacing_policy_default() {
        assert_eq!(PacingPolicy::default(), PacingPolicy::FixedDelay { millis: 500 });
    }

    #[test]
    fn test_pacing_policy_yaml() {
        let policy: PacingPolicy =
            serde_yaml::from_str("type: token_bucket\nrequests_per_second: 4\nburst: 2\n").unwrap();
        assert_eq!(policy, PacingPolicy::token_bucket(4, 2));

        let policy: PacingPolicy = serde_yaml::from_str("type: unlimited\n").unwrap();
        assert_eq!(policy, PacingPolicy::Unlimited);
    }

    #[tokio::test]
    async fn test_fixed_delay_skips_first_page() {
        let pacer = FixedDelay::new(Duration::from_millis(200));
        let start = Instant::now();
        pacer.before_page(0).await;
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_fixed_delay_waits_between_pages() {
        let pacer = FixedDelay::new(Duration::from_millis(30));
        let start = Instant::now();
        pacer.before_page(1).await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_rate_limiter_allows_burst() {
        let limiter = RateLimiter::new(10, 5);

        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_rate_limiter_clamps_zero() {
        let limiter = RateLimiter::new(0, 0);
        assert!(limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_unlimited_never_waits() {
        let pacer = PacingPolicy::Unlimited.build();
        let start = Instant::now();
        for page in 0..10 {
            pacer.before_page(page).await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
