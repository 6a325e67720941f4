//! Refresh throttling decisions

use crate::Result;
use crate::clock::Clock;
use crate::throttling::{CacheKey, RefreshPolicy, TimestampStore};
use async_trait::async_trait;
use std::sync::Arc;

/// Decides whether a bucket may be refreshed and records refreshes
#[async_trait]
pub trait Throttler: Send + Sync {
    /// `true` once `now > last_refresh + timeout`; never-refreshed keys count as 0
    async fn can_refresh(&self, key: &CacheKey, policy: RefreshPolicy) -> Result<bool>;

    /// Record `now` as the last refresh time for `key`
    async fn update_last_refresh_time(&self, key: &CacheKey) -> Result<()>;
}

/// Throttler over a [`TimestampStore`] and a [`Clock`]
pub struct RefreshThrottler {
    store: Arc<dyn TimestampStore>,
    clock: Arc<dyn Clock>,
}

impl RefreshThrottler {
    pub fn new(store: Arc<dyn TimestampStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<dyn TimestampStore> {
        &self.store
    }
}

#[async_trait]
impl Throttler for RefreshThrottler {
    async fn can_refresh(&self, key: &CacheKey, policy: RefreshPolicy) -> Result<bool> {
        let last_refresh = self.store.get(key).await?.unwrap_or(0);
        let fresh_until = last_refresh.saturating_add(policy.timeout_millis());
        Ok(self.clock.now_millis() > fresh_until)
    }

    async fn update_last_refresh_time(&self, key: &CacheKey) -> Result<()> {
        self.store.put(key, self.clock.now_millis()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::throttling::MemoryTimestampStore;
    use std::time::Duration;

    const T: u64 = 1_700_000_000_000;

    fn throttler(clock: Arc<ManualClock>) -> RefreshThrottler {
        RefreshThrottler::new(Arc::new(MemoryTimestampStore::new()), clock)
    }

    #[tokio::test]
    async fn test_never_refreshed_key_can_refresh() {
        let clock = Arc::new(ManualClock::new(T));
        let throttler = throttler(clock);
        let key = CacheKey::from("similar_games|game_id:1|similar_games_ids:[]|offset:0|limit:20");

        assert!(throttler.can_refresh(&key, RefreshPolicy::DISCOVERY).await.unwrap());
        assert!(
            throttler
                .can_refresh(&key, RefreshPolicy::SIMILAR_GAMES)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_popular_games_ten_minute_window() {
        let clock = Arc::new(ManualClock::new(T));
        let throttler = throttler(clock.clone());
        let key = CacheKey::from("popular_games|offset:0|limit:20");
        let policy = RefreshPolicy::DISCOVERY;

        assert!(throttler.can_refresh(&key, policy).await.unwrap());
        throttler.update_last_refresh_time(&key).await.unwrap();

        clock.advance(Duration::from_secs(5 * 60));
        assert!(!throttler.can_refresh(&key, policy).await.unwrap());

        clock.advance(Duration::from_secs(6 * 60));
        assert!(throttler.can_refresh(&key, policy).await.unwrap());
    }

    #[tokio::test]
    async fn test_exact_boundary_is_still_fresh() {
        let clock = Arc::new(ManualClock::new(T));
        let throttler = throttler(clock.clone());
        let key = CacheKey::from("articles|offset:0|limit:20");

        throttler.update_last_refresh_time(&key).await.unwrap();
        clock.advance(RefreshPolicy::ARTICLES.timeout());
        assert!(!throttler.can_refresh(&key, RefreshPolicy::ARTICLES).await.unwrap());

        clock.advance(Duration::from_millis(1));
        assert!(throttler.can_refresh(&key, RefreshPolicy::ARTICLES).await.unwrap());
    }

    #[tokio::test]
    async fn test_huge_timeout_does_not_overflow() {
        let clock = Arc::new(ManualClock::new(T));
        let throttler = throttler(clock);
        let key = CacheKey::from("k");

        throttler.update_last_refresh_time(&key).await.unwrap();
        let forever = RefreshPolicy::new(Duration::from_secs(u64::MAX));
        assert!(!throttler.can_refresh(&key, forever).await.unwrap());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let clock = Arc::new(ManualClock::new(T));
        let throttler = throttler(clock);
        let first = CacheKey::from("popular_games|offset:0|limit:20");
        let second = CacheKey::from("popular_games|offset:20|limit:20");

        throttler.update_last_refresh_time(&first).await.unwrap();
        assert!(!throttler.can_refresh(&first, RefreshPolicy::DISCOVERY).await.unwrap());
        assert!(throttler.can_refresh(&second, RefreshPolicy::DISCOVERY).await.unwrap());
    }
}
