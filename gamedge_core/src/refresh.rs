//! Refresh orchestration
//!
//! [`RefreshOrchestrator::refresh`] runs one throttled refresh of a bucket:
//!
//! 1. If the throttler disallows the key, return [`Refresh::Skipped`] without
//!    touching the remote.
//! 2. Otherwise await the fetch. On error, return it; nothing is written.
//! 3. On success, upsert into the local store, then record the refresh time,
//!    then return [`Refresh::Refreshed`].
//!
//! The timestamp is written last, so a failed or cancelled refresh leaves the
//! bucket refreshable. With single-flight enabled, a concurrent call for a key
//! that is already being refreshed is reported as skipped.

use crate::Result;
use crate::data::Upsert;
use crate::throttling::{CacheKey, RefreshPolicy, Throttler};
use log::{debug, warn};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Outcome of a refresh attempt that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh<T> {
    /// Throttled or already in flight; the remote was not called
    Skipped,
    /// Fetched and persisted
    Refreshed(T),
}

impl<T> Refresh<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    pub fn into_refreshed(self) -> Option<T> {
        match self {
            Self::Skipped => None,
            Self::Refreshed(value) => Some(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Refresh<U> {
        match self {
            Self::Skipped => Refresh::Skipped,
            Self::Refreshed(value) => Refresh::Refreshed(f(value)),
        }
    }
}

#[derive(Debug, Default)]
struct InFlightKeys {
    keys: Mutex<HashSet<CacheKey>>,
}

impl InFlightKeys {
    fn claim(self: &Arc<Self>, key: &CacheKey) -> Option<InFlightTicket> {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        keys.insert(key.clone()).then(|| InFlightTicket {
            owner: self.clone(),
            key: key.clone(),
        })
    }
}

/// Releases the in-flight mark on drop, including on cancellation
struct InFlightTicket {
    owner: Arc<InFlightKeys>,
    key: CacheKey,
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        let mut keys = self.owner.keys.lock().unwrap_or_else(|e| e.into_inner());
        keys.remove(&self.key);
    }
}

/// Runs throttled refreshes against a shared throttler
#[derive(Clone)]
pub struct RefreshOrchestrator {
    throttler: Arc<dyn Throttler>,
    in_flight: Option<Arc<InFlightKeys>>,
}

impl RefreshOrchestrator {
    pub fn new(throttler: Arc<dyn Throttler>) -> Self {
        Self {
            throttler,
            in_flight: None,
        }
    }

    /// Report concurrent refreshes of the same key as skipped
    pub fn with_single_flight(mut self) -> Self {
        self.in_flight = Some(Arc::new(InFlightKeys::default()));
        self
    }

    pub fn is_single_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn throttler(&self) -> &Arc<dyn Throttler> {
        &self.throttler
    }

    pub async fn refresh<T, S, F, Fut>(
        &self,
        key: &CacheKey,
        policy: RefreshPolicy,
        store: &S,
        fetch: F,
    ) -> Result<Refresh<Vec<T>>>
    where
        T: Send + Sync,
        S: Upsert<T> + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let _ticket = match &self.in_flight {
            Some(in_flight) => match in_flight.claim(key) {
                Some(ticket) => Some(ticket),
                None => {
                    debug!("Refresh of '{key}' already in flight, skipping");
                    return Ok(Refresh::Skipped);
                }
            },
            None => None,
        };

        if !self.throttler.can_refresh(key, policy).await? {
            debug!("Refresh of '{key}' throttled");
            return Ok(Refresh::Skipped);
        }

        debug!("Refreshing '{key}'");
        let items = match fetch().await {
            Ok(items) => items,
            Err(e) => {
                warn!("Refresh of '{key}' failed: {e}");
                return Err(e);
            }
        };

        store.upsert(&items).await?;
        self.throttler.update_last_refresh_time(key).await?;
        debug!("Refreshed '{key}' with {} items", items.len());

        Ok(Refresh::Refreshed(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::data::{GamesLocalDataStore, MemoryGamesStore};
    use crate::error::{Error, RemoteError};
    use crate::throttling::{MemoryTimestampStore, RefreshThrottler};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn orchestrator(clock: Arc<ManualClock>) -> RefreshOrchestrator {
        let store = Arc::new(MemoryTimestampStore::new());
        RefreshOrchestrator::new(Arc::new(RefreshThrottler::new(store, clock)))
    }

    fn game(id: i64) -> crate::domain::Game {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "follower_count": null,
            "hype_count": null,
            "release_date": null,
            "critics_rating": null,
            "users_rating": null,
            "total_rating": null,
            "name": "G",
            "summary": null,
            "storyline": null,
            "cover": null
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_second_refresh_within_policy_is_skipped() {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let orchestrator = orchestrator(clock.clone());
        let store = MemoryGamesStore::new();
        let key = CacheKey::from("popular_games|offset:0|limit:20");
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![game(1)])
        };

        let first = orchestrator
            .refresh(&key, RefreshPolicy::DISCOVERY, &store, fetch)
            .await
            .unwrap();
        assert_eq!(first.map(|games| games.len()), Refresh::Refreshed(1));

        clock.advance(Duration::from_secs(60));
        let second = orchestrator
            .refresh(&key, RefreshPolicy::DISCOVERY, &store, fetch)
            .await
            .unwrap();
        assert!(second.is_skipped());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_stays_refreshable() {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let orchestrator = orchestrator(clock);
        let store = MemoryGamesStore::new();
        let key = CacheKey::from("coming_soon_games|offset:0|limit:20");

        let result = orchestrator
            .refresh(&key, RefreshPolicy::DISCOVERY, &store, || async {
                Err::<Vec<crate::domain::Game>, _>(Error::from(RemoteError::network_unavailable(
                    "offline",
                )))
            })
            .await;
        assert!(result.is_err());
        assert!(store.is_empty().await);
        assert!(
            orchestrator
                .throttler()
                .can_refresh(&key, RefreshPolicy::DISCOVERY)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_single_flight_skips_concurrent_refresh() {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let orchestrator = orchestrator(clock).with_single_flight();
        let store = MemoryGamesStore::new();
        let key = CacheKey::from("most_anticipated_games|offset:0|limit:20");
        let (release, wait) = tokio::sync::oneshot::channel::<()>();

        let slow = orchestrator.refresh(&key, RefreshPolicy::DISCOVERY, &store, || async move {
            let _ = wait.await;
            Ok(vec![game(1)])
        });
        let fast = async {
            // Runs after the slow refresh has claimed the key
            tokio::task::yield_now().await;
            let outcome = orchestrator
                .refresh(&key, RefreshPolicy::DISCOVERY, &store, || async {
                    Ok(vec![game(2)])
                })
                .await;
            let _ = release.send(());
            outcome
        };

        let (slow, fast) = tokio::join!(slow, fast);
        assert!(matches!(slow.unwrap(), Refresh::Refreshed(_)));
        assert!(fast.unwrap().is_skipped());
        assert!(store.get_game(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_refresh_releases_key() {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let orchestrator = orchestrator(clock).with_single_flight();
        let store = MemoryGamesStore::new();
        let key = CacheKey::from("articles|offset:0|limit:20");

        let pending = orchestrator.refresh(&key, RefreshPolicy::DISCOVERY, &store, || {
            futures::future::pending::<Result<Vec<crate::domain::Game>>>()
        });
        let timed_out = tokio::time::timeout(Duration::from_millis(20), pending).await;
        assert!(timed_out.is_err());

        let retried = orchestrator
            .refresh(&key, RefreshPolicy::DISCOVERY, &store, || async {
                Ok(vec![game(3)])
            })
            .await
            .unwrap();
        assert!(matches!(retried, Refresh::Refreshed(_)));
    }
}
