//! Shared wiring for the use case tests
#![allow(dead_code)]

use gamedge_core::clock::{Clock, ManualClock};
use gamedge_core::data::{GamesLocalDataStore, GamesRemoteDataStore, MemoryGamesStore};
use gamedge_core::refresh::RefreshOrchestrator;
use gamedge_core::throttling::{
    DefaultKeyProvider, MemoryTimestampStore, RefreshThrottler, Throttler,
};
use gamedge_core::usecases::GamesContext;
use gamedge_test_utils::{MockGamesRemote, MockThrottler};
use std::sync::Arc;
use std::time::Duration;

/// 2023-11-14T22:13:20Z
pub const NOW_MILLIS: u64 = 1_700_000_000_000;
pub const NOW_SECS: i64 = 1_700_000_000;
pub const DAY_SECS: i64 = 24 * 60 * 60;

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub remote: MockGamesRemote,
    pub local: Arc<MemoryGamesStore>,
    pub context: GamesContext,
}

impl Harness {
    /// Harness whose refreshes go through `throttler`
    pub fn with_throttler(throttler: Arc<dyn Throttler>) -> Self {
        let clock = Arc::new(ManualClock::new(NOW_MILLIS));
        let remote = MockGamesRemote::new();
        let local = Arc::new(MemoryGamesStore::new());

        let context = GamesContext::new(
            Arc::new(remote.clone()) as Arc<dyn GamesRemoteDataStore>,
            local.clone() as Arc<dyn GamesLocalDataStore>,
            Arc::new(DefaultKeyProvider),
            RefreshOrchestrator::new(throttler),
            clock.clone() as Arc<dyn Clock>,
        );

        Self {
            clock,
            remote,
            local,
            context,
        }
    }

    pub fn with_mock_throttler(throttler: &MockThrottler) -> Self {
        Self::with_throttler(Arc::new(throttler.clone()))
    }

    /// Harness backed by the real throttler, sharing the harness clock
    pub fn with_real_throttler() -> Self {
        let mut harness = Self::with_throttler(Arc::new(MockThrottler::allowing()));
        let throttler = RefreshThrottler::new(
            Arc::new(MemoryTimestampStore::new()),
            harness.clock.clone(),
        );
        harness.context.orchestrator = RefreshOrchestrator::new(Arc::new(throttler));
        harness
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}

pub fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}
