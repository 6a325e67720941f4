//! Refresh orchestration properties
//!
//! A skipped refresh never touches the remote, a failed refresh never writes,
//! and a successful refresh writes the fetched items before recording the
//! refresh time exactly once.

mod common;

use common::{Harness, minutes};
use gamedge_core::data::{GamesLocalDataStore, GamesRemoteDataStore};
use gamedge_core::domain::{DiscoveryCategory, Pagination};
use gamedge_core::error::RemoteError;
use gamedge_core::refresh::Refresh;
use gamedge_core::throttling::{CacheKey, RefreshPolicy};
use gamedge_core::{Error, ErrorKind};
use gamedge_test_utils::{FailingGamesStore, MockThrottler, fake_games};
use std::time::Duration;

fn popular_key() -> CacheKey {
    CacheKey::from("popular_games|offset:0|limit:20")
}

#[tokio::test]
async fn test_throttled_refresh_skips_remote_and_store() {
    // Arrange
    let throttler = MockThrottler::denying();
    let harness = Harness::with_mock_throttler(&throttler);
    harness
        .remote
        .with_discovery_games(DiscoveryCategory::Popular, fake_games(1, 3));
    let remote = harness.remote.clone();

    // Act
    let result = harness
        .context
        .orchestrator
        .refresh(
            &popular_key(),
            RefreshPolicy::DISCOVERY,
            harness.local.as_ref(),
            || remote.discovery_games(DiscoveryCategory::Popular, Pagination::default()),
        )
        .await
        .unwrap();

    // Assert
    assert!(result.is_skipped());
    assert_eq!(harness.remote.total_calls(), 0);
    assert!(harness.local.is_empty().await);
    assert!(throttler.updated_keys().is_empty());
    assert_eq!(
        throttler.checked(),
        vec![(popular_key(), RefreshPolicy::DISCOVERY)]
    );
}

#[tokio::test]
async fn test_failed_refresh_writes_nothing() {
    let throttler = MockThrottler::allowing();
    let harness = Harness::with_mock_throttler(&throttler);
    harness.remote.fail_discovery(
        DiscoveryCategory::Popular,
        Error::Remote(RemoteError::service_error(503, "unavailable")),
    );
    let remote = harness.remote.clone();

    let result = harness
        .context
        .orchestrator
        .refresh(
            &popular_key(),
            RefreshPolicy::DISCOVERY,
            harness.local.as_ref(),
            || remote.discovery_games(DiscoveryCategory::Popular, Pagination::default()),
        )
        .await;

    let error = result.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::RemoteServiceError);
    assert!(harness.local.is_empty().await);
    assert!(throttler.updated_keys().is_empty());
}

#[tokio::test]
async fn test_failed_upsert_leaves_refresh_time_alone() {
    // Arrange
    let throttler = MockThrottler::allowing();
    let harness = Harness::with_mock_throttler(&throttler);
    harness
        .remote
        .with_discovery_games(DiscoveryCategory::Popular, fake_games(1, 3));
    let remote = harness.remote.clone();
    let store = FailingGamesStore::new();

    // Act
    let result = harness
        .context
        .orchestrator
        .refresh(&popular_key(), RefreshPolicy::DISCOVERY, &store, || {
            remote.discovery_games(DiscoveryCategory::Popular, Pagination::default())
        })
        .await;

    // Assert
    let error = result.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Unknown);
    assert_eq!(store.attempts(), 1);
    assert_eq!(harness.remote.discovery_calls(DiscoveryCategory::Popular), 1);
    assert!(throttler.updated_keys().is_empty());
}

#[tokio::test]
async fn test_successful_refresh_upserts_then_records_once() {
    let throttler = MockThrottler::allowing();
    let harness = Harness::with_mock_throttler(&throttler);
    let games = fake_games(1, 3);
    harness
        .remote
        .with_discovery_games(DiscoveryCategory::Popular, games.clone());
    let remote = harness.remote.clone();

    let result = harness
        .context
        .orchestrator
        .refresh(
            &popular_key(),
            RefreshPolicy::DISCOVERY,
            harness.local.as_ref(),
            || remote.discovery_games(DiscoveryCategory::Popular, Pagination::default()),
        )
        .await
        .unwrap();

    assert_eq!(result, Refresh::Refreshed(games.clone()));
    assert_eq!(harness.local.len().await, 3);
    let stored = harness
        .local
        .get_games(&[1, 2, 3], Pagination::default())
        .await
        .unwrap();
    assert_eq!(stored, games);
    assert_eq!(throttler.updated_keys(), vec![popular_key()]);
}

#[tokio::test]
async fn test_discovery_refresh_is_throttled_for_ten_minutes() {
    let harness = Harness::with_real_throttler();
    harness
        .remote
        .with_discovery_games(DiscoveryCategory::Popular, fake_games(1, 2));
    let refresh = || {
        let remote = harness.remote.clone();
        let orchestrator = harness.context.orchestrator.clone();
        let local = harness.local.clone();
        async move {
            orchestrator
                .refresh(
                    &popular_key(),
                    RefreshPolicy::DISCOVERY,
                    local.as_ref(),
                    || remote.discovery_games(DiscoveryCategory::Popular, Pagination::default()),
                )
                .await
        }
    };

    assert!(!refresh().await.unwrap().is_skipped());

    harness.advance(minutes(5));
    assert!(refresh().await.unwrap().is_skipped());
    assert_eq!(harness.remote.discovery_calls(DiscoveryCategory::Popular), 1);

    harness.advance(minutes(6));
    assert!(!refresh().await.unwrap().is_skipped());
    assert_eq!(harness.remote.discovery_calls(DiscoveryCategory::Popular), 2);
}

#[tokio::test]
async fn test_single_flight_skips_while_remote_is_slow() {
    let throttler = MockThrottler::allowing();
    let mut harness = Harness::with_mock_throttler(&throttler);
    harness.context.orchestrator = harness.context.orchestrator.clone().with_single_flight();
    harness
        .remote
        .with_discovery_games(DiscoveryCategory::Popular, fake_games(1, 2));
    harness.remote.with_delay(Duration::from_millis(50));
    let remote = harness.remote.clone();
    let orchestrator = &harness.context.orchestrator;
    let local = harness.local.as_ref();
    let first_key = popular_key();
    let second_key = popular_key();

    let (first, second) = tokio::join!(
        orchestrator.refresh(&first_key, RefreshPolicy::DISCOVERY, local, || {
            remote.discovery_games(DiscoveryCategory::Popular, Pagination::default())
        }),
        orchestrator.refresh(&second_key, RefreshPolicy::DISCOVERY, local, || {
            remote.discovery_games(DiscoveryCategory::Popular, Pagination::default())
        }),
    );

    assert!(!first.unwrap().is_skipped());
    assert!(second.unwrap().is_skipped());
    assert_eq!(harness.remote.discovery_calls(DiscoveryCategory::Popular), 1);
    assert_eq!(throttler.updated_keys(), vec![popular_key()]);
}
