//! Use cases built on the refresh orchestrator and the local stores
//!
//! List screens observe a live local query and trigger refreshes as a side
//! channel; a successful refresh reaches observers as a new local emission.
//! Single-entity lookups read the local store directly.

pub mod articles;
pub mod discovery;
pub mod game;
pub mod likes;
pub mod search;

use crate::clock::Clock;
use crate::data::{GamesLocalDataStore, GamesRemoteDataStore, ReleaseDatesProvider};
use crate::refresh::RefreshOrchestrator;
use crate::throttling::{KeyProvider, RefreshPolicies};
use futures::stream::{self, BoxStream, StreamExt};
use std::future::Future;
use std::sync::Arc;

pub use articles::{ObserveArticlesUseCase, RefreshArticlesUseCase};
pub use discovery::{
    CategoryOutcome, CategoryRefresh, DiscoveryGames, DiscoveryUseCases, ObserveGamesUseCase,
    RefreshAllDiscoverableGamesUseCase, RefreshAllReport, RefreshGamesUseCase,
};
pub use game::{
    GameInfo, GetCompanyDevelopedGamesUseCase, GetGameInfoUseCase, GetGameUseCase,
    GetSimilarGamesUseCase,
};
pub use likes::{
    LikeGameUseCase, ObserveGameLikeStateUseCase, ObserveLikedGamesUseCase,
    ToggleGameLikeStateUseCase, UnlikeGameUseCase,
};
pub use search::SearchGamesUseCase;

/// Shared handles for the game use cases
#[derive(Clone)]
pub struct GamesContext {
    pub remote: Arc<dyn GamesRemoteDataStore>,
    pub local: Arc<dyn GamesLocalDataStore>,
    pub keys: Arc<dyn KeyProvider>,
    pub orchestrator: RefreshOrchestrator,
    pub policies: RefreshPolicies,
    pub release_dates: ReleaseDatesProvider,
}

impl GamesContext {
    pub fn new(
        remote: Arc<dyn GamesRemoteDataStore>,
        local: Arc<dyn GamesLocalDataStore>,
        keys: Arc<dyn KeyProvider>,
        orchestrator: RefreshOrchestrator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            remote,
            local,
            keys,
            orchestrator,
            policies: RefreshPolicies::default(),
            release_dates: ReleaseDatesProvider::new(clock),
        }
    }

    pub fn with_policies(mut self, policies: RefreshPolicies) -> Self {
        self.policies = policies;
        self
    }
}

/// Merge a live local stream with a one-shot refresh whose only visible
/// output is its error, if any
pub(crate) fn with_refresh_errors<T, R, Fut>(
    local: BoxStream<'static, crate::Result<T>>,
    refresh: Fut,
) -> BoxStream<'static, crate::Result<T>>
where
    T: Send + 'static,
    R: Send + 'static,
    Fut: Future<Output = crate::Result<R>> + Send + 'static,
{
    let refresh_errors = stream::once(refresh)
        .filter_map(|outcome| futures::future::ready(outcome.err().map(Err)));
    stream::select(local, refresh_errors).boxed()
}
