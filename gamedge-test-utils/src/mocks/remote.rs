//! Scripted remote data stores

use async_trait::async_trait;
use gamedge_core::data::{ArticlesRemoteDataStore, GamesRemoteDataStore};
use gamedge_core::domain::{Article, Company, DiscoveryCategory, Game, Pagination};
use gamedge_core::error::RemoteError;
use gamedge_core::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock remote game source
///
/// Each operation returns its scripted result (an empty list unless
/// configured) and counts how often it was called.
///
/// # Examples
///
/// ```rust
/// use gamedge_core::data::GamesRemoteDataStore;
/// use gamedge_core::domain::{DiscoveryCategory, Pagination};
/// use gamedge_test_utils::{MockGamesRemote, fake_games};
///
/// # async fn example() -> gamedge_core::Result<()> {
/// let remote = MockGamesRemote::new();
/// remote.with_discovery_games(DiscoveryCategory::Popular, fake_games(1, 3));
///
/// let games = remote
///     .discovery_games(DiscoveryCategory::Popular, Pagination::default())
///     .await?;
/// assert_eq!(games.len(), 3);
/// assert_eq!(remote.discovery_calls(DiscoveryCategory::Popular), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MockGamesRemote {
    behavior: Arc<Mutex<GamesBehavior>>,
}

#[derive(Default)]
struct GamesBehavior {
    discovery: HashMap<DiscoveryCategory, Result<Vec<Game>>>,
    company_games: Option<Result<Vec<Game>>>,
    similar_games: Option<Result<Vec<Game>>>,
    search: Option<Result<Vec<Game>>>,
    discovery_calls: HashMap<DiscoveryCategory, usize>,
    company_calls: usize,
    similar_calls: usize,
    search_queries: Vec<String>,
    delay: Option<Duration>,
}

impl MockGamesRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call sleep for `delay` before answering
    pub fn with_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }

    pub fn with_discovery_games(&self, category: DiscoveryCategory, games: Vec<Game>) {
        self.lock().discovery.insert(category, Ok(games));
    }

    pub fn fail_discovery(&self, category: DiscoveryCategory, error: Error) {
        self.lock().discovery.insert(category, Err(error));
    }

    pub fn with_company_games(&self, games: Vec<Game>) {
        self.lock().company_games = Some(Ok(games));
    }

    pub fn fail_company_games(&self, error: Error) {
        self.lock().company_games = Some(Err(error));
    }

    pub fn with_similar_games(&self, games: Vec<Game>) {
        self.lock().similar_games = Some(Ok(games));
    }

    pub fn fail_similar_games(&self, error: Error) {
        self.lock().similar_games = Some(Err(error));
    }

    pub fn with_search_results(&self, games: Vec<Game>) {
        self.lock().search = Some(Ok(games));
    }

    pub fn fail_search(&self, error: Error) {
        self.lock().search = Some(Err(error));
    }

    pub fn discovery_calls(&self, category: DiscoveryCategory) -> usize {
        self.lock()
            .discovery_calls
            .get(&category)
            .copied()
            .unwrap_or(0)
    }

    pub fn company_calls(&self) -> usize {
        self.lock().company_calls
    }

    pub fn similar_calls(&self) -> usize {
        self.lock().similar_calls
    }

    /// Queries passed to `search_games`, in call order
    pub fn search_queries(&self) -> Vec<String> {
        self.lock().search_queries.clone()
    }

    /// Calls across every operation
    pub fn total_calls(&self) -> usize {
        let behavior = self.lock();
        behavior.discovery_calls.values().sum::<usize>()
            + behavior.company_calls
            + behavior.similar_calls
            + behavior.search_queries.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GamesBehavior> {
        self.behavior.lock().unwrap()
    }

    async fn simulate_latency(&self) {
        let delay = self.lock().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn scripted(result: Option<&Result<Vec<Game>>>) -> Result<Vec<Game>> {
    result.cloned().unwrap_or_else(|| Ok(Vec::new()))
}

#[async_trait]
impl GamesRemoteDataStore for MockGamesRemote {
    async fn discovery_games(
        &self,
        category: DiscoveryCategory,
        _pagination: Pagination,
    ) -> Result<Vec<Game>> {
        self.simulate_latency().await;
        let mut behavior = self.lock();
        *behavior.discovery_calls.entry(category).or_default() += 1;
        scripted(behavior.discovery.get(&category))
    }

    async fn company_developed_games(
        &self,
        _company: &Company,
        _pagination: Pagination,
    ) -> Result<Vec<Game>> {
        self.simulate_latency().await;
        let mut behavior = self.lock();
        behavior.company_calls += 1;
        scripted(behavior.company_games.as_ref())
    }

    async fn similar_games(&self, _game: &Game, _pagination: Pagination) -> Result<Vec<Game>> {
        self.simulate_latency().await;
        let mut behavior = self.lock();
        behavior.similar_calls += 1;
        scripted(behavior.similar_games.as_ref())
    }

    async fn search_games(&self, query: &str, _pagination: Pagination) -> Result<Vec<Game>> {
        self.simulate_latency().await;
        let mut behavior = self.lock();
        behavior.search_queries.push(query.to_string());
        scripted(behavior.search.as_ref())
    }
}

/// Mock remote news source
#[derive(Clone)]
pub struct MockArticlesRemote {
    behavior: Arc<Mutex<ArticlesBehavior>>,
}

struct ArticlesBehavior {
    result: Result<Vec<Article>>,
    calls: usize,
}

impl Default for MockArticlesRemote {
    fn default() -> Self {
        Self {
            behavior: Arc::new(Mutex::new(ArticlesBehavior {
                result: Ok(Vec::new()),
                calls: 0,
            })),
        }
    }
}

impl MockArticlesRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(&self, articles: Vec<Article>) {
        self.behavior.lock().unwrap().result = Ok(articles);
    }

    pub fn fail(&self, error: Error) {
        self.behavior.lock().unwrap().result = Err(error);
    }

    /// Shorthand for failing with a network outage
    pub fn go_offline(&self) {
        self.fail(Error::Remote(RemoteError::network_unavailable(
            "mock remote offline",
        )));
    }

    pub fn calls(&self) -> usize {
        self.behavior.lock().unwrap().calls
    }
}

#[async_trait]
impl ArticlesRemoteDataStore for MockArticlesRemote {
    async fn articles(&self, _pagination: Pagination) -> Result<Vec<Article>> {
        let mut behavior = self.behavior.lock().unwrap();
        behavior.calls += 1;
        behavior.result.clone()
    }
}
