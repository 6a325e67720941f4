//! Application wiring
//!
//! Assembles stores, the throttler and every use case from an [`AppConfig`].

use crate::catalog::CatalogRemoteDataStore;
use crate::config::{AppConfig, StorageBackend, ThrottleStoreKind};
use crate::paths;
use crate::throttle::{TimestampStoreConfig, TimestampStoreFactory};
use futures::StreamExt;
use gamedge_core::data::{
    ArticlesLocalDataStore, GamesLocalDataStore, LikedGamesLocalDataStore, MemoryArticlesStore,
    MemoryGamesStore, MemoryLikedGamesStore,
};
use gamedge_core::database::DatabaseStats;
use gamedge_core::throttling::{
    DefaultKeyProvider, KeyProvider, RefreshThrottler, TimestampStore,
};
use gamedge_core::usecases::{
    DiscoveryGames, GameInfo, GamesContext, GetGameInfoUseCase, LikeGameUseCase,
    ObserveArticlesUseCase, ObserveLikedGamesUseCase, RefreshAllReport, RefreshArticlesUseCase,
    SearchGamesUseCase, ToggleGameLikeStateUseCase, UnlikeGameUseCase,
};
use gamedge_core::{
    Article, CacheKey, Clock, Database, DiscoveryCategory, Game, Pagination, Refresh,
    RefreshOrchestrator, Result, SystemClock,
};
use log::{debug, warn};
use std::sync::Arc;

/// Local stores for one storage backend
struct LocalStores {
    games: Arc<dyn GamesLocalDataStore>,
    articles: Arc<dyn ArticlesLocalDataStore>,
    likes: Arc<dyn LikedGamesLocalDataStore>,
}

/// A page read from the local store plus the error of the refresh that ran
/// before it, if any
#[derive(Debug)]
pub struct Page<T> {
    pub items: T,
    pub refresh_error: Option<gamedge_core::Error>,
}

pub struct App {
    clock: Arc<dyn Clock>,
    database: Option<Arc<Database>>,
    timestamps: Arc<dyn TimestampStore>,
    keys: DefaultKeyProvider,
    discovery: DiscoveryGames,
    game_info: GetGameInfoUseCase,
    search: SearchGamesUseCase,
    refresh_articles: Arc<RefreshArticlesUseCase>,
    observe_articles: ObserveArticlesUseCase,
    like: LikeGameUseCase,
    unlike: UnlikeGameUseCase,
    toggle_like: ToggleGameLikeStateUseCase,
    liked_games: ObserveLikedGamesUseCase,
}

impl App {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    pub async fn with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let needs_database = config.storage.backend == StorageBackend::Sqlite
            || config.throttle.store == ThrottleStoreKind::Sqlite;
        let database = if needs_database {
            let path = config
                .storage
                .database_path
                .clone()
                .unwrap_or_else(paths::get_database_path);
            debug!("Opening database at {}", path.display());
            Some(Arc::new(Database::new(&path).await?))
        } else {
            None
        };

        let stores = match (&config.storage.backend, &database) {
            (StorageBackend::Sqlite, Some(db)) => LocalStores {
                games: Arc::new(db.games()),
                articles: Arc::new(db.articles()),
                likes: Arc::new(db.liked_games(clock.clone())),
            },
            _ => {
                let games: Arc<dyn GamesLocalDataStore> = Arc::new(MemoryGamesStore::new());
                LocalStores {
                    likes: Arc::new(MemoryLikedGamesStore::new(games.clone(), clock.clone())),
                    articles: Arc::new(MemoryArticlesStore::new()),
                    games,
                }
            }
        };

        let timestamps = TimestampStoreFactory::create(TimestampStoreConfig::from_app_config(
            config,
            database.clone(),
        ))?;
        let throttler = Arc::new(RefreshThrottler::new(timestamps.clone(), clock.clone()));
        let mut orchestrator = RefreshOrchestrator::new(throttler);
        if config.throttle.single_flight {
            orchestrator = orchestrator.with_single_flight();
        }

        let remote = Arc::new(CatalogRemoteDataStore::open(
            config.remote.catalog_path.as_deref(),
            config.remote.network_enabled,
            clock.clone(),
        )?);
        let keys: Arc<dyn KeyProvider> = Arc::new(DefaultKeyProvider);
        let policies = config.throttle.policies();

        let context = GamesContext::new(
            remote.clone(),
            stores.games.clone(),
            keys.clone(),
            orchestrator.clone(),
            clock.clone(),
        )
        .with_policies(policies);

        let refresh_articles = Arc::new(
            RefreshArticlesUseCase::new(
                remote.clone(),
                stores.articles.clone(),
                keys,
                orchestrator,
            )
            .with_policy(policies.articles()),
        );

        Ok(Self {
            discovery: DiscoveryGames::new(&context),
            game_info: GetGameInfoUseCase::new(context, stores.likes.clone()),
            search: SearchGamesUseCase::new(remote.clone(), stores.games.clone(), remote),
            observe_articles: ObserveArticlesUseCase::new(
                stores.articles.clone(),
                refresh_articles.clone(),
            ),
            refresh_articles,
            like: LikeGameUseCase::new(stores.likes.clone()),
            unlike: UnlikeGameUseCase::new(stores.likes.clone()),
            toggle_like: ToggleGameLikeStateUseCase::new(stores.likes.clone()),
            liked_games: ObserveLikedGamesUseCase::new(stores.likes, stores.games),
            keys: DefaultKeyProvider,
            timestamps,
            database,
            clock,
        })
    }

    pub fn keys(&self) -> &dyn KeyProvider {
        &self.keys
    }

    pub fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    /// Refresh one category unless throttled, then read its local page
    pub async fn discover(
        &self,
        category: DiscoveryCategory,
        pagination: Pagination,
        refresh: bool,
    ) -> Result<Page<Vec<Game>>> {
        let use_cases = self.discovery.category(category);
        let refresh_error = if refresh {
            match use_cases.refresh.execute(pagination).await {
                Ok(Refresh::Refreshed(games)) => {
                    debug!("Refreshed {} {category} games", games.len());
                    None
                }
                Ok(Refresh::Skipped) => None,
                Err(e) => {
                    warn!("Refreshing {category} games failed: {e}");
                    Some(e)
                }
            }
        } else {
            None
        };

        let items = first(use_cases.observe.execute(pagination, false)).await?;
        Ok(Page {
            items,
            refresh_error,
        })
    }

    /// Refresh every category, then read each local page
    pub async fn discover_all(
        &self,
        pagination: Pagination,
        refresh: bool,
    ) -> Result<(Option<RefreshAllReport>, Vec<(DiscoveryCategory, Vec<Game>)>)> {
        let report = if refresh {
            Some(self.discovery.refresh_all().execute(pagination).await)
        } else {
            None
        };

        let mut pages = Vec::with_capacity(DiscoveryCategory::ALL.len());
        for category in DiscoveryCategory::ALL {
            let games = first(
                self.discovery
                    .category(category)
                    .observe
                    .execute(pagination, false),
            )
            .await?;
            pages.push((category, games));
        }

        Ok((report, pages))
    }

    pub async fn game_info(&self, game_id: i64) -> Result<GameInfo> {
        self.game_info.execute(game_id).await
    }

    pub async fn search(&self, query: &str, pagination: Pagination) -> Result<Vec<Game>> {
        self.search.execute(query, pagination).await
    }

    pub async fn news(&self, pagination: Pagination, refresh: bool) -> Result<Page<Vec<Article>>> {
        let refresh_error = if refresh {
            self.refresh_articles.execute(pagination).await.err()
        } else {
            None
        };
        if let Some(e) = &refresh_error {
            warn!("Refreshing articles failed: {e}");
        }

        let items = first(self.observe_articles.execute(false, pagination)).await?;
        Ok(Page {
            items,
            refresh_error,
        })
    }

    pub async fn like(&self, game_id: i64) -> Result<()> {
        self.like.execute(game_id).await
    }

    pub async fn unlike(&self, game_id: i64) -> Result<()> {
        self.unlike.execute(game_id).await
    }

    /// Returns the new like state
    pub async fn toggle_like(&self, game_id: i64) -> Result<bool> {
        self.toggle_like.execute(game_id).await
    }

    pub async fn liked_games(&self, pagination: Pagination) -> Result<Vec<Game>> {
        first(self.liked_games.execute(pagination)).await
    }

    pub async fn throttle_entries(&self) -> Result<Vec<(CacheKey, u64)>> {
        self.timestamps.entries().await
    }

    /// Row counts, when a database backs this app
    pub async fn stats(&self) -> Result<Option<DatabaseStats>> {
        match &self.database {
            Some(database) => Ok(Some(database.stats().await?)),
            None => Ok(None),
        }
    }
}

/// First emission of a live query
async fn first<T>(
    mut stream: futures::stream::BoxStream<'static, Result<Vec<T>>>,
) -> Result<Vec<T>> {
    stream.next().await.unwrap_or_else(|| Ok(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use gamedge_core::ManualClock;
    use gamedge_core::usecases::CategoryOutcome;
    use gamedge_test_utils::{ArticleBuilder, GameBuilder};
    use std::time::Duration;
    use tempfile::TempDir;

    const NOW_MILLIS: u64 = 1_700_000_000_000;
    const NOW_SECS: i64 = 1_700_000_000;

    fn write_catalog(dir: &TempDir) -> std::path::PathBuf {
        let catalog = Catalog {
            games: vec![
                GameBuilder::new(1)
                    .name("Upcoming")
                    .release_date(NOW_SECS + 86_400)
                    .hype_count(10)
                    .build(),
                GameBuilder::new(2)
                    .name("Rated")
                    .release_date(NOW_SECS - 86_400)
                    .users_rating(85.0)
                    .total_rating(88.0)
                    .build(),
            ],
            articles: vec![ArticleBuilder::new(5).title("Patch notes").build()],
        };
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, serde_json::to_string(&catalog).unwrap()).unwrap();
        path
    }

    fn memory_config(catalog: Option<std::path::PathBuf>) -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.throttle.store = ThrottleStoreKind::Memory;
        config.remote.catalog_path = catalog;
        config
    }

    #[tokio::test]
    async fn test_discover_refreshes_then_throttles() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(NOW_MILLIS));
        let app = App::with_clock(&memory_config(Some(write_catalog(&dir))), clock.clone())
            .await
            .unwrap();

        let page = app
            .discover(DiscoveryCategory::ComingSoon, Pagination::default(), true)
            .await
            .unwrap();
        assert!(page.refresh_error.is_none());
        assert_eq!(page.items.iter().map(|g| g.id).collect::<Vec<_>>(), vec![1]);

        let (report, _) = app.discover_all(Pagination::default(), true).await.unwrap();
        let report = report.unwrap();
        assert_eq!(
            report.outcome(DiscoveryCategory::ComingSoon),
            Some(&CategoryOutcome::Skipped)
        );
        assert!(matches!(
            report.outcome(DiscoveryCategory::Popular),
            Some(CategoryOutcome::Refreshed(_))
        ));

        clock.advance(Duration::from_secs(11 * 60));
        let (report, _) = app.discover_all(Pagination::default(), true).await.unwrap();
        assert!(matches!(
            report.unwrap().outcome(DiscoveryCategory::ComingSoon),
            Some(CategoryOutcome::Refreshed(_))
        ));
    }

    #[tokio::test]
    async fn test_offline_news_reports_error_and_shows_cache() {
        let clock = Arc::new(ManualClock::new(NOW_MILLIS));
        let app = App::with_clock(&memory_config(None), clock).await.unwrap();

        let page = app.news(Pagination::default(), true).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(
            page.refresh_error.map(|e| e.kind()),
            Some(gamedge_core::ErrorKind::NetworkUnavailable)
        );
        assert!(app.throttle_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_backend_persists_likes() {
        let dir = TempDir::new().unwrap();
        let mut config = memory_config(Some(write_catalog(&dir)));
        config.storage.backend = StorageBackend::Sqlite;
        config.storage.database_path = Some(dir.path().join("gamedge.db"));
        config.throttle.store = ThrottleStoreKind::Sqlite;

        let clock = Arc::new(ManualClock::new(NOW_MILLIS));
        let app = App::with_clock(&config, clock.clone()).await.unwrap();
        app.discover(DiscoveryCategory::Popular, Pagination::default(), true)
            .await
            .unwrap();
        app.like(2).await.unwrap();
        drop(app);

        let app = App::with_clock(&config, clock).await.unwrap();
        let liked = app.liked_games(Pagination::default()).await.unwrap();
        assert_eq!(liked.iter().map(|g| g.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(app.throttle_entries().await.unwrap().len(), 1);
        assert_eq!(app.stats().await.unwrap().map(|s| s.liked_game_count), Some(1));
    }
}
