//! Discovery lists: popular, recently released, coming soon, most anticipated

use crate::Result;
use crate::data::observe;
use crate::domain::{DiscoveryCategory, Game, Pagination};
use crate::error::Error;
use crate::refresh::Refresh;
use crate::usecases::{GamesContext, with_refresh_errors};
use futures::future::join_all;
use futures::stream::BoxStream;
use log::{debug, warn};
use std::sync::Arc;

/// Refresh one discovery category page
pub struct RefreshGamesUseCase {
    category: DiscoveryCategory,
    context: GamesContext,
}

impl RefreshGamesUseCase {
    pub fn new(category: DiscoveryCategory, context: GamesContext) -> Self {
        Self { category, context }
    }

    pub fn category(&self) -> DiscoveryCategory {
        self.category
    }

    pub async fn execute(&self, pagination: Pagination) -> Result<Refresh<Vec<Game>>> {
        let context = &self.context;
        let key = context.keys.discovery_games_key(self.category, pagination);
        let category = self.category;

        context
            .orchestrator
            .refresh(&key, context.policies.discovery(), context.local.as_ref(), || {
                context.remote.discovery_games(category, pagination)
            })
            .await
    }
}

/// Live local view of one discovery category page
pub struct ObserveGamesUseCase {
    category: DiscoveryCategory,
    context: GamesContext,
    refresh: Arc<RefreshGamesUseCase>,
}

impl ObserveGamesUseCase {
    pub fn new(
        category: DiscoveryCategory,
        context: GamesContext,
        refresh: Arc<RefreshGamesUseCase>,
    ) -> Self {
        Self {
            category,
            context,
            refresh,
        }
    }

    /// Stream of the local page, re-emitted whenever the games store changes
    ///
    /// With `refresh` set, a refresh runs alongside the local stream. Its
    /// result reaches the stream through the store; a failure is emitted as
    /// a single `Err` item and the local stream keeps going.
    pub fn execute(
        &self,
        pagination: Pagination,
        refresh: bool,
    ) -> BoxStream<'static, Result<Vec<Game>>> {
        let local = self.context.local.clone();
        let release_dates = self.context.release_dates.clone();
        let category = self.category;

        let games = observe(vec![local.changes()], move || {
            let local = local.clone();
            let filter = release_dates.filter_for(category);
            async move { local.discovery_games(&filter, pagination).await }
        });

        if !refresh {
            return games;
        }

        let refresher = self.refresh.clone();
        with_refresh_errors(games, async move { refresher.execute(pagination).await })
    }
}

/// Refresh and observe handles for one category
pub struct DiscoveryUseCases {
    pub refresh: Arc<RefreshGamesUseCase>,
    pub observe: ObserveGamesUseCase,
}

impl DiscoveryUseCases {
    fn new(category: DiscoveryCategory, context: &GamesContext) -> Self {
        let refresh = Arc::new(RefreshGamesUseCase::new(category, context.clone()));
        let observe = ObserveGamesUseCase::new(category, context.clone(), refresh.clone());
        Self { refresh, observe }
    }
}

/// Registry of the discovery categories
pub struct DiscoveryGames {
    popular: DiscoveryUseCases,
    recently_released: DiscoveryUseCases,
    coming_soon: DiscoveryUseCases,
    most_anticipated: DiscoveryUseCases,
}

impl DiscoveryGames {
    pub fn new(context: &GamesContext) -> Self {
        Self {
            popular: DiscoveryUseCases::new(DiscoveryCategory::Popular, context),
            recently_released: DiscoveryUseCases::new(DiscoveryCategory::RecentlyReleased, context),
            coming_soon: DiscoveryUseCases::new(DiscoveryCategory::ComingSoon, context),
            most_anticipated: DiscoveryUseCases::new(DiscoveryCategory::MostAnticipated, context),
        }
    }

    pub fn category(&self, category: DiscoveryCategory) -> &DiscoveryUseCases {
        match category {
            DiscoveryCategory::Popular => &self.popular,
            DiscoveryCategory::RecentlyReleased => &self.recently_released,
            DiscoveryCategory::ComingSoon => &self.coming_soon,
            DiscoveryCategory::MostAnticipated => &self.most_anticipated,
        }
    }

    pub fn refresh_all(&self) -> RefreshAllDiscoverableGamesUseCase {
        RefreshAllDiscoverableGamesUseCase::new(
            DiscoveryCategory::ALL
                .iter()
                .map(|category| self.category(*category).refresh.clone())
                .collect(),
        )
    }
}

/// What happened to one category during a refresh-all
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOutcome {
    Refreshed(Vec<Game>),
    Skipped,
    Failed(Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRefresh {
    pub category: DiscoveryCategory,
    pub outcome: CategoryOutcome,
}

/// Per-category outcomes of a refresh-all run, in category order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefreshAllReport {
    pub categories: Vec<CategoryRefresh>,
}

impl RefreshAllReport {
    /// Freshly fetched games of every refreshed category, merged in order
    pub fn games(&self) -> Vec<Game> {
        self.categories
            .iter()
            .filter_map(|c| match &c.outcome {
                CategoryOutcome::Refreshed(games) => Some(games.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn errors(&self) -> Vec<(DiscoveryCategory, &Error)> {
        self.categories
            .iter()
            .filter_map(|c| match &c.outcome {
                CategoryOutcome::Failed(e) => Some((c.category, e)),
                _ => None,
            })
            .collect()
    }

    pub fn outcome(&self, category: DiscoveryCategory) -> Option<&CategoryOutcome> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| &c.outcome)
    }
}

/// Refresh every discovery category concurrently
pub struct RefreshAllDiscoverableGamesUseCase {
    refreshers: Vec<Arc<RefreshGamesUseCase>>,
}

impl RefreshAllDiscoverableGamesUseCase {
    pub fn new(refreshers: Vec<Arc<RefreshGamesUseCase>>) -> Self {
        Self { refreshers }
    }

    pub async fn execute(&self, pagination: Pagination) -> RefreshAllReport {
        let runs = self.refreshers.iter().map(|refresher| async move {
            let outcome = match refresher.execute(pagination).await {
                Ok(Refresh::Refreshed(games)) => CategoryOutcome::Refreshed(games),
                Ok(Refresh::Skipped) => CategoryOutcome::Skipped,
                Err(e) => {
                    warn!("Refreshing {} games failed: {e}", refresher.category());
                    CategoryOutcome::Failed(e)
                }
            };
            CategoryRefresh {
                category: refresher.category(),
                outcome,
            }
        });

        let categories = join_all(runs).await;
        debug!(
            "Refresh-all finished: {} categories, {} errors",
            categories.len(),
            categories
                .iter()
                .filter(|c| matches!(c.outcome, CategoryOutcome::Failed(_)))
                .count()
        );

        RefreshAllReport { categories }
    }
}
