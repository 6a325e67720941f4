//! Offline catalog remote
//!
//! Serves the remote data store contracts from a JSON file of the form
//! `{ "games": [...], "articles": [...] }`. Without a catalog, or with the
//! network disabled, every call fails with a network-unavailable error.

use async_trait::async_trait;
use gamedge_core::clock::Clock;
use gamedge_core::data::{
    ArticlesRemoteDataStore, GamesRemoteDataStore, NetworkState, ReleaseDatesProvider,
};
use gamedge_core::domain::{Article, Company, DiscoveryCategory, Game, Pagination};
use gamedge_core::error::{RemoteError, StorageError};
use gamedge_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

/// Catalog file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Storage(StorageError::io(&e.to_string(), Some(path))))?;
        serde_json::from_str(&content).map_err(|e| {
            Error::Remote(RemoteError::malformed_response(&format!(
                "{}: {e}",
                path.display()
            )))
        })
    }
}

pub struct CatalogRemoteDataStore {
    catalog: Option<Catalog>,
    network_enabled: bool,
    release_dates: ReleaseDatesProvider,
}

impl CatalogRemoteDataStore {
    pub fn new(catalog: Option<Catalog>, network_enabled: bool, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            network_enabled,
            release_dates: ReleaseDatesProvider::new(clock),
        }
    }

    /// Read the catalog at `path`, if one is configured
    pub fn open(path: Option<&Path>, network_enabled: bool, clock: Arc<dyn Clock>) -> Result<Self> {
        let catalog = path.map(Catalog::load).transpose()?;
        if let Some(catalog) = &catalog {
            log::debug!(
                "Loaded catalog with {} games and {} articles",
                catalog.games.len(),
                catalog.articles.len()
            );
        }
        Ok(Self::new(catalog, network_enabled, clock))
    }

    fn online(&self) -> Result<&Catalog> {
        if !self.network_enabled {
            return Err(RemoteError::network_unavailable("network access is disabled").into());
        }
        self.catalog
            .as_ref()
            .ok_or_else(|| RemoteError::network_unavailable("no catalog is configured").into())
    }

    fn games_by_id(&self, ids: &[i64], pagination: Pagination) -> Result<Vec<Game>> {
        let mut games: Vec<Game> = self
            .online()?
            .games
            .iter()
            .filter(|game| ids.contains(&game.id))
            .cloned()
            .collect();
        games.sort_by_key(|game| game.id);
        Ok(pagination.apply(games))
    }
}

impl NetworkState for CatalogRemoteDataStore {
    fn is_network_available(&self) -> bool {
        self.network_enabled && self.catalog.is_some()
    }
}

#[async_trait]
impl GamesRemoteDataStore for CatalogRemoteDataStore {
    async fn discovery_games(
        &self,
        category: DiscoveryCategory,
        pagination: Pagination,
    ) -> Result<Vec<Game>> {
        let filter = self.release_dates.filter_for(category);
        let mut games: Vec<Game> = self
            .online()?
            .games
            .iter()
            .filter(|game| filter.matches(game))
            .cloned()
            .collect();
        games.sort_by(|a, b| filter.compare(a, b));
        Ok(pagination.apply(games))
    }

    async fn company_developed_games(
        &self,
        company: &Company,
        pagination: Pagination,
    ) -> Result<Vec<Game>> {
        self.games_by_id(&company.developed_games, pagination)
    }

    async fn similar_games(&self, game: &Game, pagination: Pagination) -> Result<Vec<Game>> {
        self.games_by_id(&game.similar_games, pagination)
    }

    async fn search_games(&self, query: &str, pagination: Pagination) -> Result<Vec<Game>> {
        let query = query.trim().to_lowercase();
        let mut games: Vec<Game> = self
            .online()?
            .games
            .iter()
            .filter(|game| game.name.to_lowercase().contains(&query))
            .cloned()
            .collect();
        games.sort_by(|a, b| {
            b.follower_count
                .cmp(&a.follower_count)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(pagination.apply(games))
    }
}

#[async_trait]
impl ArticlesRemoteDataStore for CatalogRemoteDataStore {
    async fn articles(&self, pagination: Pagination) -> Result<Vec<Article>> {
        let mut articles = self.online()?.articles.clone();
        articles.sort_by(|a, b| match b.publication_date.cmp(&a.publication_date) {
            Ordering::Equal => a.id.cmp(&b.id),
            other => other,
        });
        Ok(pagination.apply(articles))
    }
}
