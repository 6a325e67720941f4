//! Remote catalog contracts
//!
//! Only the result-returning shape of the remote matters here. Wire formats
//! belong to whichever client implements these traits.

use crate::Result;
use crate::domain::{Article, Company, DiscoveryCategory, Game, Pagination};
use async_trait::async_trait;

/// Remote source of game lists
#[async_trait]
pub trait GamesRemoteDataStore: Send + Sync {
    async fn discovery_games(
        &self,
        category: DiscoveryCategory,
        pagination: Pagination,
    ) -> Result<Vec<Game>>;

    async fn company_developed_games(
        &self,
        company: &Company,
        pagination: Pagination,
    ) -> Result<Vec<Game>>;

    async fn similar_games(&self, game: &Game, pagination: Pagination) -> Result<Vec<Game>>;

    async fn search_games(&self, query: &str, pagination: Pagination) -> Result<Vec<Game>>;
}

/// Remote source of gaming news
#[async_trait]
pub trait ArticlesRemoteDataStore: Send + Sync {
    async fn articles(&self, pagination: Pagination) -> Result<Vec<Article>>;
}

/// Connectivity check
pub trait NetworkState: Send + Sync {
    fn is_network_available(&self) -> bool;
}

/// Network state fixed at construction
#[derive(Debug, Clone, Copy)]
pub struct StaticNetworkState(pub bool);

impl NetworkState for StaticNetworkState {
    fn is_network_available(&self) -> bool {
        self.0
    }
}
