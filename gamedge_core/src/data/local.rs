//! Local store contracts
//!
//! Local stores are the canonical view of current data. Every write bumps the
//! store's change signal so live queries re-run.

use crate::Result;
use crate::data::release_dates::DiscoveryFilter;
use crate::domain::{Article, Game, Pagination};
use async_trait::async_trait;
use tokio::sync::watch;

/// Insert-or-replace by id
#[async_trait]
pub trait Upsert<T>: Send + Sync {
    async fn upsert(&self, items: &[T]) -> Result<()>;
}

/// Local game storage
#[async_trait]
pub trait GamesLocalDataStore: Upsert<Game> {
    async fn get_game(&self, id: i64) -> Result<Option<Game>>;

    /// Games whose id is in `ids`, ordered by id
    async fn get_games(&self, ids: &[i64], pagination: Pagination) -> Result<Vec<Game>>;

    async fn discovery_games(
        &self,
        filter: &DiscoveryFilter,
        pagination: Pagination,
    ) -> Result<Vec<Game>>;

    /// Case-insensitive name prefix search, best rated first
    async fn search_games(&self, query: &str, pagination: Pagination) -> Result<Vec<Game>>;

    fn changes(&self) -> watch::Receiver<u64>;
}

/// Local news storage
#[async_trait]
pub trait ArticlesLocalDataStore: Upsert<Article> {
    /// Newest publication date first
    async fn articles(&self, pagination: Pagination) -> Result<Vec<Article>>;

    fn changes(&self) -> watch::Receiver<u64>;
}

/// Local liked-games storage
#[async_trait]
pub trait LikedGamesLocalDataStore: Send + Sync {
    async fn like_game(&self, game_id: i64) -> Result<()>;

    async fn unlike_game(&self, game_id: i64) -> Result<()>;

    async fn is_game_liked(&self, game_id: i64) -> Result<bool>;

    /// Liked games present in the games store, most recently liked first
    async fn liked_games(&self, pagination: Pagination) -> Result<Vec<Game>>;

    fn changes(&self) -> watch::Receiver<u64>;
}

/// Sort key shared by the search implementations
pub(crate) fn search_order(a: &Game, b: &Game) -> std::cmp::Ordering {
    // total_rating IS NULL, total_rating DESC, id ASC
    match (a.total_rating, b.total_rating) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}

/// Lowercased, trimmed search term; `None` for blank queries
pub(crate) fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}
