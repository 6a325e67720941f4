//! In-memory local stores
//!
//! Used by tests and by the CLI when `storage.backend = "memory"`. Queries
//! mirror the ordering and filtering of the SQLite repositories.

use crate::Result;
use crate::clock::Clock;
use crate::data::local::{
    ArticlesLocalDataStore, GamesLocalDataStore, LikedGamesLocalDataStore, Upsert,
    normalize_query, search_order,
};
use crate::data::observe::ChangeNotifier;
use crate::data::release_dates::DiscoveryFilter;
use crate::domain::{Article, Game, Pagination};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

/// Games keyed by id
#[derive(Debug, Default)]
pub struct MemoryGamesStore {
    games: RwLock<BTreeMap<i64, Game>>,
    notifier: ChangeNotifier,
}

impl MemoryGamesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }
}

#[async_trait]
impl Upsert<Game> for MemoryGamesStore {
    async fn upsert(&self, items: &[Game]) -> Result<()> {
        {
            let mut games = self.games.write().await;
            for game in items {
                games.insert(game.id, game.clone());
            }
        }
        self.notifier.notify();
        Ok(())
    }
}

#[async_trait]
impl GamesLocalDataStore for MemoryGamesStore {
    async fn get_game(&self, id: i64) -> Result<Option<Game>> {
        Ok(self.games.read().await.get(&id).cloned())
    }

    async fn get_games(&self, ids: &[i64], pagination: Pagination) -> Result<Vec<Game>> {
        let games = self.games.read().await;
        Ok(pagination.apply(
            games
                .values()
                .filter(|game| ids.contains(&game.id))
                .cloned(),
        ))
    }

    async fn discovery_games(
        &self,
        filter: &DiscoveryFilter,
        pagination: Pagination,
    ) -> Result<Vec<Game>> {
        let mut matching: Vec<Game> = self
            .games
            .read()
            .await
            .values()
            .filter(|game| filter.matches(game))
            .cloned()
            .collect();
        matching.sort_by(|a, b| filter.compare(a, b));
        Ok(pagination.apply(matching))
    }

    async fn search_games(&self, query: &str, pagination: Pagination) -> Result<Vec<Game>> {
        let Some(query) = normalize_query(query) else {
            return Ok(Vec::new());
        };

        let mut matching: Vec<Game> = self
            .games
            .read()
            .await
            .values()
            .filter(|game| game.name.to_lowercase().starts_with(&query))
            .cloned()
            .collect();
        matching.sort_by(search_order);
        Ok(pagination.apply(matching))
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }
}

/// Articles keyed by id
#[derive(Debug, Default)]
pub struct MemoryArticlesStore {
    articles: RwLock<HashMap<i64, Article>>,
    notifier: ChangeNotifier,
}

impl MemoryArticlesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Upsert<Article> for MemoryArticlesStore {
    async fn upsert(&self, items: &[Article]) -> Result<()> {
        {
            let mut articles = self.articles.write().await;
            for article in items {
                articles.insert(article.id, article.clone());
            }
        }
        self.notifier.notify();
        Ok(())
    }
}

#[async_trait]
impl ArticlesLocalDataStore for MemoryArticlesStore {
    async fn articles(&self, pagination: Pagination) -> Result<Vec<Article>> {
        let mut articles: Vec<Article> = self.articles.read().await.values().cloned().collect();
        articles.sort_by(|a, b| {
            b.publication_date
                .cmp(&a.publication_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(pagination.apply(articles))
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }
}

/// Like records joined against a games store
pub struct MemoryLikedGamesStore {
    likes: RwLock<HashMap<i64, u64>>,
    games: Arc<dyn GamesLocalDataStore>,
    clock: Arc<dyn Clock>,
    notifier: ChangeNotifier,
}

impl MemoryLikedGamesStore {
    pub fn new(games: Arc<dyn GamesLocalDataStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            likes: RwLock::new(HashMap::new()),
            games,
            clock,
            notifier: ChangeNotifier::new(),
        }
    }
}

#[async_trait]
impl LikedGamesLocalDataStore for MemoryLikedGamesStore {
    async fn like_game(&self, game_id: i64) -> Result<()> {
        self.likes
            .write()
            .await
            .insert(game_id, self.clock.now_millis());
        self.notifier.notify();
        Ok(())
    }

    async fn unlike_game(&self, game_id: i64) -> Result<()> {
        let removed = self.likes.write().await.remove(&game_id).is_some();
        if removed {
            self.notifier.notify();
        }
        Ok(())
    }

    async fn is_game_liked(&self, game_id: i64) -> Result<bool> {
        Ok(self.likes.read().await.contains_key(&game_id))
    }

    async fn liked_games(&self, pagination: Pagination) -> Result<Vec<Game>> {
        let mut likes: Vec<(i64, u64)> = self
            .likes
            .read()
            .await
            .iter()
            .map(|(id, liked_at)| (*id, *liked_at))
            .collect();
        likes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

        let mut games = Vec::with_capacity(likes.len());
        for (game_id, _) in likes {
            if let Some(game) = self.games.get_game(game_id).await? {
                games.push(game);
            }
        }
        Ok(pagination.apply(games))
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn game(id: i64, name: &str, total_rating: Option<f64>) -> Game {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "follower_count": null,
            "hype_count": null,
            "release_date": null,
            "critics_rating": null,
            "users_rating": null,
            "total_rating": total_rating,
            "name": name,
            "summary": null,
            "storyline": null,
            "cover": null
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = MemoryGamesStore::new();
        store.upsert(&[game(1, "Old", None)]).await.unwrap();
        store.upsert(&[game(1, "New", None)]).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get_game(1).await.unwrap().unwrap().name, "New");
    }

    #[tokio::test]
    async fn test_upsert_bumps_change_signal() {
        let store = MemoryGamesStore::new();
        let mut changes = store.changes();
        store.upsert(&[game(1, "Any", None)]).await.unwrap();
        assert!(changes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_search_orders_rated_first() {
        let store = MemoryGamesStore::new();
        store
            .upsert(&[
                game(3, "Halo 3", None),
                game(2, "Halo 2", Some(70.0)),
                game(1, "Halo", Some(90.0)),
                game(4, "Doom", Some(99.0)),
            ])
            .await
            .unwrap();

        let results = store.search_games("  HALO ", Pagination::default()).await.unwrap();
        assert_eq!(results.iter().map(|g| g.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(store.search_games("   ", Pagination::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_games_respects_ids_and_window() {
        let store = MemoryGamesStore::new();
        store
            .upsert(&(1..=5).map(|id| game(id, "G", None)).collect::<Vec<_>>())
            .await
            .unwrap();

        let page = store
            .get_games(&[5, 4, 2, 9], Pagination::new(1, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(page.iter().map(|g| g.id).collect::<Vec<_>>(), vec![4, 5]);
    }

    #[tokio::test]
    async fn test_liked_games_newest_first() {
        let games = Arc::new(MemoryGamesStore::new());
        games
            .upsert(&[game(1, "A", None), game(2, "B", None)])
            .await
            .unwrap();
        let clock = Arc::new(ManualClock::new(1_000));
        let likes = MemoryLikedGamesStore::new(games, clock.clone());

        likes.like_game(1).await.unwrap();
        clock.advance(Duration::from_secs(1));
        likes.like_game(2).await.unwrap();
        // Liked but not stored locally
        likes.like_game(3).await.unwrap();

        let liked = likes.liked_games(Pagination::default()).await.unwrap();
        assert_eq!(liked.iter().map(|g| g.id).collect::<Vec<_>>(), vec![2, 1]);

        likes.unlike_game(2).await.unwrap();
        assert!(!likes.is_game_liked(2).await.unwrap());
        assert!(likes.is_game_liked(1).await.unwrap());
    }
}
