//! Liked games

use crate::Result;
use crate::data::{GamesLocalDataStore, LikedGamesLocalDataStore, observe};
use crate::domain::{Game, Pagination};
use futures::stream::BoxStream;
use std::sync::Arc;

pub struct LikeGameUseCase {
    likes: Arc<dyn LikedGamesLocalDataStore>,
}

impl LikeGameUseCase {
    pub fn new(likes: Arc<dyn LikedGamesLocalDataStore>) -> Self {
        Self { likes }
    }

    pub async fn execute(&self, game_id: i64) -> Result<()> {
        self.likes.like_game(game_id).await
    }
}

pub struct UnlikeGameUseCase {
    likes: Arc<dyn LikedGamesLocalDataStore>,
}

impl UnlikeGameUseCase {
    pub fn new(likes: Arc<dyn LikedGamesLocalDataStore>) -> Self {
        Self { likes }
    }

    pub async fn execute(&self, game_id: i64) -> Result<()> {
        self.likes.unlike_game(game_id).await
    }
}

pub struct ToggleGameLikeStateUseCase {
    likes: Arc<dyn LikedGamesLocalDataStore>,
}

impl ToggleGameLikeStateUseCase {
    pub fn new(likes: Arc<dyn LikedGamesLocalDataStore>) -> Self {
        Self { likes }
    }

    /// Returns the new like state
    pub async fn execute(&self, game_id: i64) -> Result<bool> {
        if self.likes.is_game_liked(game_id).await? {
            self.likes.unlike_game(game_id).await?;
            Ok(false)
        } else {
            self.likes.like_game(game_id).await?;
            Ok(true)
        }
    }
}

pub struct ObserveGameLikeStateUseCase {
    likes: Arc<dyn LikedGamesLocalDataStore>,
}

impl ObserveGameLikeStateUseCase {
    pub fn new(likes: Arc<dyn LikedGamesLocalDataStore>) -> Self {
        Self { likes }
    }

    pub fn execute(&self, game_id: i64) -> BoxStream<'static, Result<bool>> {
        let likes = self.likes.clone();
        observe(vec![likes.changes()], move || {
            let likes = likes.clone();
            async move { likes.is_game_liked(game_id).await }
        })
    }
}

/// Liked games, re-emitted when likes or the stored games change
pub struct ObserveLikedGamesUseCase {
    likes: Arc<dyn LikedGamesLocalDataStore>,
    games: Arc<dyn GamesLocalDataStore>,
}

impl ObserveLikedGamesUseCase {
    pub fn new(
        likes: Arc<dyn LikedGamesLocalDataStore>,
        games: Arc<dyn GamesLocalDataStore>,
    ) -> Self {
        Self { likes, games }
    }

    pub fn execute(&self, pagination: Pagination) -> BoxStream<'static, Result<Vec<Game>>> {
        let likes = self.likes.clone();
        observe(vec![likes.changes(), self.games.changes()], move || {
            let likes = likes.clone();
            async move { likes.liked_games(pagination).await }
        })
    }
}
