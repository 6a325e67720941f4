//! Liked games repository implementation

use crate::Result;
use crate::clock::Clock;
use crate::data::{ChangeNotifier, LikedGamesLocalDataStore};
use crate::domain::{Game, Pagination};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use tokio::sync::watch;

use super::decode_payloads;

/// Repository for like records, joined against the games table on read
pub struct SqliteLikedGamesRepository {
    pool: SqlitePool,
    notifier: ChangeNotifier,
    clock: Arc<dyn Clock>,
}

impl SqliteLikedGamesRepository {
    pub fn new(pool: SqlitePool, notifier: ChangeNotifier, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            notifier,
            clock,
        }
    }
}

#[async_trait]
impl LikedGamesLocalDataStore for SqliteLikedGamesRepository {
    async fn like_game(&self, game_id: i64) -> Result<()> {
        let liked_at = i64::try_from(self.clock.now_millis()).unwrap_or(i64::MAX);
        sqlx::query(
            r#"
            INSERT INTO liked_games (game_id, like_timestamp)
            VALUES (?, ?)
            ON CONFLICT(game_id) DO UPDATE SET like_timestamp = excluded.like_timestamp
            "#,
        )
        .bind(game_id)
        .bind(liked_at)
        .execute(&self.pool)
        .await?;

        self.notifier.notify();
        Ok(())
    }

    async fn unlike_game(&self, game_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM liked_games WHERE game_id = ?")
            .bind(game_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            self.notifier.notify();
        }
        Ok(())
    }

    async fn is_game_liked(&self, game_id: i64) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM liked_games WHERE game_id = ?) as liked",
        )
        .bind(game_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("liked")?)
    }

    async fn liked_games(&self, pagination: Pagination) -> Result<Vec<Game>> {
        let rows = sqlx::query(
            r#"
            SELECT g.payload FROM liked_games l
            INNER JOIN games g ON g.id = l.game_id
            ORDER BY l.like_timestamp DESC, l.game_id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(i64::from(pagination.limit()))
        .bind(i64::from(pagination.offset()))
        .fetch_all(&self.pool)
        .await?;

        decode_payloads(rows)
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }
}
