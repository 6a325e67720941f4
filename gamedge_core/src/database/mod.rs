//! SQLite-backed local stores
//!
//! This module provides the persistent implementations of the games, articles
//! and liked-games stores plus the refresh timestamp store. All repositories
//! share one connection pool; each store kind shares one change signal so
//! observers see writes made through any repository handle.

pub mod migrations;
pub mod repositories;
pub mod schema;

use crate::clock::Clock;
use crate::data::ChangeNotifier;
use crate::error::{Error, StorageError};
use crate::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

pub use repositories::{
    SqliteArticlesRepository, SqliteGamesRepository, SqliteLikedGamesRepository,
    SqliteTimestampStore,
};

/// Database connection manager with connection pooling
pub struct Database {
    pool: SqlitePool,
    games_changes: ChangeNotifier,
    articles_changes: ChangeNotifier,
    likes_changes: ChangeNotifier,
}

impl Database {
    /// Open or create the database at `db_path` and run migrations
    pub async fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(StorageError::io(&e.to_string(), Some(db_path))))?;
        }

        let connect_options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                Error::Storage(StorageError::database(&format!(
                    "Failed to connect to database: {e}"
                )))
            })?;

        let db = Self {
            pool,
            games_changes: ChangeNotifier::new(),
            articles_changes: ChangeNotifier::new(),
            likes_changes: ChangeNotifier::new(),
        };

        migrations::run_migrations(&db.pool).await?;
        Ok(db)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn games(&self) -> SqliteGamesRepository {
        SqliteGamesRepository::new(self.pool.clone(), self.games_changes.clone())
    }

    pub fn articles(&self) -> SqliteArticlesRepository {
        SqliteArticlesRepository::new(self.pool.clone(), self.articles_changes.clone())
    }

    pub fn liked_games(&self, clock: Arc<dyn Clock>) -> SqliteLikedGamesRepository {
        SqliteLikedGamesRepository::new(self.pool.clone(), self.likes_changes.clone(), clock)
    }

    pub fn refresh_times(&self) -> SqliteTimestampStore {
        SqliteTimestampStore::new(self.pool.clone())
    }

    /// Row counts per table
    pub async fn stats(&self) -> Result<DatabaseStats> {
        let count = |table: &'static str| {
            let pool = self.pool.clone();
            async move {
                sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(&pool)
                    .await
                    .map(|n| n as u64)
            }
        };

        Ok(DatabaseStats {
            game_count: count("games").await?,
            article_count: count("articles").await?,
            liked_game_count: count("liked_games").await?,
            refresh_key_count: count("refresh_times").await?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    pub game_count: u64,
    pub article_count: u64,
    pub liked_game_count: u64,
    pub refresh_key_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Database::new(&db_path).await.unwrap();
        (db, temp_dir)
    }

    #[tokio::test]
    async fn test_database_stats_start_empty() {
        let (db, _temp_dir) = create_test_db().await;
        assert_eq!(db.stats().await.unwrap(), DatabaseStats::default());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let (db, _temp_dir) = create_test_db().await;
        migrations::run_migrations(db.pool()).await.unwrap();
        assert_eq!(
            migrations::get_current_version(db.pool()).await.unwrap(),
            schema::CURRENT_SCHEMA_VERSION
        );
    }
}
