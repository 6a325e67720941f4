//! Games repository implementation

use crate::Result;
use crate::data::local::normalize_query;
use crate::data::{ChangeNotifier, DiscoveryFilter, GamesLocalDataStore, Upsert};
use crate::domain::{Game, Pagination};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tokio::sync::watch;

use super::decode_payloads;

/// Repository for catalog games
pub struct SqliteGamesRepository {
    pool: SqlitePool,
    notifier: ChangeNotifier,
}

impl SqliteGamesRepository {
    pub fn new(pool: SqlitePool, notifier: ChangeNotifier) -> Self {
        Self { pool, notifier }
    }

    /// Count stored games
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM games")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }
}

#[async_trait]
impl Upsert<Game> for SqliteGamesRepository {
    async fn upsert(&self, items: &[Game]) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();
        let mut tx = self.pool.begin().await?;

        for game in items {
            let payload = serde_json::to_string(game)?;
            sqlx::query(
                r#"
                INSERT INTO games (id, name, hype_count, release_date, users_rating,
                                   total_rating, payload, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    hype_count = excluded.hype_count,
                    release_date = excluded.release_date,
                    users_rating = excluded.users_rating,
                    total_rating = excluded.total_rating,
                    payload = excluded.payload,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(game.id)
            .bind(&game.name)
            .bind(game.hype_count.map(i64::from))
            .bind(game.release_date)
            .bind(game.users_rating)
            .bind(game.total_rating)
            .bind(payload)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        self.notifier.notify();
        Ok(())
    }
}

#[async_trait]
impl GamesLocalDataStore for SqliteGamesRepository {
    async fn get_game(&self, id: i64) -> Result<Option<Game>> {
        let row = sqlx::query("SELECT payload FROM games WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(decode_payloads(vec![row])?.pop()),
            None => Ok(None),
        }
    }

    async fn get_games(&self, ids: &[i64], pagination: Pagination) -> Result<Vec<Game>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT payload FROM games WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id ASC LIMIT ");
        query.push_bind(i64::from(pagination.limit()));
        query.push(" OFFSET ");
        query.push_bind(i64::from(pagination.offset()));

        let rows = query.build().fetch_all(&self.pool).await?;
        decode_payloads(rows)
    }

    async fn discovery_games(
        &self,
        filter: &DiscoveryFilter,
        pagination: Pagination,
    ) -> Result<Vec<Game>> {
        let limit = i64::from(pagination.limit());
        let offset = i64::from(pagination.offset());

        let rows = match *filter {
            DiscoveryFilter::Popular { min_release_date } => {
                sqlx::query(
                    r#"
                    SELECT payload FROM games
                    WHERE users_rating IS NOT NULL AND release_date > ?
                    ORDER BY total_rating DESC, id ASC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(min_release_date)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            DiscoveryFilter::RecentlyReleased {
                min_release_date,
                max_release_date,
            } => {
                sqlx::query(
                    r#"
                    SELECT payload FROM games
                    WHERE release_date > ? AND release_date < ?
                    ORDER BY release_date DESC, id ASC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(min_release_date)
                .bind(max_release_date)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            DiscoveryFilter::ComingSoon { min_release_date } => {
                sqlx::query(
                    r#"
                    SELECT payload FROM games
                    WHERE release_date > ?
                    ORDER BY release_date ASC, id ASC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(min_release_date)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            DiscoveryFilter::MostAnticipated { min_release_date } => {
                sqlx::query(
                    r#"
                    SELECT payload FROM games
                    WHERE release_date > ? AND hype_count IS NOT NULL
                    ORDER BY hype_count DESC, id ASC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(min_release_date)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        decode_payloads(rows)
    }

    async fn search_games(&self, query: &str, pagination: Pagination) -> Result<Vec<Game>> {
        let Some(query) = normalize_query(query) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(
            r#"
            SELECT payload FROM games
            WHERE LOWER(name) LIKE ? ESCAPE '\'
            ORDER BY total_rating IS NULL, total_rating DESC, id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(format!("{}%", escape_like(&query)))
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

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
