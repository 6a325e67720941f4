//! Articles repository implementation

use crate::Result;
use crate::data::{ArticlesLocalDataStore, ChangeNotifier, Upsert};
use crate::domain::{Article, Pagination};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::watch;

use super::decode_payloads;

/// Repository for news articles
pub struct SqliteArticlesRepository {
    pool: SqlitePool,
    notifier: ChangeNotifier,
}

impl SqliteArticlesRepository {
    pub fn new(pool: SqlitePool, notifier: ChangeNotifier) -> Self {
        Self { pool, notifier }
    }
}

#[async_trait]
impl Upsert<Article> for SqliteArticlesRepository {
    async fn upsert(&self, items: &[Article]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for article in items {
            let payload = serde_json::to_string(article)?;
            sqlx::query(
                r#"
                INSERT INTO articles (id, publication_date, payload)
                VALUES (?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    publication_date = excluded.publication_date,
                    payload = excluded.payload
                "#,
            )
            .bind(article.id)
            .bind(article.publication_date)
            .bind(payload)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        self.notifier.notify();
        Ok(())
    }
}

#[async_trait]
impl ArticlesLocalDataStore for SqliteArticlesRepository {
    async fn articles(&self, pagination: Pagination) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT payload FROM articles
            ORDER BY publication_date DESC, id ASC
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
