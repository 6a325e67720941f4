//! Refresh timestamp repository

use crate::Result;
use crate::throttling::{CacheKey, TimestampStore};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

/// Last refresh time per cache key, in epoch milliseconds
pub struct SqliteTimestampStore {
    pool: SqlitePool,
}

impl SqliteTimestampStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimestampStore for SqliteTimestampStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<u64>> {
        let row = sqlx::query("SELECT refreshed_at FROM refresh_times WHERE cache_key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let refreshed_at: i64 = row.try_get("refreshed_at")?;
                Ok(Some(u64::try_from(refreshed_at).unwrap_or(0)))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &CacheKey, timestamp_ms: u64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_times (cache_key, refreshed_at)
            VALUES (?, ?)
            ON CONFLICT(cache_key) DO UPDATE SET refreshed_at = excluded.refreshed_at
            "#,
        )
        .bind(key.as_str())
        .bind(i64::try_from(timestamp_ms).unwrap_or(i64::MAX))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<(CacheKey, u64)>> {
        let rows = sqlx::query("SELECT cache_key, refreshed_at FROM refresh_times ORDER BY cache_key")
            .fetch_all(&self.pool)
            .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("cache_key")?;
            let refreshed_at: i64 = row.try_get("refreshed_at")?;
            entries.push((CacheKey::new(key), u64::try_from(refreshed_at).unwrap_or(0)));
        }
        Ok(entries)
    }
}
