//! Database migration system
//!
//! Migrations are applied in order inside a transaction and recorded in the
//! `schema_version` table.

use crate::error::{Error, StorageError};
use crate::Result;
use sqlx::SqlitePool;

use super::schema::SCHEMA_V1;

/// Run all necessary migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_current_version(pool).await?;

    if current_version < 1 {
        apply_migration(pool, 1, SCHEMA_V1).await?;
    }

    Ok(())
}

/// Get the current schema version from the database
pub async fn get_current_version(pool: &SqlitePool) -> Result<i32> {
    let table_exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
    )
    .fetch_one(pool)
    .await?;

    if table_exists == 0 {
        return Ok(0);
    }

    let version = sqlx::query_scalar::<_, Option<i32>>("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await?;

    Ok(version.unwrap_or(0))
}

async fn apply_migration(pool: &SqlitePool, version: i32, sql: &str) -> Result<()> {
    let migration_error = |stage: &str, e: sqlx::Error| {
        Error::Storage(StorageError::database(&format!(
            "Failed to {stage} migration {version}: {e}"
        )))
    };

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| migration_error("start", e))?;

    sqlx::raw_sql(sql)
        .execute(&mut *tx)
        .await
        .map_err(|e| migration_error("apply", e))?;

    let now = chrono::Utc::now().timestamp_millis();
    sqlx::query("INSERT INTO schema_version (version, applied_at) VALUES (?, ?)")
        .bind(version)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| migration_error("record", e))?;

    tx.commit()
        .await
        .map_err(|e| migration_error("commit", e))?;

    log::debug!("Applied database migration {version}");
    Ok(())
}
