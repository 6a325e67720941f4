//! SQLite repositories backing the local store contracts
//!
//! Games and articles are stored as JSON payloads alongside the columns the
//! queries filter and order on.

pub mod articles;
pub mod games;
pub mod liked_games;
pub mod refresh_times;

use crate::Result;
use serde::de::DeserializeOwned;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

pub use articles::SqliteArticlesRepository;
pub use games::SqliteGamesRepository;
pub use liked_games::SqliteLikedGamesRepository;
pub use refresh_times::SqliteTimestampStore;

/// Decode the `payload` column of each row
fn decode_payloads<T: DeserializeOwned>(rows: Vec<SqliteRow>) -> Result<Vec<T>> {
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let payload: String = row.try_get("payload")?;
        items.push(serde_json::from_str(&payload)?);
    }
    Ok(items)
}
