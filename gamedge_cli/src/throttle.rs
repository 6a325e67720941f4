//! Timestamp store factory
//!
//! Builds the refresh-timestamp backend selected by `throttle.store`.

use crate::config::{AppConfig, ThrottleStoreKind};
use crate::paths;
use gamedge_core::Database;
use gamedge_core::Result;
use gamedge_core::throttling::{FileTimestampStore, MemoryTimestampStore, TimestampStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for the different timestamp store types
#[derive(Clone)]
pub enum TimestampStoreConfig {
    /// JSON file in a directory
    File { directory: PathBuf },
    /// `refresh_times` table of the shared database
    Sqlite { database: Arc<Database> },
    /// Process-local; every run starts unthrottled
    Memory,
}

impl TimestampStoreConfig {
    /// Pick the store from configuration; `database` is required for `sqlite`
    pub fn from_app_config(config: &AppConfig, database: Option<Arc<Database>>) -> Self {
        match (config.throttle.store, database) {
            (ThrottleStoreKind::Sqlite, Some(database)) => Self::Sqlite { database },
            (ThrottleStoreKind::Sqlite, None) | (ThrottleStoreKind::File, _) => Self::File {
                directory: config
                    .throttle
                    .directory
                    .clone()
                    .unwrap_or_else(paths::get_throttle_dir),
            },
            (ThrottleStoreKind::Memory, _) => Self::Memory,
        }
    }
}

/// Factory for timestamp store implementations
pub struct TimestampStoreFactory;

impl TimestampStoreFactory {
    /// Create a store based on configuration
    pub fn create(config: TimestampStoreConfig) -> Result<Arc<dyn TimestampStore>> {
        match config {
            TimestampStoreConfig::File { directory } => {
                log::debug!("Using file timestamp store in {}", directory.display());
                Ok(Arc::new(FileTimestampStore::new(&directory)?))
            }
            TimestampStoreConfig::Sqlite { database } => {
                log::debug!("Using sqlite timestamp store");
                Ok(Arc::new(database.refresh_times()))
            }
            TimestampStoreConfig::Memory => {
                log::debug!("Using in-memory timestamp store");
                Ok(Arc::new(MemoryTimestampStore::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamedge_core::throttling::CacheKey;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_persists_between_factories() {
        let temp_dir = TempDir::new().unwrap();
        let config = TimestampStoreConfig::File {
            directory: temp_dir.path().to_path_buf(),
        };
        let key = CacheKey::from("articles|offset:0|limit:20");

        let store = TimestampStoreFactory::create(config.clone()).unwrap();
        store.put(&key, 42).await.unwrap();

        let reopened = TimestampStoreFactory::create(config).unwrap();
        assert_eq!(reopened.get(&key).await.unwrap(), Some(42));
    }

    #[test]
    fn test_sqlite_without_database_falls_back_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.throttle.directory = Some(temp_dir.path().to_path_buf());

        match TimestampStoreConfig::from_app_config(&config, None) {
            TimestampStoreConfig::File { directory } => assert_eq!(directory, temp_dir.path()),
            _ => panic!("expected file store"),
        }
    }

    #[tokio::test]
    async fn test_memory_store_starts_empty() {
        let store = TimestampStoreFactory::create(TimestampStoreConfig::Memory).unwrap();
        assert!(store.entries().await.unwrap().is_empty());
    }
}
