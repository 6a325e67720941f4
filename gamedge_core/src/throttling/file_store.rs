//! File-backed timestamp store
//!
//! Entries are held in memory and written through to a JSON file on every
//! update, so refresh times survive process restarts.

use crate::Result;
use crate::error::{Error, StorageError};
use crate::throttling::{CacheKey, TimestampStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// File name used inside the store directory
pub const TIMESTAMPS_FILE: &str = "refresh_times.json";

/// JSON file timestamp store
pub struct FileTimestampStore {
    path: PathBuf,
    entries: RwLock<HashMap<CacheKey, u64>>,
}

impl FileTimestampStore {
    /// Open or create the store in `dir`
    pub fn new(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| Error::Storage(StorageError::io(&e.to_string(), Some(dir))))?;
        }

        let path = dir.join(TIMESTAMPS_FILE);
        let entries = match Self::load_from_disk(&path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring unreadable refresh times at {}: {e}", path.display());
                HashMap::new()
            }
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> Result<HashMap<CacheKey, u64>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Storage(StorageError::io(&e.to_string(), Some(path))))?;
        let entries: Vec<(CacheKey, u64)> = serde_json::from_str(&data)?;

        Ok(entries.into_iter().collect())
    }

    async fn save_to_disk(&self, entries: &HashMap<CacheKey, u64>) -> Result<()> {
        let mut sorted: Vec<(&CacheKey, &u64)> = entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let data = serde_json::to_string_pretty(&sorted)?;

        // Write a sibling file, then rename it over the store
        let tmp_path = self.path.with_extension("json.tmp");
        let io_error =
            |e: std::io::Error| Error::Storage(StorageError::io(&e.to_string(), Some(&self.path)));

        let mut file = fs::File::create(&tmp_path).await.map_err(io_error)?;
        file.write_all(data.as_bytes()).await.map_err(io_error)?;
        file.flush().await.map_err(io_error)?;
        drop(file);

        fs::rename(&tmp_path, &self.path).await.map_err(io_error)?;
        Ok(())
    }
}

#[async_trait]
impl TimestampStore for FileTimestampStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<u64>> {
        Ok(self.entries.read().await.get(key).copied())
    }

    async fn put(&self, key: &CacheKey, millis: u64) -> Result<()> {
        let mut entries = self.entries.write().await;
        let mut updated = entries.clone();
        updated.insert(key.clone(), millis);

        // Memory only changes once the file holds the new value
        self.save_to_disk(&updated).await?;
        *entries = updated;
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<(CacheKey, u64)>> {
        let mut entries: Vec<_> = self
            .entries
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}
