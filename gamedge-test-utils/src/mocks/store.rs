//! Local stores that refuse writes

use async_trait::async_trait;
use gamedge_core::data::Upsert;
use gamedge_core::domain::Game;
use gamedge_core::error::StorageError;
use gamedge_core::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Game store whose every upsert fails with a storage error
#[derive(Clone, Default)]
pub struct FailingGamesStore {
    attempts: Arc<AtomicUsize>,
}

impl FailingGamesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of upserts attempted so far
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Upsert<Game> for FailingGamesStore {
    async fn upsert(&self, _items: &[Game]) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::Storage(StorageError::database("disk I/O error")))
    }
}
