//! Game search

use crate::Result;
use crate::data::{GamesLocalDataStore, GamesRemoteDataStore, NetworkState, Upsert};
use crate::domain::{Game, Pagination};
use log::debug;
use std::sync::Arc;

/// Search the remote when online, the local store otherwise
///
/// The remote gets the trimmed query as typed; local stores match it
/// case-insensitively. Remote results are saved locally so later offline
/// searches can find them.
pub struct SearchGamesUseCase {
    remote: Arc<dyn GamesRemoteDataStore>,
    local: Arc<dyn GamesLocalDataStore>,
    network: Arc<dyn NetworkState>,
}

impl SearchGamesUseCase {
    pub fn new(
        remote: Arc<dyn GamesRemoteDataStore>,
        local: Arc<dyn GamesLocalDataStore>,
        network: Arc<dyn NetworkState>,
    ) -> Self {
        Self {
            remote,
            local,
            network,
        }
    }

    pub async fn execute(&self, query: &str, pagination: Pagination) -> Result<Vec<Game>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        if !self.network.is_network_available() {
            debug!("Searching local games for '{query}'");
            return self.local.search_games(query, pagination).await;
        }

        let games = self.remote.search_games(query, pagination).await?;
        self.local.upsert(&games).await?;
        Ok(games)
    }
}
