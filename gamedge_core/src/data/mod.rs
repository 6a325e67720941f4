//! Data sources: remote contracts, local store contracts and helpers

pub mod local;
pub mod memory;
pub mod observe;
pub mod release_dates;
pub mod remote;

pub use local::{ArticlesLocalDataStore, GamesLocalDataStore, LikedGamesLocalDataStore, Upsert};
pub use memory::{MemoryArticlesStore, MemoryGamesStore, MemoryLikedGamesStore};
pub use observe::{ChangeNotifier, observe};
pub use release_dates::{DiscoveryFilter, ReleaseDatesProvider};
pub use remote::{ArticlesRemoteDataStore, GamesRemoteDataStore, NetworkState, StaticNetworkState};
