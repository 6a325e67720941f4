//! Mock implementations for testing

mod network;
mod remote;
mod store;
mod throttler;

pub use network::MockNetworkState;
pub use remote::{MockArticlesRemote, MockGamesRemote};
pub use store::FailingGamesStore;
pub use throttler::MockThrottler;
