//! Refresh throttling
//!
//! This module answers one question for every refreshable query: has enough
//! time passed since the last successful refresh of this bucket? It provides
//! the key derivation, timeout policies, timestamp stores and the throttler.
//! The SQLite timestamp store lives with the other repositories in
//! `crate::database`.

pub mod file_store;
pub mod key;
pub mod policy;
pub mod store;
pub mod throttler;

pub use file_store::FileTimestampStore;
pub use key::{CacheKey, DefaultKeyProvider, KeyProvider};
pub use policy::{RefreshPolicies, RefreshPolicy};
pub use store::{MemoryTimestampStore, TimestampStore};
pub use throttler::{RefreshThrottler, Throttler};
