//! Gamedge Core Library
//!
//! Local-first game catalog with throttled remote refreshes. Local stores are
//! the source of truth for reads; remote fetches are merged into them at most
//! once per refresh policy window for each cache key.

pub mod clock;
pub mod data;
#[cfg(feature = "database")]
pub mod database;
pub mod domain;
pub mod error;
pub mod refresh;
pub mod throttling;
pub mod usecases;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use domain::{Article, Company, DiscoveryCategory, Game, Pagination};
pub use error::{Error, ErrorKind, Result};
pub use refresh::{Refresh, RefreshOrchestrator};
pub use throttling::{CacheKey, RefreshPolicies, RefreshPolicy};

#[cfg(feature = "database")]
pub use database::Database;
