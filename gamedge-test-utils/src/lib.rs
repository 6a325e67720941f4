//! Test utilities for the Gamedge catalog core
//!
//! This crate provides scripted mock remotes, a recording throttler, a game
//! store that refuses writes, and builders for catalog records.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::{ArticleBuilder, CompanyBuilder, GameBuilder, fake_articles, fake_games};
pub use mocks::{
    FailingGamesStore, MockArticlesRemote, MockGamesRemote, MockNetworkState, MockThrottler,
};
