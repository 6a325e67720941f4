//! Database schema definitions
//!
//! Games and articles keep the columns used for filtering and ordering next to
//! a JSON `payload` holding the full record.

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Initial schema creation SQL
pub const SCHEMA_V1: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

-- Catalog games
CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    hype_count INTEGER,
    release_date INTEGER,
    users_rating REAL,
    total_rating REAL,
    payload TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_games_hype_count ON games(hype_count);
CREATE INDEX IF NOT EXISTS idx_games_release_date ON games(release_date);
CREATE INDEX IF NOT EXISTS idx_games_users_rating ON games(users_rating);
CREATE INDEX IF NOT EXISTS idx_games_total_rating ON games(total_rating);
CREATE INDEX IF NOT EXISTS idx_games_name ON games(name);

-- News articles
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY,
    publication_date INTEGER NOT NULL,
    payload TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_articles_publication_date ON articles(publication_date);

-- Liked games
CREATE TABLE IF NOT EXISTS liked_games (
    game_id INTEGER PRIMARY KEY,
    like_timestamp INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_liked_games_like_timestamp ON liked_games(like_timestamp);

-- Last successful refresh per cache key
CREATE TABLE IF NOT EXISTS refresh_times (
    cache_key TEXT PRIMARY KEY,
    refreshed_at INTEGER NOT NULL
);
"#;
