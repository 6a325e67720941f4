//! Centralized path management for the gamedge CLI
//!
//! Every command resolves the database, throttle timestamps and config file
//! through these helpers so they always agree on one data directory.

use std::path::PathBuf;

/// The name of the application data directory used across all platforms
const APP_DATA_DIR: &str = "gamedge";

/// The name of the throttle timestamp subdirectory
const THROTTLE_SUBDIR: &str = "throttle";

/// The name of the database file
const DATABASE_FILE: &str = "gamedge.db";

/// Returns the base data directory for the application
///
/// - Linux: `~/.local/share/gamedge`
/// - macOS: `~/Library/Application Support/gamedge`
/// - Windows: `%APPDATA%/gamedge`
///
/// Falls back to `.gamedge` in the current directory.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(".gamedge"))
}

/// Returns the path to the SQLite catalog database
pub fn get_database_path() -> PathBuf {
    get_data_dir().join(DATABASE_FILE)
}

/// Returns the directory holding the file-backed refresh timestamps
pub fn get_throttle_dir() -> PathBuf {
    get_data_dir().join(THROTTLE_SUBDIR)
}

/// Returns the configuration directory
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(".gamedge"))
}
