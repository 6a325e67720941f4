mod formatters;

pub use formatters::{JsonFormatter, TextFormatter};

use crate::error::{CliError, CliResult};
use anyhow::Result;
use gamedge_core::usecases::{GameInfo, RefreshAllReport};
use gamedge_core::{Article, CacheKey, DiscoveryCategory, Game};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    const NAMES: [&'static str; 2] = ["text", "json"];

    /// Parse output format from string
    pub fn from_string(s: &str) -> CliResult<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(CliError::unknown_value("output format", s, &Self::NAMES)),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format one page of games
    fn format_games(&self, games: &[Game]) -> Result<String>;

    /// Format discovery pages, one per category
    fn format_discovery(&self, pages: &[(DiscoveryCategory, Vec<Game>)]) -> Result<String>;

    /// Format the game detail view
    fn format_game_info(&self, info: &GameInfo) -> Result<String>;

    fn format_articles(&self, articles: &[Article]) -> Result<String>;

    /// Format stored refresh timestamps relative to `now_millis`
    fn format_throttle_entries(&self, entries: &[(CacheKey, u64)], now_millis: u64)
    -> Result<String>;

    fn format_refresh_report(&self, report: &RefreshAllReport) -> Result<String>;
}

/// Create a formatter based on output format
pub fn create_formatter(format: OutputFormat, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
