use super::OutputFormatter;
use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::*;
use gamedge_core::usecases::{CategoryOutcome, GameInfo, RefreshAllReport};
use gamedge_core::{Article, CacheKey, DiscoveryCategory, Game};
use serde_json::{Value, json};

fn release_date(game: &Game) -> String {
    game.release_date
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "TBA".to_string())
}

fn timestamp_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|date| date.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// Compact human duration such as `4m 10s` or `3d 2h`
fn format_age(millis: u64) -> String {
    let secs = millis / 1000;
    match secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3600 => format!("{}m {}s", s / 60, s % 60),
        s if s < 86_400 => format!("{}h {}m", s / 3600, (s % 3600) / 60),
        s => format!("{}d {}h", s / 86_400, (s % 86_400) / 3600),
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn colorize(&self, text: &str, color: fn(&str) -> ColoredString) -> String {
        if self.use_color {
            color(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn game_line(&self, game: &Game) -> String {
        let rating = game
            .total_rating
            .map(|rating| format!("  {rating:.0}/100"))
            .unwrap_or_default();
        format!(
            "{:>8}  {}  ({}){}\n",
            self.colorize(&game.id.to_string(), |s| s.cyan()),
            game.name,
            release_date(game),
            rating
        )
    }

    fn games_block(&self, games: &[Game]) -> String {
        if games.is_empty() {
            return "  (none)\n".to_string();
        }
        games.iter().map(|game| self.game_line(game)).collect()
    }
}

impl OutputFormatter for TextFormatter {
    fn format_games(&self, games: &[Game]) -> Result<String> {
        Ok(self.games_block(games))
    }

    fn format_discovery(&self, pages: &[(DiscoveryCategory, Vec<Game>)]) -> Result<String> {
        let mut output = String::new();
        for (category, games) in pages {
            output.push_str(&format!(
                "[{}]\n",
                self.colorize(category.as_str(), |s| s.yellow())
            ));
            output.push_str(&self.games_block(games));
            output.push('\n');
        }
        Ok(output)
    }

    fn format_game_info(&self, info: &GameInfo) -> Result<String> {
        let game = &info.game;
        let mut output = String::new();

        output.push_str(&format!(
            "{} ({})\n",
            self.colorize(&game.name, |s| s.bold()),
            game.id
        ));
        output.push_str(&format!("Released: {}\n", release_date(game)));
        if let Some(rating) = game.total_rating {
            output.push_str(&format!("Rating: {rating:.1}\n"));
        }
        if let Some(company) = game.developer_company() {
            output.push_str(&format!("Developer: {}\n", company.name));
        }
        output.push_str(&format!(
            "Liked: {}\n",
            if info.is_liked { "yes" } else { "no" }
        ));
        if let Some(summary) = &game.summary {
            output.push_str(&format!("\n{summary}\n"));
        }

        if !info.company_games.is_empty() {
            output.push_str(&format!(
                "\n{}\n",
                self.colorize("More from the developer:", |s| s.yellow())
            ));
            output.push_str(&self.games_block(&info.company_games));
        }
        if !info.similar_games.is_empty() {
            output.push_str(&format!(
                "\n{}\n",
                self.colorize("Similar games:", |s| s.yellow())
            ));
            output.push_str(&self.games_block(&info.similar_games));
        }

        Ok(output)
    }

    fn format_articles(&self, articles: &[Article]) -> Result<String> {
        if articles.is_empty() {
            return Ok("No articles available.\n".to_string());
        }

        let mut output = String::new();
        for article in articles {
            output.push_str(&format!(
                "{}  {}\n",
                self.colorize(&timestamp_millis(article.publication_date), |s| s.dimmed()),
                self.colorize(&article.title, |s| s.bold())
            ));
            if !article.lede.is_empty() {
                output.push_str(&format!("  {}\n", article.lede));
            }
            output.push_str(&format!("  {}\n", article.site_detail_url));
        }
        Ok(output)
    }

    fn format_throttle_entries(
        &self,
        entries: &[(CacheKey, u64)],
        now_millis: u64,
    ) -> Result<String> {
        if entries.is_empty() {
            return Ok("No refreshes recorded.\n".to_string());
        }

        let mut output = String::new();
        for (key, refreshed_at) in entries {
            output.push_str(&format!(
                "{}\n  refreshed {} ({} ago)\n",
                self.colorize(key.as_str(), |s| s.cyan()),
                timestamp_millis(i64::try_from(*refreshed_at).unwrap_or(i64::MAX)),
                format_age(now_millis.saturating_sub(*refreshed_at))
            ));
        }
        Ok(output)
    }

    fn format_refresh_report(&self, report: &RefreshAllReport) -> Result<String> {
        let mut output = String::new();
        for category in &report.categories {
            let status = match &category.outcome {
                CategoryOutcome::Refreshed(games) => {
                    self.colorize(&format!("refreshed {} games", games.len()), |s| s.green())
                }
                CategoryOutcome::Skipped => self.colorize("skipped (fresh)", |s| s.dimmed()),
                CategoryOutcome::Failed(e) => {
                    self.colorize(&format!("failed: {}", e.user_message()), |s| s.red())
                }
            };
            output.push_str(&format!("{:<18} {status}\n", category.category.as_str()));
        }
        Ok(output)
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, value: &Value) -> Result<String> {
        let mut output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        output.push('\n');
        Ok(output)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_games(&self, games: &[Game]) -> Result<String> {
        self.render(&serde_json::to_value(games)?)
    }

    fn format_discovery(&self, pages: &[(DiscoveryCategory, Vec<Game>)]) -> Result<String> {
        let mut object = serde_json::Map::new();
        for (category, games) in pages {
            object.insert(category.as_str().to_string(), serde_json::to_value(games)?);
        }
        self.render(&Value::Object(object))
    }

    fn format_game_info(&self, info: &GameInfo) -> Result<String> {
        self.render(&json!({
            "game": info.game,
            "is_liked": info.is_liked,
            "company_games": info.company_games,
            "similar_games": info.similar_games,
        }))
    }

    fn format_articles(&self, articles: &[Article]) -> Result<String> {
        self.render(&serde_json::to_value(articles)?)
    }

    fn format_throttle_entries(
        &self,
        entries: &[(CacheKey, u64)],
        now_millis: u64,
    ) -> Result<String> {
        let entries: Vec<Value> = entries
            .iter()
            .map(|(key, refreshed_at)| {
                json!({
                    "key": key.as_str(),
                    "refreshed_at_ms": refreshed_at,
                    "age_ms": now_millis.saturating_sub(*refreshed_at),
                })
            })
            .collect();
        self.render(&Value::Array(entries))
    }

    fn format_refresh_report(&self, report: &RefreshAllReport) -> Result<String> {
        let categories: Vec<Value> = report
            .categories
            .iter()
            .map(|category| {
                let name = category.category.as_str();
                match &category.outcome {
                    CategoryOutcome::Refreshed(games) => json!({
                        "category": name,
                        "outcome": "refreshed",
                        "games": games.len(),
                    }),
                    CategoryOutcome::Skipped => json!({
                        "category": name,
                        "outcome": "skipped",
                    }),
                    CategoryOutcome::Failed(e) => json!({
                        "category": name,
                        "outcome": "failed",
                        "error": e.to_string(),
                    }),
                }
            })
            .collect();
        self.render(&Value::Array(categories))
    }
}
