//! Game catalog records
//!
//! Records are immutable values keyed by `id`. Stores replace them wholesale
//! on upsert.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameCategory {
    #[default]
    Unknown,
    MainGame,
    Dlc,
    Expansion,
    Bundle,
    StandaloneExpansion,
    Mod,
    Episode,
    Season,
    Remake,
    Remaster,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub abbreviation: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteCategory {
    #[default]
    Unknown,
    Official,
    Wikipedia,
    Steam,
    Gog,
    Twitter,
    Reddit,
    Youtube,
    Twitch,
    Discord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub category: WebsiteCategory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub website_url: Option<String>,
    pub logo: Option<Image>,
    #[serde(default)]
    pub developed_games: Vec<i64>,
}

impl Company {
    pub fn has_developed_games(&self) -> bool {
        !self.developed_games.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvolvedCompany {
    pub company: Company,
    pub is_developer: bool,
    pub is_publisher: bool,
    pub is_porter: bool,
    pub is_supporting: bool,
}

/// A catalog game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub follower_count: Option<u32>,
    pub hype_count: Option<u32>,
    /// Unix seconds
    pub release_date: Option<i64>,
    pub critics_rating: Option<f64>,
    pub users_rating: Option<f64>,
    pub total_rating: Option<f64>,
    pub name: String,
    pub summary: Option<String>,
    pub storyline: Option<String>,
    #[serde(default)]
    pub category: GameCategory,
    pub cover: Option<Image>,
    #[serde(default)]
    pub artworks: Vec<Image>,
    #[serde(default)]
    pub screenshots: Vec<Image>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub involved_companies: Vec<InvolvedCompany>,
    #[serde(default)]
    pub websites: Vec<Website>,
    #[serde(default)]
    pub similar_games: Vec<i64>,
}

impl Game {
    /// First involved company flagged as developer
    pub fn developer_company(&self) -> Option<&Company> {
        self.involved_companies
            .iter()
            .find(|involved| involved.is_developer)
            .map(|involved| &involved.company)
    }

    pub fn has_similar_games(&self) -> bool {
        !self.similar_games.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(id: i64) -> Company {
        Company {
            id,
            name: format!("Company {id}"),
            website_url: None,
            logo: None,
            developed_games: vec![1, 2],
        }
    }

    fn involved(id: i64, is_developer: bool) -> InvolvedCompany {
        InvolvedCompany {
            company: company(id),
            is_developer,
            is_publisher: !is_developer,
            is_porter: false,
            is_supporting: false,
        }
    }

    #[test]
    fn test_developer_company_picks_first_developer() {
        let game: Game = serde_json::from_value(serde_json::json!({
            "id": 1,
            "follower_count": null,
            "hype_count": null,
            "release_date": null,
            "critics_rating": null,
            "users_rating": null,
            "total_rating": null,
            "name": "Hollow",
            "summary": null,
            "storyline": null,
            "cover": null
        }))
        .unwrap();
        assert!(game.developer_company().is_none());
        assert!(!game.has_similar_games());

        let game = Game {
            involved_companies: vec![involved(5, false), involved(6, true), involved(7, true)],
            ..game
        };
        assert_eq!(game.developer_company().map(|c| c.id), Some(6));
    }
}
