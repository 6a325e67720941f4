//! Builders for catalog records

use gamedge_core::domain::{Article, Company, Game, GameCategory, Image, InvolvedCompany};

/// Builder for [`Game`] records
///
/// Every optional field starts empty so tests only spell out what they
/// assert on.
///
/// # Examples
///
/// ```rust
/// use gamedge_test_utils::GameBuilder;
///
/// let game = GameBuilder::new(7)
///     .name("Outer Wilds")
///     .release_date(1_559_088_000)
///     .total_rating(91.5)
///     .build();
///
/// assert_eq!(game.id, 7);
/// assert_eq!(game.name, "Outer Wilds");
/// ```
#[derive(Debug, Clone)]
pub struct GameBuilder {
    game: Game,
}

impl GameBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            game: Game {
                id,
                follower_count: None,
                hype_count: None,
                release_date: None,
                critics_rating: None,
                users_rating: None,
                total_rating: None,
                name: format!("Game {id}"),
                summary: None,
                storyline: None,
                category: GameCategory::MainGame,
                cover: None,
                artworks: Vec::new(),
                screenshots: Vec::new(),
                genres: Vec::new(),
                platforms: Vec::new(),
                involved_companies: Vec::new(),
                websites: Vec::new(),
                similar_games: Vec::new(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.game.name = name.to_string();
        self
    }

    /// Release date in epoch seconds
    pub fn release_date(mut self, secs: i64) -> Self {
        self.game.release_date = Some(secs);
        self
    }

    pub fn hype_count(mut self, hype: u32) -> Self {
        self.game.hype_count = Some(hype);
        self
    }

    pub fn follower_count(mut self, followers: u32) -> Self {
        self.game.follower_count = Some(followers);
        self
    }

    pub fn users_rating(mut self, rating: f64) -> Self {
        self.game.users_rating = Some(rating);
        self
    }

    pub fn total_rating(mut self, rating: f64) -> Self {
        self.game.total_rating = Some(rating);
        self
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.game.summary = Some(summary.to_string());
        self
    }

    pub fn cover(mut self, image_id: &str) -> Self {
        self.game.cover = Some(Image {
            id: image_id.to_string(),
            width: None,
            height: None,
        });
        self
    }

    pub fn developer(mut self, company: Company) -> Self {
        self.game.involved_companies.push(InvolvedCompany {
            company,
            is_developer: true,
            is_publisher: false,
            is_porter: false,
            is_supporting: false,
        });
        self
    }

    pub fn publisher(mut self, company: Company) -> Self {
        self.game.involved_companies.push(InvolvedCompany {
            company,
            is_developer: false,
            is_publisher: true,
            is_porter: false,
            is_supporting: false,
        });
        self
    }

    pub fn similar_games(mut self, ids: &[i64]) -> Self {
        self.game.similar_games = ids.to_vec();
        self
    }

    pub fn build(self) -> Game {
        self.game
    }
}

/// Builder for [`Company`] records
#[derive(Debug, Clone)]
pub struct CompanyBuilder {
    company: Company,
}

impl CompanyBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            company: Company {
                id,
                name: format!("Company {id}"),
                website_url: None,
                logo: None,
                developed_games: Vec::new(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.company.name = name.to_string();
        self
    }

    pub fn developed_games(mut self, ids: &[i64]) -> Self {
        self.company.developed_games = ids.to_vec();
        self
    }

    pub fn build(self) -> Company {
        self.company
    }
}

/// Builder for [`Article`] records
#[derive(Debug, Clone)]
pub struct ArticleBuilder {
    article: Article,
}

impl ArticleBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            article: Article {
                id,
                title: format!("Article {id}"),
                lede: String::new(),
                image_url: None,
                publication_date: 0,
                site_detail_url: format!("https://news.example/{id}"),
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.article.title = title.to_string();
        self
    }

    /// Publication date in epoch milliseconds
    pub fn published_at(mut self, millis: i64) -> Self {
        self.article.publication_date = millis;
        self
    }

    pub fn build(self) -> Article {
        self.article
    }
}

/// `count` games with ids starting at `first_id`
pub fn fake_games(first_id: i64, count: usize) -> Vec<Game> {
    (first_id..)
        .take(count)
        .map(|id| GameBuilder::new(id).build())
        .collect()
}

/// `count` articles with ids starting at `first_id`, newest last
pub fn fake_articles(first_id: i64, count: usize) -> Vec<Article> {
    (first_id..)
        .take(count)
        .map(|id| ArticleBuilder::new(id).published_at(id * 1_000).build())
        .collect()
}
