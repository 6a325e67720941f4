//! Domain records shared by every store and use case

pub mod article;
pub mod game;
pub mod pagination;

pub use article::Article;
pub use game::{
    Company, Game, GameCategory, Genre, Image, InvolvedCompany, Platform, Website,
    WebsiteCategory,
};
pub use pagination::{DEFAULT_PAGE_SIZE, Pagination};

/// Discovery lists shown on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiscoveryCategory {
    Popular,
    RecentlyReleased,
    ComingSoon,
    MostAnticipated,
}

impl DiscoveryCategory {
    /// All categories, in display order
    pub const ALL: [DiscoveryCategory; 4] = [
        Self::Popular,
        Self::RecentlyReleased,
        Self::ComingSoon,
        Self::MostAnticipated,
    ];

    /// Stable snake_case name used in cache keys and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::RecentlyReleased => "recently_released",
            Self::ComingSoon => "coming_soon",
            Self::MostAnticipated => "most_anticipated",
        }
    }
}

impl std::fmt::Display for DiscoveryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DiscoveryCategory {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| {
                crate::error::ValidationError::invalid_configuration(&format!(
                    "unknown discovery category '{s}'"
                ))
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in DiscoveryCategory::ALL {
            assert_eq!(category.as_str().parse::<DiscoveryCategory>().unwrap(), category);
        }
        assert_eq!(
            "Coming-Soon".parse::<DiscoveryCategory>().unwrap(),
            DiscoveryCategory::ComingSoon
        );
        assert!("trending".parse::<DiscoveryCategory>().is_err());
    }
}
