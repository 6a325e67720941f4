//! Release date windows for the discovery lists
//!
//! All bounds are unix seconds, matching `Game::release_date`.

use crate::clock::Clock;
use crate::domain::{DiscoveryCategory, Game};
use std::cmp::Ordering;
use std::sync::Arc;

const DAY_SECS: i64 = 24 * 60 * 60;
const POPULAR_WINDOW_DAYS: i64 = 90;
const RECENTLY_RELEASED_WINDOW_DAYS: i64 = 30;

/// Local query for one discovery category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryFilter {
    /// Rated by users and released after `min_release_date`, best total rating first
    Popular { min_release_date: i64 },
    /// Released strictly inside the window, newest first
    RecentlyReleased {
        min_release_date: i64,
        max_release_date: i64,
    },
    /// Releasing after `min_release_date`, soonest first
    ComingSoon { min_release_date: i64 },
    /// Releasing after `min_release_date` with a hype count, most hyped first
    MostAnticipated { min_release_date: i64 },
}

impl DiscoveryFilter {
    pub fn matches(&self, game: &Game) -> bool {
        let Some(release_date) = game.release_date else {
            return false;
        };

        match *self {
            Self::Popular { min_release_date } => {
                game.users_rating.is_some() && release_date > min_release_date
            }
            Self::RecentlyReleased {
                min_release_date,
                max_release_date,
            } => release_date > min_release_date && release_date < max_release_date,
            Self::ComingSoon { min_release_date } => release_date > min_release_date,
            Self::MostAnticipated { min_release_date } => {
                game.hype_count.is_some() && release_date > min_release_date
            }
        }
    }

    /// Order matching games the way the SQL store does; ties break on id
    pub fn compare(&self, a: &Game, b: &Game) -> Ordering {
        let primary = match self {
            Self::Popular { .. } => desc_nulls_last(a.total_rating, b.total_rating),
            Self::RecentlyReleased { .. } => desc_nulls_last(a.release_date, b.release_date),
            Self::ComingSoon { .. } => a.release_date.cmp(&b.release_date),
            Self::MostAnticipated { .. } => desc_nulls_last(a.hype_count, b.hype_count),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

fn desc_nulls_last<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Computes discovery windows from the injected clock
#[derive(Clone)]
pub struct ReleaseDatesProvider {
    clock: Arc<dyn Clock>,
}

impl ReleaseDatesProvider {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn popular_games_min_release_date(&self) -> i64 {
        self.clock.now_secs() - POPULAR_WINDOW_DAYS * DAY_SECS
    }

    pub fn recently_released_games_min_release_date(&self) -> i64 {
        self.clock.now_secs() - RECENTLY_RELEASED_WINDOW_DAYS * DAY_SECS
    }

    pub fn recently_released_games_max_release_date(&self) -> i64 {
        self.clock.now_secs()
    }

    pub fn coming_soon_games_min_release_date(&self) -> i64 {
        self.clock.now_secs()
    }

    pub fn most_anticipated_games_min_release_date(&self) -> i64 {
        self.clock.now_secs()
    }

    pub fn filter_for(&self, category: DiscoveryCategory) -> DiscoveryFilter {
        match category {
            DiscoveryCategory::Popular => DiscoveryFilter::Popular {
                min_release_date: self.popular_games_min_release_date(),
            },
            DiscoveryCategory::RecentlyReleased => DiscoveryFilter::RecentlyReleased {
                min_release_date: self.recently_released_games_min_release_date(),
                max_release_date: self.recently_released_games_max_release_date(),
            },
            DiscoveryCategory::ComingSoon => DiscoveryFilter::ComingSoon {
                min_release_date: self.coming_soon_games_min_release_date(),
            },
            DiscoveryCategory::MostAnticipated => DiscoveryFilter::MostAnticipated {
                min_release_date: self.most_anticipated_games_min_release_date(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const NOW_SECS: i64 = 1_700_000_000;

    fn provider() -> ReleaseDatesProvider {
        ReleaseDatesProvider::new(Arc::new(ManualClock::new(NOW_SECS as u64 * 1000)))
    }

    fn game(id: i64, release_date: Option<i64>) -> Game {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "follower_count": null,
            "hype_count": null,
            "release_date": release_date,
            "critics_rating": null,
            "users_rating": null,
            "total_rating": null,
            "name": format!("Game {id}"),
            "summary": null,
            "storyline": null,
            "cover": null
        }))
        .unwrap()
    }

    #[test]
    fn test_windows_are_relative_to_now() {
        let provider = provider();
        assert_eq!(provider.popular_games_min_release_date(), NOW_SECS - 90 * DAY_SECS);
        assert_eq!(
            provider.recently_released_games_min_release_date(),
            NOW_SECS - 30 * DAY_SECS
        );
        assert_eq!(provider.coming_soon_games_min_release_date(), NOW_SECS);
    }

    #[test]
    fn test_recently_released_excludes_future_and_old_games() {
        let filter = provider().filter_for(DiscoveryCategory::RecentlyReleased);
        assert!(filter.matches(&game(1, Some(NOW_SECS - DAY_SECS))));
        assert!(!filter.matches(&game(2, Some(NOW_SECS + DAY_SECS))));
        assert!(!filter.matches(&game(3, Some(NOW_SECS - 31 * DAY_SECS))));
        assert!(!filter.matches(&game(4, None)));
    }

    #[test]
    fn test_popular_requires_users_rating() {
        let filter = provider().filter_for(DiscoveryCategory::Popular);
        let unrated = game(1, Some(NOW_SECS - DAY_SECS));
        let rated = Game {
            users_rating: Some(80.0),
            ..unrated.clone()
        };
        assert!(!filter.matches(&unrated));
        assert!(filter.matches(&rated));
    }

    #[test]
    fn test_most_anticipated_orders_by_hype() {
        let filter = provider().filter_for(DiscoveryCategory::MostAnticipated);
        let mut games = vec![
            Game {
                hype_count: Some(3),
                ..game(1, Some(NOW_SECS + DAY_SECS))
            },
            Game {
                hype_count: Some(9),
                ..game(2, Some(NOW_SECS + DAY_SECS))
            },
        ];
        games.sort_by(|a, b| filter.compare(a, b));
        assert_eq!(games.iter().map(|g| g.id).collect::<Vec<_>>(), vec![2, 1]);
    }
}
