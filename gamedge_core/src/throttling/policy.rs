//! Refresh timeouts

use serde::{Deserialize, Serialize};
use std::time::Duration;

const MINUTE: u64 = 60;
const DAY: u64 = 24 * 60 * MINUTE;

/// How long a refreshed bucket stays fresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshPolicy {
    timeout: Duration,
}

impl RefreshPolicy {
    pub const DISCOVERY: Self = Self::from_secs(10 * MINUTE);
    pub const COMPANY_DEVELOPED_GAMES: Self = Self::from_secs(7 * DAY);
    pub const SIMILAR_GAMES: Self = Self::from_secs(7 * DAY);
    pub const ARTICLES: Self = Self::from_secs(10 * MINUTE);

    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn timeout_millis(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Policy per call site, overridable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshPolicies {
    pub discovery_timeout_secs: u64,
    pub company_developed_timeout_secs: u64,
    pub similar_timeout_secs: u64,
    pub articles_timeout_secs: u64,
}

impl Default for RefreshPolicies {
    fn default() -> Self {
        Self {
            discovery_timeout_secs: RefreshPolicy::DISCOVERY.timeout().as_secs(),
            company_developed_timeout_secs: RefreshPolicy::COMPANY_DEVELOPED_GAMES
                .timeout()
                .as_secs(),
            similar_timeout_secs: RefreshPolicy::SIMILAR_GAMES.timeout().as_secs(),
            articles_timeout_secs: RefreshPolicy::ARTICLES.timeout().as_secs(),
        }
    }
}

impl RefreshPolicies {
    pub fn discovery(&self) -> RefreshPolicy {
        RefreshPolicy::from_secs(self.discovery_timeout_secs)
    }

    pub fn company_developed_games(&self) -> RefreshPolicy {
        RefreshPolicy::from_secs(self.company_developed_timeout_secs)
    }

    pub fn similar_games(&self) -> RefreshPolicy {
        RefreshPolicy::from_secs(self.similar_timeout_secs)
    }

    pub fn articles(&self) -> RefreshPolicy {
        RefreshPolicy::from_secs(self.articles_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let policies = RefreshPolicies::default();
        assert_eq!(policies.discovery().timeout(), Duration::from_secs(600));
        assert_eq!(
            policies.company_developed_games().timeout(),
            Duration::from_secs(7 * 24 * 3600)
        );
        assert_eq!(policies.similar_games(), RefreshPolicy::SIMILAR_GAMES);
        assert_eq!(policies.articles().timeout_millis(), 600_000);
    }
}
