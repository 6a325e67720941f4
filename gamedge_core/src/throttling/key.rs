//! Cache key derivation
//!
//! A [`CacheKey`] names one refreshable bucket: a logical query plus its page
//! window. Keys are compact `name:value` fields joined by `|`, for example
//! `popular_games|offset:0|limit:20`. Embedded id lists are sorted and
//! deduplicated before formatting, so set-equal queries share a key.

use crate::domain::{Company, DiscoveryCategory, Game, Pagination};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a refreshable query bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Derives cache keys from logical queries
pub trait KeyProvider: Send + Sync {
    fn discovery_games_key(&self, category: DiscoveryCategory, pagination: Pagination) -> CacheKey;

    fn company_developed_games_key(&self, company: &Company, pagination: Pagination) -> CacheKey;

    fn similar_games_key(&self, game: &Game, pagination: Pagination) -> CacheKey;

    fn articles_key(&self, pagination: Pagination) -> CacheKey;
}

/// Key provider producing the compact `name|field:value` format
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultKeyProvider;

impl KeyProvider for DefaultKeyProvider {
    fn discovery_games_key(&self, category: DiscoveryCategory, pagination: Pagination) -> CacheKey {
        KeyBuilder::new(&format!("{}_games", category.as_str()))
            .page(pagination)
            .build()
    }

    fn company_developed_games_key(&self, company: &Company, pagination: Pagination) -> CacheKey {
        KeyBuilder::new("company_developed_games")
            .field("company_id", company.id)
            .ids("developed_games_ids", &company.developed_games)
            .page(pagination)
            .build()
    }

    fn similar_games_key(&self, game: &Game, pagination: Pagination) -> CacheKey {
        KeyBuilder::new("similar_games")
            .field("game_id", game.id)
            .ids("similar_games_ids", &game.similar_games)
            .page(pagination)
            .build()
    }

    fn articles_key(&self, pagination: Pagination) -> CacheKey {
        KeyBuilder::new("articles").page(pagination).build()
    }
}

struct KeyBuilder {
    key: String,
}

impl KeyBuilder {
    fn new(name: &str) -> Self {
        Self {
            key: name.to_string(),
        }
    }

    fn field(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.key.push_str(&format!("|{name}:{value}"));
        self
    }

    fn ids(self, name: &str, ids: &[i64]) -> Self {
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let joined = sorted
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.field(name, format!("[{joined}]"))
    }

    fn page(self, pagination: Pagination) -> Self {
        self.field("offset", pagination.offset())
            .field("limit", pagination.limit())
    }

    fn build(self) -> CacheKey {
        CacheKey(self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn company(developed_games: Vec<i64>) -> Company {
        Company {
            id: 7,
            name: "Studio".to_string(),
            website_url: None,
            logo: None,
            developed_games,
        }
    }

    #[test]
    fn test_discovery_key_format() {
        let provider = DefaultKeyProvider;
        let key = provider.discovery_games_key(DiscoveryCategory::Popular, Pagination::default());
        assert_eq!(key.as_str(), "popular_games|offset:0|limit:20");

        let key = provider.discovery_games_key(
            DiscoveryCategory::MostAnticipated,
            Pagination::new(40, 20).unwrap(),
        );
        assert_eq!(key.as_str(), "most_anticipated_games|offset:40|limit:20");
    }

    #[test]
    fn test_company_key_sorts_ids() {
        let key = DefaultKeyProvider
            .company_developed_games_key(&company(vec![3, 1, 2]), Pagination::default());
        assert_eq!(
            key.as_str(),
            "company_developed_games|company_id:7|developed_games_ids:[1,2,3]|offset:0|limit:20"
        );
    }

    #[test]
    fn test_distinct_pages_have_distinct_keys() {
        let provider = DefaultKeyProvider;
        let first = Pagination::default();
        let second = first.next_page();
        assert_ne!(provider.articles_key(first), provider.articles_key(second));
        assert_ne!(
            provider.discovery_games_key(DiscoveryCategory::ComingSoon, first),
            provider.discovery_games_key(DiscoveryCategory::ComingSoon, first.next_limit())
        );
    }

    #[test]
    fn test_categories_have_distinct_keys() {
        let provider = DefaultKeyProvider;
        let keys: std::collections::HashSet<_> = DiscoveryCategory::ALL
            .iter()
            .map(|c| provider.discovery_games_key(*c, Pagination::default()))
            .collect();
        assert_eq!(keys.len(), DiscoveryCategory::ALL.len());
    }

    proptest! {
        #[test]
        fn prop_company_key_ignores_id_order(
            ids in proptest::collection::vec(0i64..10_000, 0..32),
            offset in 0u32..1_000,
            limit in 1u32..100,
        ) {
            let pagination = Pagination::new(offset, limit).unwrap();
            let mut reversed = ids.clone();
            reversed.reverse();

            let provider = DefaultKeyProvider;
            prop_assert_eq!(
                provider.company_developed_games_key(&company(ids), pagination),
                provider.company_developed_games_key(&company(reversed), pagination)
            );
        }

        #[test]
        fn prop_key_is_deterministic(offset in 0u32..10_000, limit in 1u32..500) {
            let pagination = Pagination::new(offset, limit).unwrap();
            let provider = DefaultKeyProvider;
            prop_assert_eq!(
                provider.discovery_games_key(DiscoveryCategory::RecentlyReleased, pagination),
                provider.discovery_games_key(DiscoveryCategory::RecentlyReleased, pagination)
            );
        }
    }
}
