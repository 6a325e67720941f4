//! Gaming news articles

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub lede: String,
    pub image_url: Option<String>,
    /// Epoch milliseconds
    pub publication_date: i64,
    pub site_detail_url: String,
}
