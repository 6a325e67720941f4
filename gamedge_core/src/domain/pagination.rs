//! Page windows over ordered result sets

use crate::error::{Error, Result, ValidationError};
use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// An `(offset, limit)` window. `limit` is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PaginationFields")]
pub struct Pagination {
    offset: u32,
    limit: u32,
}

#[derive(Deserialize)]
struct PaginationFields {
    offset: u32,
    limit: u32,
}

impl TryFrom<PaginationFields> for Pagination {
    type Error = Error;

    fn try_from(fields: PaginationFields) -> Result<Self> {
        Self::new(fields.offset, fields.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(offset: u32, limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(ValidationError::invalid_pagination("limit must be greater than 0").into());
        }
        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Window directly after this one, same size
    pub fn next_page(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }

    /// Same start, one default page larger
    pub fn next_limit(&self) -> Self {
        Self {
            offset: self.offset,
            limit: self.limit.saturating_add(DEFAULT_PAGE_SIZE),
        }
    }

    /// Apply this window to an already ordered sequence
    pub fn apply<T, I>(&self, items: I) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
    {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let pagination = Pagination::default();
        assert_eq!(pagination.offset(), 0);
        assert_eq!(pagination.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert!(Pagination::new(0, 0).is_err());
    }

    #[test]
    fn test_deserialize_goes_through_validation() {
        let pagination: Pagination = serde_json::from_str(r#"{"offset":40,"limit":20}"#).unwrap();
        assert_eq!(pagination, Pagination::new(40, 20).unwrap());

        let zero = serde_json::from_str::<Pagination>(r#"{"offset":0,"limit":0}"#);
        assert!(zero.is_err());
    }

    #[test]
    fn test_next_page_and_next_limit() {
        let pagination = Pagination::new(20, 10).unwrap();
        assert_eq!(pagination.next_page(), Pagination::new(30, 10).unwrap());
        assert_eq!(pagination.next_limit(), Pagination::new(20, 30).unwrap());
    }

    #[test]
    fn test_apply_skips_and_takes() {
        let pagination = Pagination::new(2, 3).unwrap();
        assert_eq!(pagination.apply(0..10), vec![2, 3, 4]);
        assert!(Pagination::new(50, 3).unwrap().apply(0..10).is_empty());
    }
}
