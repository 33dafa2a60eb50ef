//! Offset pagination

use serde::{Deserialize, Serialize};

/// Maximum items per page
pub const MAX_LIMIT: u32 = 100;

/// Default items per page
pub const DEFAULT_LIMIT: u32 = 10;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Items per page (max 100)
    pub limit: u32,
    /// Rows skipped before the page starts
    pub offset: u64,
}

impl Pagination {
    /// Create pagination, capping limit at [`MAX_LIMIT`].
    pub fn new(limit: u32, offset: u64) -> Self {
        Self {
            limit: limit.min(MAX_LIMIT),
            offset,
        }
    }

    /// Build from optional query values, applying defaults.
    pub fn from_query(limit: Option<u32>, offset: Option<u64>) -> Self {
        Self::new(limit.unwrap_or(DEFAULT_LIMIT), offset.unwrap_or(0))
    }

    /// SQL LIMIT value.
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// SQL OFFSET value.
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    /// Cut the page out of an already ordered sequence.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        items
            .into_iter()
            .skip(skip)
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// List response: one page plus the unpaginated match count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items for current page
    pub data: Vec<T>,
    /// Rows matching the filters, ignoring limit/offset
    pub total: i64,
}

impl<T> Paginated<T> {
    /// Convert every item, keeping the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = Pagination::from_query(None, None);
        assert_eq!(p.limit, 10);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn caps_limit() {
        let p = Pagination::new(999, 0);
        assert_eq!(p.limit, 100);

        let p = Pagination::new(0, 0);
        assert_eq!(p.limit, 0);
    }

    #[test]
    fn apply_slices() {
        let p = Pagination::new(2, 1);
        assert_eq!(p.apply(vec![1, 2, 3, 4]), vec![2, 3]);

        let p = Pagination::new(2, 10);
        assert!(p.apply(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn serializes_as_data_and_total() {
        let page = Paginated {
            data: vec![1, 2],
            total: 7,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json, serde_json::json!({"data": [1, 2], "total": 7}));
    }
}
