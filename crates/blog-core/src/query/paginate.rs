//! Offset-based pagination.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.page, self.limit)
    }
}

/// The `page`-th window of `limit` items. Pages past the end are empty.
///
/// `page` and `limit` are expected to be at least 1.
pub fn paginate<T>(items: &[T], page: usize, limit: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(limit);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(limit).min(items.len());
    &items[start..end]
}
