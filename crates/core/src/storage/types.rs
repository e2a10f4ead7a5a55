use serde::{Deserialize, Serialize};

/// Offset pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u64,
}

impl Pagination {
    /// Creates a window starting at `skip` with at most `limit` items.
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    /// Creates the window for a zero-based page number.
    pub fn page(page: u64, limit: u64) -> Self {
        Self {
            skip: page.saturating_mul(limit),
            limit,
        }
    }
}

/// One page of items plus the total number of items across all pages.
///
/// When served from cache, `total` is the count observed when the page was
/// cached, not necessarily the current count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}
