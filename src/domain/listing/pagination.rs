//! Page index arithmetic, display ranks, page counts.

use serde::{Deserialize, Serialize};

/// Current page (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Clamps both values to at least 1.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn is_first(&self) -> bool {
        self.page == 1
    }

    /// Number of entries on all preceding pages.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// 1-based rank for the entry at `position` within the rendered sequence.
    pub fn fallback_rank(&self, position: usize) -> u64 {
        self.offset() + position as u64 + 1
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..*self
        }
    }

    pub fn prev(&self) -> Self {
        Self {
            page: self.page.saturating_sub(1).max(1),
            ..*self
        }
    }
}

/// Total number of pages, flagged with whether it is known or estimated.
///
/// The markets endpoint reports no total, so the count is usually derived from
/// a configured approximate coin count. It becomes exact once a short page
/// (fewer entries than the page size) has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCount {
    pub pages: u32,
    pub exact: bool,
}

impl PageCount {
    pub fn approximate(total_items: u32, per_page: u32) -> Self {
        Self {
            pages: total_items.div_ceil(per_page.max(1)).max(1),
            exact: false,
        }
    }

    /// Refine the estimate with what the current page actually returned.
    pub fn observe(self, pagination: Pagination, fetched: usize) -> Self {
        if fetched < pagination.per_page as usize {
            let pages = if fetched == 0 {
                pagination.page.saturating_sub(1).max(1)
            } else {
                pagination.page
            };
            return Self { pages, exact: true };
        }
        if pagination.page >= self.pages {
            // A full page at or beyond the estimate: at least one more may exist.
            return Self {
                pages: pagination.page.saturating_add(1),
                exact: false,
            };
        }
        self
    }

    pub fn has_next(&self, pagination: Pagination) -> bool {
        pagination.page < self.pages
    }
}
