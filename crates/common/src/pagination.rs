//! Pagination primitives shared by the service and HTTP layers.
//!
//! Provides a `Pagination` input struct with input normalization and the
//! `Page` envelope returned by paginated list endpoints.

use serde::{Deserialize, Serialize};

/// Page-number pagination parameters
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Pagination {
    /// 1-based page index
    #[serde(default = "default_page")]
    pub page: u32,
    /// items per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Pagination {
    /// Clamp to sane defaults and convert to a 0-based page index plus size,
    /// both as `u64` for the paginator.
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: 20 }
    }
}

/// Response envelope for paginated listings
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    /// total number of matching rows across all pages
    pub count: u64,
    pub page: u32,
    pub per_page: u32,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(count: u64, pagination: Pagination, results: Vec<T>) -> Self {
        let (page_idx, per_page) = pagination.normalize();
        Self {
            count,
            page: page_idx as u32 + 1,
            per_page: per_page as u32,
            results,
        }
    }
}
