//! Pagination utilities for list endpoints

use abuddy_common::api::PaginationMeta;

/// Page size when the client does not pass `limit`
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound for `limit`
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination window calculated from total results
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Rows per page
    pub limit: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Rows to skip
    pub offset: i64,
}

impl Pagination {
    pub fn meta(&self, total: i64) -> PaginationMeta {
        PaginationMeta {
            page: self.page,
            limit: self.limit,
            total,
            total_pages: self.total_pages,
        }
    }

    /// The slice of `items` on this page
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

/// Calculate pagination from total results and the requested page and size
///
/// Page is clamped to [1, total_pages]; limit to [1, MAX_PAGE_SIZE].
///
/// # Examples
/// ```
/// use abuddy_api::pagination::calculate_pagination;
///
/// // 45 results at 20 per page = 3 pages (20 + 20 + 5)
/// let p = calculate_pagination(45, 2, Some(20));
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 20);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(45, 99, Some(20));
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 40);
/// ```
pub fn calculate_pagination(
    total_results: i64,
    requested_page: i64,
    requested_limit: Option<i64>,
) -> Pagination {
    let limit = requested_limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let total_pages = (total_results + limit - 1) / limit;
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * limit;

    Pagination {
        page,
        limit,
        total_pages,
        offset,
    }
}
