//! Shared response envelope types for API handlers.
//!
//! Success responses serialize their payload directly; failures carry the
//! stable `{"success": false, "message": ...}` shape built in
//! [`crate::error`]. The one shared envelope is [`Paginated`], used by
//! list endpoints that page through large result sets.

use serde::Serialize;

/// A page of results plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

/// Pagination metadata for [`Paginated`] responses.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl<T: Serialize> Paginated<T> {
    /// Assemble a page, deriving the page count from `total` and `limit`.
    pub fn new(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            data,
            pagination: PageMeta {
                page,
                limit,
                total,
                pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        let page = Paginated::new(vec![1, 2, 3], 1, 20, 41);
        assert_eq!(page.pagination.pages, 3);

        let page = Paginated::new(Vec::<i32>::new(), 1, 20, 0);
        assert_eq!(page.pagination.pages, 0);

        let page = Paginated::new(vec![1], 1, 20, 20);
        assert_eq!(page.pagination.pages, 1);
    }
}
