//! Shared response envelopes: pagination wrapper and success/error bodies.

use serde::Serialize;

#[derive(Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct PaginationInfo {
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PaginationInfo {
    pub fn new(page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if limit > 0 {
            (total_items + limit - 1) / limit
        } else {
            0
        };
        PaginationInfo {
            page,
            limit,
            total_items,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }
}

pub fn paginated<T: Serialize>(data: Vec<T>, page: i64, limit: i64, total_items: i64) -> Paginated<T> {
    Paginated {
        data,
        pagination: PaginationInfo::new(page, limit, total_items),
    }
}

/// `{"success": false, "data": {...}}` body used by the create endpoints'
/// validation failures.
pub fn failure_body(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "success": false, "data": data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_pages_up() {
        let p = PaginationInfo::new(1, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_previous);
        assert!(p.has_next);
    }

    #[test]
    fn last_page_has_no_next() {
        let p = PaginationInfo::new(3, 10, 25);
        assert!(p.has_previous);
        assert!(!p.has_next);
    }

    #[test]
    fn empty_result_set() {
        let p = PaginationInfo::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
    }
}
