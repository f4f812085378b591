use serde::Deserialize;

use crate::config;

/// Page/limit pair, already validated: `page >= 1`, `limit` clamped to the
/// configured maximum (100). Defaults vary per listing and are supplied by
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn clamped(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        let max = config::config().api.max_page_size;

        let page = page.unwrap_or(1).max(1);
        let mut limit = limit.unwrap_or(default_limit);
        if limit < 1 {
            limit = default_limit;
        }
        if limit > max {
            limit = max;
        }

        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let p = Pagination::clamped(None, None, 20);
        assert_eq!(p, Pagination { page: 1, limit: 20 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn limit_clamps_to_maximum() {
        let p = Pagination::clamped(Some(2), Some(500), 50);
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset(), 100);
    }

    #[test]
    fn page_floors_at_one() {
        let p = Pagination::clamped(Some(0), Some(10), 10);
        assert_eq!(p.page, 1);
        let p = Pagination::clamped(Some(-3), Some(10), 10);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn nonsense_limit_falls_back_to_default() {
        let p = Pagination::clamped(Some(1), Some(0), 25);
        assert_eq!(p.limit, 25);
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination::clamped(Some(1), Some(10), 10);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
    }
}
