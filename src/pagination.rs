use serde::Deserialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 3;
pub const MAX_LIMIT: i64 = 100;

/// Query parameters shared by the list endpoints.
///
/// `page` is 1-based; out-of-range values are normalized rather than
/// rejected, so every page/limit pair yields a well-formed query.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Pagination {
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        // Saturates so an absurd but parseable page still yields a valid
        // (empty) query instead of a negative OFFSET.
        (self.page() - 1).saturating_mul(self.limit())
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_page_one_limit_three() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 3);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let p = Pagination { page: 4, limit: 10 };
        assert_eq!(p.offset(), 30);
        let p = Pagination { page: 1, limit: 25 };
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn zero_and_negative_pages_are_floored_to_one() {
        let p = Pagination { page: 0, limit: 3 };
        assert_eq!(p.page(), 1);
        assert_eq!(p.offset(), 0);
        let p = Pagination { page: -7, limit: 3 };
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_saturates_for_huge_pages() {
        let p = Pagination {
            page: i64::MAX,
            limit: 100,
        };
        assert_eq!(p.offset(), i64::MAX);
        let p = Pagination {
            page: i64::MAX,
            limit: 1,
        };
        assert!(p.offset() >= 0);
    }

    #[test]
    fn limit_is_clamped() {
        let p = Pagination { page: 1, limit: 0 };
        assert_eq!(p.limit(), 1);
        let p = Pagination { page: 1, limit: 10_000 };
        assert_eq!(p.limit(), MAX_LIMIT);
    }

    #[test]
    fn deserializes_from_query_style_json() {
        let p: Pagination = serde_json::from_str(r#"{"page": 2, "limit": 5}"#).unwrap();
        assert_eq!(p.page(), 2);
        assert_eq!(p.limit(), 5);
        assert_eq!(p.offset(), 5);
    }
}
