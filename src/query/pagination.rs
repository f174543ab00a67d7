pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Effective paging window of a listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Honor `page`/`limit` only when both are valid; anything else is the default window.
    pub fn resolve(page: Option<&str>, limit: Option<&str>) -> Self {
        match (parse_positive(page), parse_positive(limit)) {
            (Some(page), Some(limit)) => Self {
                page,
                limit,
                offset: (page - 1) * limit,
            },
            _ => Self::default(),
        }
    }

    /// `ceil(total / limit)`, zero for an empty result
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }
}

/// 32-bit decimal integer, at least 1
fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw?.parse::<i32>().ok().filter(|n| *n >= 1).map(i64::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paging_computes_offset() {
        let p = Pagination::resolve(Some("2"), Some("5"));
        assert_eq!((p.page, p.limit, p.offset), (2, 5, 5));

        let p = Pagination::resolve(Some("1"), Some("25"));
        assert_eq!((p.page, p.limit, p.offset), (1, 25, 0));
    }

    #[test]
    fn invalid_values_fall_back_to_default() {
        let cases = [
            (Some("0"), Some("5")),
            (Some("2"), Some("0")),
            (Some("-1"), Some("5")),
            (Some("abc"), Some("5")),
            (Some("2"), Some("ten")),
            (Some("2"), None),
            (None, Some("5")),
            (None, None),
            (Some(""), Some("")),
            (Some("1.5"), Some("5")),
            (Some(" 2"), Some("5")),
            // beyond 32 bits
            (Some("3000000000"), Some("5")),
        ];
        for (page, limit) in cases {
            let p = Pagination::resolve(page, limit);
            assert_eq!(p, Pagination::default(), "page={:?} limit={:?}", page, limit);
            assert_eq!((p.page, p.offset, p.limit), (1, 0, 10));
        }
    }

    #[test]
    fn large_pages_do_not_overflow() {
        let max = i32::MAX.to_string();
        let p = Pagination::resolve(Some(&max), Some(&max));
        assert_eq!(p.offset, (i32::MAX as i64 - 1) * i32::MAX as i64);
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination::default();
        assert_eq!(p.total_pages(23), 3);
        assert_eq!(p.total_pages(20), 2);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(0), 0);

        let p = Pagination::resolve(Some("1"), Some("7"));
        assert_eq!(p.total_pages(50), 8);
    }
}
