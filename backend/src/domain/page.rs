//! Page-number pagination shared by the listing operations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Page size used by job listings.
pub const JOBS_PAGE_SIZE: u32 = 10;
/// Page size used by application listings.
pub const APPLICATIONS_PAGE_SIZE: u32 = 5;

/// 1-based page request.
///
/// Out-of-range numbers clamp to the first page rather than erroring, so a
/// stale link still renders a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    /// Build a page request, clamping the number to at least 1.
    pub const fn new(number: u32, size: u32) -> Self {
        let number = if number == 0 { 1 } else { number };
        Self { number, size }
    }

    /// The first page of the given size.
    pub const fn first(size: u32) -> Self {
        Self::new(1, size)
    }

    /// 1-based page number.
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Maximum rows in the page.
    pub const fn limit(&self) -> i64 {
        self.size as i64
    }

    /// Rows to skip before the page starts.
    pub const fn offset(&self) -> i64 {
        (self.number as i64 - 1) * self.size as i64
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 0)]
    #[case(3, 10, 20)]
    #[case(2, 5, 5)]
    fn offsets_follow_the_page_number(#[case] number: u32, #[case] size: u32, #[case] offset: i64) {
        let page = Page::new(number, size);
        assert_eq!(page.offset(), offset);
        assert_eq!(page.limit(), i64::from(size));
    }
}
