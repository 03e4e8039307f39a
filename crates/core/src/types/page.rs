//! Offset/limit pagination.
//!
//! [`PageRequest`] describes which slice of the visitor table to read and in
//! what order; [`Page`] is the slice plus the totals needed to render
//! navigation. Pages are zero-based.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Largest zero-based page index; its one-based display number still fits a `u32`.
pub const MAX_PAGE_INDEX: u32 = u32::MAX - 1;

/// Column a page is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Id,
    Name,
    VisitCount,
}

impl SortKey {
    /// Name of the key as accepted in a `sort` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::VisitCount => "visitCount",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Errors parsing a `sort` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortParseError {
    #[error("unknown sort key: {0}")]
    UnknownKey(String),
    #[error("unknown sort direction: {0}")]
    UnknownDirection(String),
}

/// Requested ordering. Ties are always broken by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    #[must_use]
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Whether this is the default `id,asc` ordering.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.key.as_str(), self.direction.as_str())
    }
}

/// Parses `key` or `key,direction`, e.g. `name` or `visitCount,desc`.
impl FromStr for Sort {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, direction) = s.split_once(',').unwrap_or((s, "asc"));

        let key = match key.trim() {
            "id" => SortKey::Id,
            "name" => SortKey::Name,
            "visitCount" | "visit_count" => SortKey::VisitCount,
            other => return Err(SortParseError::UnknownKey(other.to_owned())),
        };

        let direction = match direction.trim().to_ascii_lowercase().as_str() {
            "" | "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => return Err(SortParseError::UnknownDirection(other.to_owned())),
        };

        Ok(Self { key, direction })
    }
}

/// A request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Sort,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

impl PageRequest {
    /// Create a page request with the default ordering.
    ///
    /// A size of zero falls back to [`DEFAULT_PAGE_SIZE`]; sizes above
    /// [`MAX_PAGE_SIZE`] and pages above [`MAX_PAGE_INDEX`] are clamped.
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        let page = if page > MAX_PAGE_INDEX {
            MAX_PAGE_INDEX
        } else {
            page
        };
        let size = if size == 0 {
            DEFAULT_PAGE_SIZE
        } else if size > MAX_PAGE_SIZE {
            MAX_PAGE_SIZE
        } else {
            size
        };

        Self {
            page,
            size,
            sort: Sort::new(SortKey::Id, SortDirection::Asc),
        }
    }

    /// Build a page request from loosely-typed query parameters.
    ///
    /// Missing or negative pages become page 0, missing or non-positive
    /// sizes become [`DEFAULT_PAGE_SIZE`], and an unparseable sort falls back
    /// to the default ordering.
    #[must_use]
    pub fn from_params(page: Option<i64>, size: Option<i64>, sort: Option<&str>) -> Self {
        let page = page
            .filter(|p| *p > 0)
            .map_or(0, |p| u32::try_from(p).unwrap_or(MAX_PAGE_INDEX));
        let size = size
            .filter(|s| *s > 0)
            .map_or(DEFAULT_PAGE_SIZE, |s| u32::try_from(s).unwrap_or(MAX_PAGE_SIZE));
        let sort = sort
            .and_then(|s| s.parse::<Sort>().ok())
            .unwrap_or_default();

        Self::new(page, size).with_sort(sort)
    }

    /// Replace the ordering.
    #[must_use]
    pub const fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub const fn sort(&self) -> Sort {
        self.sort
    }

    /// Number of items to skip before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based page index.
    pub number: u32,
    /// Requested page size.
    pub size: u32,
    pub sort: Sort,
    /// Number of items across all pages.
    pub total_elements: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            number: request.page(),
            size: request.size(),
            sort: request.sort(),
            total_elements,
        }
    }

    /// Number of pages needed to hold every element.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total_elements.div_ceil(self.size as u64)
        }
    }

    /// One-based page number for display.
    #[must_use]
    pub const fn display_number(&self) -> u64 {
        self.number as u64 + 1
    }

    /// Number of items actually on this page.
    #[must_use]
    pub const fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.number == 0
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 0
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        (self.number as u64) + 1 < self.total_pages()
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Transform the items while keeping the pagination metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            sort: self.sort,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_request() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 0);
        assert_eq!(request.size(), DEFAULT_PAGE_SIZE);
        assert!(request.sort().is_default());
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_page_request_clamps_size() {
        assert_eq!(PageRequest::new(0, 0).size(), DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new(0, 10_000).size(), MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(0, 7).size(), 7);
    }

    #[test]
    fn test_offset_does_not_overflow() {
        let request = PageRequest::new(u32::MAX, MAX_PAGE_SIZE);
        assert_eq!(
            request.offset(),
            u64::from(MAX_PAGE_INDEX) * u64::from(MAX_PAGE_SIZE)
        );
    }

    #[test]
    fn test_huge_page_index_is_clamped() {
        assert_eq!(PageRequest::new(u32::MAX, 5).page(), MAX_PAGE_INDEX);
        assert_eq!(
            PageRequest::from_params(Some(99_999_999_999), None, None).page(),
            MAX_PAGE_INDEX
        );

        let page: Page<i32> =
            Page::new(Vec::new(), &PageRequest::from_params(Some(i64::MAX), None, None), 12);
        assert_eq!(page.display_number(), u64::from(u32::MAX));
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_from_params_defaults_and_normalization() {
        let request = PageRequest::from_params(None, None, None);
        assert_eq!(request, PageRequest::default());

        let request = PageRequest::from_params(Some(-3), Some(-1), None);
        assert_eq!(request.page(), 0);
        assert_eq!(request.size(), DEFAULT_PAGE_SIZE);

        let request = PageRequest::from_params(Some(2), Some(5), Some("name,desc"));
        assert_eq!(request.page(), 2);
        assert_eq!(request.offset(), 10);
        assert_eq!(
            request.sort(),
            Sort::new(SortKey::Name, SortDirection::Desc)
        );
    }

    #[test]
    fn test_from_params_ignores_unknown_sort() {
        let request = PageRequest::from_params(Some(0), Some(5), Some("password"));
        assert!(request.sort().is_default());
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(
            "visitCount".parse::<Sort>().unwrap(),
            Sort::new(SortKey::VisitCount, SortDirection::Asc)
        );
        assert_eq!(
            "visit_count,DESC".parse::<Sort>().unwrap(),
            Sort::new(SortKey::VisitCount, SortDirection::Desc)
        );
        assert_eq!(
            "id,sideways".parse::<Sort>().unwrap_err(),
            SortParseError::UnknownDirection("sideways".to_string())
        );
        assert!(matches!(
            "email".parse::<Sort>(),
            Err(SortParseError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_sort_display_roundtrips() {
        let sort = Sort::new(SortKey::VisitCount, SortDirection::Desc);
        assert_eq!(sort.to_string(), "visitCount,desc");
        assert_eq!(sort.to_string().parse::<Sort>().unwrap(), sort);
    }

    #[test]
    fn test_page_navigation_for_twelve_items() {
        let first = Page::new(vec![1, 2, 3, 4, 5], &PageRequest::new(0, 5), 12);
        assert_eq!(first.total_pages(), 3);
        assert!(first.is_first());
        assert!(first.has_next());
        assert!(!first.has_previous());

        let last = Page::new(vec![11, 12], &PageRequest::new(2, 5), 12);
        assert_eq!(last.number_of_elements(), 2);
        assert!(last.is_last());
        assert!(last.has_previous());
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let page: Page<i32> = Page::new(Vec::new(), &PageRequest::new(9, 5), 12);
        assert_eq!(page.number_of_elements(), 0);
        assert_eq!(page.total_pages(), 3);
        assert!(page.is_last());
        assert_eq!(page.display_number(), 10);
    }

    #[test]
    fn test_empty_store_has_zero_pages() {
        let page: Page<i32> = Page::new(Vec::new(), &PageRequest::default(), 0);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_first());
        assert!(page.is_last());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], &PageRequest::new(1, 2), 4).map(|n| n * 10);
        assert_eq!(page.content, vec![10, 20]);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_elements, 4);
    }
}
