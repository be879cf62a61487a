//! Page count arithmetic.

/// Items per page returned by the search endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Highest page count the search endpoint will serve for one query.
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Returns how many pages cover `total_hits`, including page 0.
///
/// Always at least 1 and never more than `max_pages`. A zero `page_size`
/// or `max_pages` is treated as 1.
///
/// ```
/// use broadsheet_aggregate::pages_needed;
///
/// assert_eq!(pages_needed(0, 10, 100), 1);
/// assert_eq!(pages_needed(101, 10, 100), 11);
/// assert_eq!(pages_needed(1000, 10, 100), 100);
/// ```
#[must_use]
pub fn pages_needed(total_hits: u64, page_size: u32, max_pages: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let max_pages = max_pages.max(1);
    let pages = total_hits.div_ceil(page_size).max(1);
    u32::try_from(pages).map_or(max_pages, |p| p.min(max_pages))
}
