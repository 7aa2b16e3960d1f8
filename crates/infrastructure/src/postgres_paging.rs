/// Upper bound on rows returned by any listing.
const MAX_PAGE_SIZE: usize = 200;

/// `LIMIT` and `OFFSET` values ready to bind as `BIGINT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub(crate) limit: i64,
    pub(crate) offset: i64,
}

/// Converts client paging into bind values Postgres accepts.
///
/// Offsets beyond `i64::MAX` saturate, which reads as an empty page.
pub(crate) fn page_window(limit: usize, offset: usize) -> PageWindow {
    PageWindow {
        limit: i64::try_from(limit.clamp(1, MAX_PAGE_SIZE)).unwrap_or(1),
        offset: i64::try_from(offset).unwrap_or(i64::MAX),
    }
}
