//! Selection of the catalog slice to enrich.

use std::ops::Range;

use super::crawl_types::{CrawlError, CrawlResult};

/// Turn a 1-based `start` and a `count` into a zero-based `[begin, end)`.
///
/// `count == 0` selects everything from `start` on. `start` must lie in
/// `1..=total`; an empty catalog therefore rejects every start.
pub fn resolve_range(total: usize, count: usize, start: usize) -> CrawlResult<Range<usize>> {
    if start < 1 || start > total {
        return Err(CrawlError::InvalidStartPosition { start, total });
    }

    let begin = start - 1;
    let end = if count == 0 {
        total
    } else {
        begin.saturating_add(count).min(total)
    };

    // Unreachable after validation; an inverted range would underflow callers.
    if begin >= end {
        return Ok(begin..begin);
    }

    Ok(begin..end)
}
