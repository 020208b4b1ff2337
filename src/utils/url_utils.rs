//! URL manipulation utilities.
//!
//! Helpers for turning the raw `href` values found in catalog markup into
//! absolute URLs, and for trimming query strings off resolved links.

use url::Url;

/// Origin (`scheme://host[:port]`) of a URL, without a trailing slash.
///
/// Returns `None` when the input does not parse or has an opaque origin.
#[must_use]
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(origin.ascii_serialization())
}

/// Resolve an `href` found on a page against `base_url`.
///
/// Absolute `http(s)` links are returned unchanged. Anything else is joined
/// onto the base; when the base itself does not parse, the href is appended
/// to it verbatim.
#[must_use]
pub fn absolutize_href(href: &str, base_url: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{}{}", base_url.trim_end_matches('/'), href),
    }
}

/// Drop everything from the first `?` (and any `#` fragment).
#[must_use]
pub fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Check if a URL is navigable (`http`/`https`)
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
