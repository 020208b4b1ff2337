//! Lenient reads on chromiumoxide pages and elements.
//!
//! The field extractor treats an empty value and a missing value the same
//! way, so these helpers fold chromiumoxide's `Ok(None)` into an empty
//! string and keep only real communication failures as errors.

use anyhow::anyhow;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use tracing::trace;

const BLANK_PAGE: &str = "about:blank";

/// URL of `page`, or `about:blank` when it has none or cannot be read.
pub async fn get_page_url_with_fallback(page: &Page) -> String {
    match page.url().await {
        Ok(url) => url.unwrap_or_else(|| BLANK_PAGE.to_string()),
        Err(e) => {
            trace!("Page URL unavailable, reporting {BLANK_PAGE}: {e}");
            BLANK_PAGE.to_string()
        }
    }
}

/// Rendered text of `element`; an element without text reads as `""`.
pub async fn get_element_text_or_empty(element: &Element) -> anyhow::Result<String> {
    element
        .inner_text()
        .await
        .map(Option::unwrap_or_default)
        .map_err(|e| anyhow!("Element text unavailable: {e}"))
}
