//! Best-effort field extraction over ordered selector strategies.
//!
//! Nothing in here returns an error: an invalid selector, a detached
//! element or a failed read is a miss, and the next selector is tried.

use tracing::{debug, trace};

use super::schema::BaseRecord;
use super::strategies::{CatalogLayout, ReadMode, SelectorStrategy};
use crate::driver::BrowserDriver;
use crate::utils::absolutize_href;

async fn read_element<D: BrowserDriver>(
    driver: &D,
    element: &D::Element,
    read: ReadMode,
) -> Option<String> {
    let raw = match read {
        ReadMode::Text => driver.element_text(element).await,
        ReadMode::Attribute(name) => driver
            .element_attribute(element, name)
            .await
            .map(Option::unwrap_or_default),
    };

    match raw {
        Ok(value) => {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }
        Err(e) => {
            trace!("Element read failed: {e:#}");
            None
        }
    }
}

async fn query_or_miss<D: BrowserDriver>(
    driver: &D,
    selector: &str,
    scope: Option<&D::Element>,
    field: &str,
) -> Vec<D::Element> {
    match driver.query(selector, scope).await {
        Ok(elements) => elements,
        Err(e) => {
            trace!("Selector '{selector}' failed for {field}: {e:#}");
            Vec::new()
        }
    }
}

/// First non-empty trimmed value over every selector and every match.
///
/// `scope` restricts the search to one element's subtree; `None` searches
/// the whole focused document.
pub async fn extract_field<D: BrowserDriver>(
    driver: &D,
    scope: Option<&D::Element>,
    strategy: &SelectorStrategy,
) -> Option<String> {
    for selector in strategy.selectors {
        let matches = query_or_miss(driver, selector, scope, strategy.field).await;
        for element in &matches {
            if let Some(value) = read_element(driver, element, strategy.read).await {
                trace!("{} resolved via '{}'", strategy.field, selector);
                return Some(value);
            }
        }
    }
    None
}

/// Every non-empty value matched by the first selector that yields any.
pub async fn extract_all<D: BrowserDriver>(
    driver: &D,
    scope: Option<&D::Element>,
    strategy: &SelectorStrategy,
) -> Vec<String> {
    for selector in strategy.selectors {
        let matches = query_or_miss(driver, selector, scope, strategy.field).await;
        let mut values = Vec::with_capacity(matches.len());
        for element in &matches {
            if let Some(value) = read_element(driver, element, strategy.read).await {
                values.push(value);
            }
        }
        if !values.is_empty() {
            return values;
        }
    }
    Vec::new()
}

/// Read the base fields of one catalog entry.
///
/// `position` is the entry's 1-based catalog position. Relative detail
/// links are resolved against `base_url`.
pub async fn extract_base_record<D: BrowserDriver>(
    driver: &D,
    scope: &D::Element,
    layout: &CatalogLayout,
    position: usize,
    base_url: &str,
) -> BaseRecord {
    let company = extract_field(driver, Some(scope), &layout.company).await;
    let full_name = extract_field(driver, Some(scope), &layout.full_name).await;
    let job_title = extract_field(driver, Some(scope), &layout.job_title).await;
    let detail_url = extract_field(driver, Some(scope), &layout.detail_url)
        .await
        .map(|href| absolutize_href(&href, base_url));
    let avatar_url = extract_field(driver, Some(scope), &layout.avatar_url)
        .await
        .unwrap_or_default();

    for (strategy, value) in [
        (&layout.company, &company),
        (&layout.full_name, &full_name),
        (&layout.job_title, &job_title),
        (&layout.detail_url, &detail_url),
    ] {
        if value.is_none() {
            debug!("Entry {position}: {} not found", strategy.field);
        }
    }

    BaseRecord {
        index: position,
        company,
        full_name,
        job_title,
        detail_url,
        avatar_url,
    }
}
