//! Browser automation capability consumed by the crawl engine.
//!
//! The engine never talks to a browser directly: it issues selector queries,
//! reads text and attributes, clicks, and juggles tabs through
//! [`BrowserDriver`]. [`ChromiumDriver`] is the production implementation;
//! tests drive the engine with an in-memory fake.

pub mod chromium;
pub mod login;
pub mod page_helpers;

use anyhow::Result;
use std::fmt::Debug;
use std::time::Duration;

use crate::crawl_engine::page_timeout::{poll_until, wait_until};

pub use chromium::ChromiumDriver;
pub use login::{FormLogin, LoginCredentials, NoLogin, SessionProvider};

/// Minimum browser surface the crawl engine needs.
///
/// All operations act on the tab that currently has focus. Element handles
/// are only meaningful for the page snapshot they were queried from; callers
/// re-query after anything that may re-render the page.
#[allow(async_fn_in_trait)]
pub trait BrowserDriver {
    /// Handle to a DOM element on the focused tab
    type Element;
    /// Opaque tab identifier
    type TabHandle: Clone + PartialEq + Debug;

    /// Navigate the focused tab.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// URL of the focused tab after any redirects.
    async fn current_url(&self) -> Result<String>;

    /// All elements matching `selector`, searched under `scope` when given,
    /// otherwise in the whole document. An invalid selector is an error.
    async fn query(&self, selector: &str, scope: Option<&Self::Element>) -> Result<Vec<Self::Element>>;

    /// Rendered text of an element.
    async fn element_text(&self, element: &Self::Element) -> Result<String>;

    /// Attribute value, `None` when the attribute is missing.
    async fn element_attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    async fn click(&self, element: &Self::Element) -> Result<()>;

    async fn scroll_into_view(&self, element: &Self::Element) -> Result<()>;

    /// Whether the element is rendered, visible and enabled.
    async fn is_actionable(&self, element: &Self::Element) -> Result<bool>;

    /// Whether a checkbox/radio/option element is currently selected.
    async fn is_selected(&self, element: &Self::Element) -> Result<bool>;

    /// Replace the value of an input element with `text`.
    async fn fill(&self, element: &Self::Element, text: &str) -> Result<()>;

    /// Whether the focused document finished loading.
    async fn document_ready(&self) -> Result<bool>;

    /// Open a blank tab. Focus does not move.
    async fn open_tab(&self) -> Result<Self::TabHandle>;

    /// Close the focused tab. No tab has focus afterwards until
    /// [`switch_to_tab`](Self::switch_to_tab) is called.
    async fn close_current_tab(&self) -> Result<()>;

    async fn switch_to_tab(&self, tab: &Self::TabHandle) -> Result<()>;

    async fn current_tab(&self) -> Result<Self::TabHandle>;

    async fn list_tab_handles(&self) -> Result<Vec<Self::TabHandle>>;

    /// Full-page PNG of the focused tab.
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Wait for `document.readyState === "complete"`, bounded by `timeout`.
    async fn wait_for_ready(&self, timeout: Duration) -> bool {
        wait_until(
            move || async move { self.document_ready().await.unwrap_or(false) },
            timeout,
        )
        .await
    }

    /// Wait for the first element matching `selector` to become actionable.
    ///
    /// Lookup errors count as "not yet"; `None` after `timeout`.
    async fn wait_for_actionable(&self, selector: &str, timeout: Duration) -> Option<Self::Element> {
        poll_until(
            move || async move {
                let candidates = self.query(selector, None).await.ok()?;
                for candidate in candidates {
                    if self.is_actionable(&candidate).await.unwrap_or(false) {
                        return Some(candidate);
                    }
                }
                None
            },
            timeout,
        )
        .await
    }

    /// Wait for at least one element matching `selector` to be present.
    async fn wait_for_present(&self, selector: &str, timeout: Duration) -> Option<Self::Element> {
        poll_until(
            move || async move { self.query(selector, None).await.ok()?.into_iter().next() },
            timeout,
        )
        .await
    }
}
