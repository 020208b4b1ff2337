//! [`BrowserDriver`] over a chromiumoxide [`Browser`].
//!
//! chromiumoxide has no notion of a "focused" tab, so the driver keeps its
//! own tab table: every page it opened, plus the target id that currently
//! receives commands. Pages are cheap `Arc` clones, so the table lock is
//! never held across a CDP round-trip.

use anyhow::{Context, Result, anyhow};
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::target::TargetId;
use chromiumoxide::element::Element;
use chromiumoxide::page::{Page, ScreenshotParams};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::BrowserDriver;
use super::page_helpers::{get_element_text_or_empty, get_page_url_with_fallback};

const IS_ACTIONABLE_JS: &str = r"
    function() {
        const rect = this.getBoundingClientRect();
        const style = window.getComputedStyle(this);
        return !this.disabled
            && rect.width > 0
            && rect.height > 0
            && style.visibility !== 'hidden'
            && style.display !== 'none';
    }
";

const IS_SELECTED_JS: &str = "function() { return !!(this.checked || this.selected); }";

// Script click sidesteps overlays that intercept synthetic mouse events.
const CLICK_JS: &str = "function() { this.click(); }";

const CLEAR_VALUE_JS: &str = r"
    function() {
        this.focus();
        this.value = '';
        this.dispatchEvent(new Event('input', { bubbles: true }));
    }
";

#[derive(Default)]
struct TabTable {
    pages: Vec<Page>,
    focused: Option<TargetId>,
}

/// Chromium-backed driver. Owns the [`Browser`]; the CDP handler task is
/// owned by whoever launched it.
pub struct ChromiumDriver {
    browser: Browser,
    tabs: Mutex<TabTable>,
}

impl ChromiumDriver {
    /// Wrap a launched browser and open the primary tab.
    pub async fn new(browser: Browser) -> Result<Self> {
        let primary = browser
            .new_page("about:blank")
            .await
            .context("Failed to create primary page")?;
        let focused = primary.target_id().clone();

        debug!("Primary tab created: {:?}", focused);

        Ok(Self {
            browser,
            tabs: Mutex::new(TabTable {
                pages: vec![primary],
                focused: Some(focused),
            }),
        })
    }

    /// Close every tracked page and hand the browser back for shutdown.
    pub async fn into_browser(self) -> Browser {
        let table = self.tabs.into_inner();
        for page in table.pages {
            if let Err(e) = page.close().await {
                trace!("Failed to close page during shutdown: {}", e);
            }
        }
        self.browser
    }

    async fn focused_page(&self) -> Result<Page> {
        let table = self.tabs.lock().await;
        let focused = table
            .focused
            .as_ref()
            .ok_or_else(|| anyhow!("No tab has focus"))?;
        table
            .pages
            .iter()
            .find(|page| page.target_id() == focused)
            .cloned()
            .ok_or_else(|| anyhow!("Focused tab {focused:?} is no longer open"))
    }
}

impl BrowserDriver for ChromiumDriver {
    type Element = Element;
    type TabHandle = TargetId;

    async fn navigate(&self, url: &str) -> Result<()> {
        let page = self.focused_page().await?;
        page.goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {url}"))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let page = self.focused_page().await?;
        Ok(get_page_url_with_fallback(&page).await)
    }

    async fn query(&self, selector: &str, scope: Option<&Element>) -> Result<Vec<Element>> {
        let elements = match scope {
            Some(element) => element.find_elements(selector).await,
            None => self.focused_page().await?.find_elements(selector).await,
        };
        elements.with_context(|| format!("Query failed for selector '{selector}'"))
    }

    async fn element_text(&self, element: &Element) -> Result<String> {
        get_element_text_or_empty(element).await
    }

    async fn element_attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        element
            .attribute(name)
            .await
            .with_context(|| format!("Failed to read attribute '{name}'"))
    }

    async fn click(&self, element: &Element) -> Result<()> {
        element
            .call_js_fn(CLICK_JS, false)
            .await
            .context("Failed to click element")?;
        Ok(())
    }

    async fn scroll_into_view(&self, element: &Element) -> Result<()> {
        element
            .scroll_into_view()
            .await
            .context("Failed to scroll element into view")?;
        Ok(())
    }

    async fn is_actionable(&self, element: &Element) -> Result<bool> {
        let returns = element
            .call_js_fn(IS_ACTIONABLE_JS, false)
            .await
            .context("Failed to evaluate element visibility")?;
        Ok(returns
            .result
            .value
            .and_then(|value| value.as_bool())
            .unwrap_or(false))
    }

    async fn is_selected(&self, element: &Element) -> Result<bool> {
        let returns = element
            .call_js_fn(IS_SELECTED_JS, false)
            .await
            .context("Failed to evaluate element selection")?;
        Ok(returns
            .result
            .value
            .and_then(|value| value.as_bool())
            .unwrap_or(false))
    }

    async fn fill(&self, element: &Element, text: &str) -> Result<()> {
        element
            .call_js_fn(CLEAR_VALUE_JS, false)
            .await
            .context("Failed to clear input")?;
        element
            .type_str(text)
            .await
            .context("Failed to type into input")?;
        Ok(())
    }

    async fn document_ready(&self) -> Result<bool> {
        let page = self.focused_page().await?;
        let state: String = page
            .evaluate("document.readyState")
            .await
            .context("Failed to read document.readyState")?
            .into_value()
            .context("document.readyState was not a string")?;
        Ok(state == "complete")
    }

    async fn open_tab(&self) -> Result<TargetId> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to open tab")?;
        let handle = page.target_id().clone();
        self.tabs.lock().await.pages.push(page);
        debug!("Opened tab {:?}", handle);
        Ok(handle)
    }

    async fn close_current_tab(&self) -> Result<()> {
        let page = {
            let mut table = self.tabs.lock().await;
            let focused = table
                .focused
                .take()
                .ok_or_else(|| anyhow!("No tab has focus"))?;
            let position = table
                .pages
                .iter()
                .position(|page| *page.target_id() == focused)
                .ok_or_else(|| anyhow!("Focused tab {focused:?} is no longer open"))?;
            table.pages.remove(position)
        };
        let handle = page.target_id().clone();
        page.close().await.context("Failed to close tab")?;
        debug!("Closed tab {:?}", handle);
        Ok(())
    }

    async fn switch_to_tab(&self, tab: &TargetId) -> Result<()> {
        let page = {
            let table = self.tabs.lock().await;
            table
                .pages
                .iter()
                .find(|page| page.target_id() == tab)
                .cloned()
                .ok_or_else(|| anyhow!("Unknown tab {tab:?}"))?
        };
        page.bring_to_front()
            .await
            .context("Failed to bring tab to front")?;
        self.tabs.lock().await.focused = Some(tab.clone());
        Ok(())
    }

    async fn current_tab(&self) -> Result<TargetId> {
        self.tabs
            .lock()
            .await
            .focused
            .clone()
            .ok_or_else(|| anyhow!("No tab has focus"))
    }

    async fn list_tab_handles(&self) -> Result<Vec<TargetId>> {
        Ok(self
            .tabs
            .lock()
            .await
            .pages
            .iter()
            .map(|page| page.target_id().clone())
            .collect())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let page = self.focused_page().await?;
        page.screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
            .context("Failed to capture screenshot")
    }
}
