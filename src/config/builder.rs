//! Type-safe builder for `EnrichConfig` using the typestate pattern
//!
//! `build()` only exists once the catalog URL has been supplied; every
//! other option has a default.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;

use super::types::EnrichConfig;
use crate::crawl_engine::crawl_types::{CrawlError, CrawlResult};
use crate::page_extractor::CatalogLayout;
use crate::utils::{
    DEFAULT_CONTROL_TIMEOUT_SECS, DEFAULT_DETAIL_SETTLE_MS, DEFAULT_ITEM_DELAY_MS,
    DEFAULT_LOAD_MORE_SETTLE_MS, DEFAULT_MAX_LOAD_MORE_ACTIVATIONS, DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
    DEFAULT_READINESS_TIMEOUT_SECS, DEFAULT_REDIRECT_SETTLE_MS, DEFAULT_SCROLL_SETTLE_MS,
    DEFAULT_SORT_OPTION_SELECTOR, is_valid_url, origin_of,
};

// Type states for the builder
pub struct WithCatalogUrl;

pub struct EnrichConfigBuilder<State = ()> {
    pub(crate) catalog_url: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) headless: bool,
    pub(crate) page_load_timeout_ms: u64,
    pub(crate) readiness_timeout_ms: u64,
    pub(crate) control_timeout_ms: u64,
    pub(crate) scroll_settle_ms: u64,
    pub(crate) load_more_settle_ms: u64,
    pub(crate) detail_settle_ms: u64,
    pub(crate) redirect_settle_ms: u64,
    pub(crate) item_delay_ms: u64,
    pub(crate) max_load_more_activations: usize,
    pub(crate) sort_option_selector: Option<String>,
    pub(crate) debug_screenshot_dir: Option<PathBuf>,
    pub(crate) output_dir: PathBuf,
    pub(crate) layout: CatalogLayout,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for EnrichConfigBuilder<()> {
    fn default() -> Self {
        Self {
            catalog_url: None,
            base_url: None,
            headless: true,
            page_load_timeout_ms: DEFAULT_PAGE_LOAD_TIMEOUT_SECS * 1_000,
            readiness_timeout_ms: DEFAULT_READINESS_TIMEOUT_SECS * 1_000,
            control_timeout_ms: DEFAULT_CONTROL_TIMEOUT_SECS * 1_000,
            scroll_settle_ms: DEFAULT_SCROLL_SETTLE_MS,
            load_more_settle_ms: DEFAULT_LOAD_MORE_SETTLE_MS,
            detail_settle_ms: DEFAULT_DETAIL_SETTLE_MS,
            redirect_settle_ms: DEFAULT_REDIRECT_SETTLE_MS,
            item_delay_ms: DEFAULT_ITEM_DELAY_MS,
            max_load_more_activations: DEFAULT_MAX_LOAD_MORE_ACTIVATIONS,
            sort_option_selector: Some(DEFAULT_SORT_OPTION_SELECTOR.to_string()),
            debug_screenshot_dir: None,
            output_dir: PathBuf::from("./output"),
            layout: CatalogLayout::default(),
            _phantom: PhantomData,
        }
    }
}

impl EnrichConfig {
    /// Create a builder for configuring an `EnrichConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> EnrichConfigBuilder<()> {
        EnrichConfigBuilder::default()
    }
}

impl EnrichConfigBuilder<()> {
    pub fn catalog_url(self, url: impl Into<String>) -> EnrichConfigBuilder<WithCatalogUrl> {
        let url_string = url.into();

        // Normalize URL: add https:// if no scheme is present
        let normalized_url =
            if url_string.starts_with("http://") || url_string.starts_with("https://") {
                url_string
            } else {
                format!("https://{url_string}")
            };

        EnrichConfigBuilder {
            catalog_url: Some(normalized_url),
            base_url: self.base_url,
            headless: self.headless,
            page_load_timeout_ms: self.page_load_timeout_ms,
            readiness_timeout_ms: self.readiness_timeout_ms,
            control_timeout_ms: self.control_timeout_ms,
            scroll_settle_ms: self.scroll_settle_ms,
            load_more_settle_ms: self.load_more_settle_ms,
            detail_settle_ms: self.detail_settle_ms,
            redirect_settle_ms: self.redirect_settle_ms,
            item_delay_ms: self.item_delay_ms,
            max_load_more_activations: self.max_load_more_activations,
            sort_option_selector: self.sort_option_selector,
            debug_screenshot_dir: self.debug_screenshot_dir,
            output_dir: self.output_dir,
            layout: self.layout,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl EnrichConfigBuilder<WithCatalogUrl> {
    pub fn build(self) -> CrawlResult<EnrichConfig> {
        let catalog_url = self
            .catalog_url
            .ok_or_else(|| CrawlError::Config("catalog_url is required".to_string()))?;

        if !is_valid_url(&catalog_url) {
            return Err(CrawlError::Config(format!(
                "catalog_url is not a valid http(s) URL: {catalog_url}"
            )));
        }

        let base_url = match self.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => origin_of(&catalog_url).ok_or_else(|| {
                CrawlError::Config(format!("Cannot derive base URL from {catalog_url}"))
            })?,
        };

        if self.max_load_more_activations == 0 {
            tracing::warn!("max_load_more_activations is 0, pagination is disabled");
        }

        Ok(EnrichConfig {
            catalog_url,
            base_url,
            headless: self.headless,
            page_load_timeout_ms: self.page_load_timeout_ms,
            readiness_timeout_ms: self.readiness_timeout_ms,
            control_timeout_ms: self.control_timeout_ms,
            scroll_settle_ms: self.scroll_settle_ms,
            load_more_settle_ms: self.load_more_settle_ms,
            detail_settle_ms: self.detail_settle_ms,
            redirect_settle_ms: self.redirect_settle_ms,
            item_delay_ms: self.item_delay_ms,
            max_load_more_activations: self.max_load_more_activations,
            sort_option_selector: self.sort_option_selector,
            debug_screenshot_dir: self.debug_screenshot_dir,
            output_dir: self.output_dir,
            chrome_data_dir: None,
            layout: self.layout,
        })
    }
}

fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// Optional settings, available at any state
impl<State> EnrichConfigBuilder<State> {
    /// Override the base used for relative detail links
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Bound on one navigation
    #[must_use]
    pub fn page_load_timeout(mut self, timeout: Duration) -> Self {
        self.page_load_timeout_ms = whole_millis(timeout);
        self
    }

    /// Bound on readiness waits
    #[must_use]
    pub fn readiness_timeout(mut self, timeout: Duration) -> Self {
        self.readiness_timeout_ms = whole_millis(timeout);
        self
    }

    /// Bound on waiting for the load-more control
    #[must_use]
    pub fn control_timeout(mut self, timeout: Duration) -> Self {
        self.control_timeout_ms = whole_millis(timeout);
        self
    }

    #[must_use]
    pub fn scroll_settle(mut self, pause: Duration) -> Self {
        self.scroll_settle_ms = whole_millis(pause);
        self
    }

    #[must_use]
    pub fn load_more_settle(mut self, pause: Duration) -> Self {
        self.load_more_settle_ms = whole_millis(pause);
        self
    }

    #[must_use]
    pub fn detail_settle(mut self, pause: Duration) -> Self {
        self.detail_settle_ms = whole_millis(pause);
        self
    }

    #[must_use]
    pub fn redirect_settle(mut self, pause: Duration) -> Self {
        self.redirect_settle_ms = whole_millis(pause);
        self
    }

    #[must_use]
    pub fn item_delay(mut self, pause: Duration) -> Self {
        self.item_delay_ms = whole_millis(pause);
        self
    }

    #[must_use]
    pub fn max_load_more_activations(mut self, cap: usize) -> Self {
        self.max_load_more_activations = cap;
        self
    }

    /// Ordering control to activate before paging; `None` keeps the
    /// catalog's default order
    #[must_use]
    pub fn sort_option_selector(mut self, selector: Option<String>) -> Self {
        self.sort_option_selector = selector;
        self
    }

    #[must_use]
    pub fn debug_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_screenshot_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replace the site markup description
    #[must_use]
    pub fn layout(mut self, layout: CatalogLayout) -> Self {
        self.layout = layout;
        self
    }
}
