//! Core configuration types for catalog enrichment
//!
//! This module contains the main `EnrichConfig` struct that defines where
//! the catalog lives, how long to wait for it, and where output goes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::page_extractor::CatalogLayout;

/// Main configuration struct for enrichment runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Catalog page navigated to before pagination
    pub(crate) catalog_url: String,

    /// Base used to absolutize relative detail links.
    ///
    /// Defaults to the origin of `catalog_url`.
    pub(crate) base_url: String,

    pub(crate) headless: bool,

    /// Timeout in milliseconds for one page navigation
    ///
    /// Default: 30 seconds
    pub(crate) page_load_timeout_ms: u64,

    /// Timeout in milliseconds for `document.readyState === 'complete'`
    ///
    /// A timeout here is never fatal; extraction proceeds on the DOM that
    /// is present.
    ///
    /// Default: 15 seconds
    pub(crate) readiness_timeout_ms: u64,

    /// Timeout in milliseconds for the load-more control to become actionable
    ///
    /// Default: 15 seconds
    pub(crate) control_timeout_ms: u64,

    pub(crate) scroll_settle_ms: u64,
    pub(crate) load_more_settle_ms: u64,
    pub(crate) detail_settle_ms: u64,
    pub(crate) redirect_settle_ms: u64,
    pub(crate) item_delay_ms: u64,

    /// Hard cap on load-more activations in one pagination pass
    pub(crate) max_load_more_activations: usize,

    /// Catalog ordering control activated before pagination, if any
    pub(crate) sort_option_selector: Option<String>,

    /// Where diagnostic screenshots go; none are taken when unset
    pub(crate) debug_screenshot_dir: Option<PathBuf>,

    /// Export directory used by the binary
    pub(crate) output_dir: PathBuf,

    /// Chrome user data directory, created by the browser launcher
    pub(crate) chrome_data_dir: Option<PathBuf>,

    /// Site markup description; not serializable
    #[serde(skip)]
    pub(crate) layout: CatalogLayout,
}

impl EnrichConfig {
    /// Set the Chrome data directory, for cleanup after the run
    #[must_use]
    pub fn with_chrome_data_dir(mut self, dir: PathBuf) -> Self {
        self.chrome_data_dir = Some(dir);
        self
    }
}
