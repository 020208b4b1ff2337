//! Getter methods for `EnrichConfig`
//!
//! Raw accessors plus the timing bundles handed to the pager and the
//! detail visitor.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::EnrichConfig;
use crate::crawl_engine::pager::PagerSettings;
use crate::crawl_engine::visitor::VisitTiming;
use crate::page_extractor::CatalogLayout;

impl EnrichConfig {
    #[must_use]
    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }

    #[must_use]
    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_millis(self.readiness_timeout_ms)
    }

    #[must_use]
    pub fn control_timeout(&self) -> Duration {
        Duration::from_millis(self.control_timeout_ms)
    }

    #[must_use]
    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    #[must_use]
    pub fn load_more_settle(&self) -> Duration {
        Duration::from_millis(self.load_more_settle_ms)
    }

    #[must_use]
    pub fn detail_settle(&self) -> Duration {
        Duration::from_millis(self.detail_settle_ms)
    }

    #[must_use]
    pub fn redirect_settle(&self) -> Duration {
        Duration::from_millis(self.redirect_settle_ms)
    }

    #[must_use]
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    #[must_use]
    pub fn max_load_more_activations(&self) -> usize {
        self.max_load_more_activations
    }

    #[must_use]
    pub fn sort_option_selector(&self) -> Option<&str> {
        self.sort_option_selector.as_deref()
    }

    #[must_use]
    pub fn debug_screenshot_dir(&self) -> Option<&Path> {
        self.debug_screenshot_dir.as_deref()
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }

    #[must_use]
    pub fn layout(&self) -> &CatalogLayout {
        &self.layout
    }

    #[must_use]
    pub fn pager_settings(&self) -> PagerSettings {
        PagerSettings {
            control_timeout: self.control_timeout(),
            scroll_settle: self.scroll_settle(),
            load_more_settle: self.load_more_settle(),
            max_activations: self.max_load_more_activations,
        }
    }

    #[must_use]
    pub fn visit_timing(&self) -> VisitTiming {
        VisitTiming {
            page_load_timeout: self.page_load_timeout(),
            readiness_timeout: self.readiness_timeout(),
            detail_settle: self.detail_settle(),
            redirect_settle: self.redirect_settle(),
        }
    }
}
