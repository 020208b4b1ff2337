//! Main enrichment orchestration logic
//!
//! Sequences one run over an already authenticated browser:
//! - Catalog preparation (navigation, ordering)
//! - Load-all pagination
//! - Range selection
//! - Per-entry base extraction and detail visit
//!
//! Entries are processed strictly in catalog order, one at a time. Only an
//! empty catalog and an out-of-range start abort the run once the catalog
//! is loaded; every other failure costs at most one entry.

use anyhow::anyhow;
use log::{debug, error, info, warn};

use super::cleanup::close_stray_tabs;
use super::crawl_types::{CancelSignal, CrawlError, CrawlResult, SelectionRequest};
use super::pager::load_all;
use super::page_timeout::{settle, with_page_timeout};
use super::progress::ProgressReporter;
use super::range::resolve_range;
use super::result_set::ResultSet;
use super::visitor::DetailVisitor;
use crate::config::EnrichConfig;
use crate::content_saver::save_debug_screenshot;
use crate::driver::BrowserDriver;
use crate::page_extractor::{EnrichedRecord, extract_base_record};

enum ItemOutcome {
    Enriched(Box<EnrichedRecord>),
    Skipped(&'static str),
}

/// Drives one enrichment run over a browser session.
///
/// The crawler owns the result set for the duration of [`run`](Self::run);
/// nothing else appends to it.
pub struct CatalogCrawler<'a, D: BrowserDriver, P: ProgressReporter> {
    driver: &'a D,
    config: &'a EnrichConfig,
    progress: P,
    cancel: CancelSignal,
}

impl<'a, D: BrowserDriver, P: ProgressReporter> CatalogCrawler<'a, D, P> {
    pub fn new(driver: &'a D, config: &'a EnrichConfig, progress: P) -> Self {
        Self {
            driver,
            config,
            progress,
            cancel: CancelSignal::new(),
        }
    }

    /// Stop between entries once `cancel` is tripped.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// Enrich the requested slice of the catalog.
    ///
    /// # Errors
    ///
    /// - [`CrawlError::Browser`] when the catalog page cannot be reached
    /// - [`CrawlError::NoItemsFound`] when pagination ends with no entries
    /// - [`CrawlError::InvalidStartPosition`] when `request.start` is outside
    ///   the catalog
    pub async fn run(&self, request: SelectionRequest) -> CrawlResult<ResultSet> {
        let primary = self.driver.current_tab().await?;

        self.prepare_catalog().await?;

        let layout = self.config.layout();
        let summary = load_all(self.driver, layout, &self.config.pager_settings()).await;
        self.progress.catalog_loaded(summary.total);

        let Some(container_selector) = summary.container_selector.filter(|_| summary.total > 0)
        else {
            error!("No catalog entries found with any container selector");
            self.capture_debug_screenshot("debug_catalog").await;
            return Err(CrawlError::NoItemsFound);
        };

        let range = match resolve_range(summary.total, request.count, request.start) {
            Ok(range) => range,
            Err(e) => {
                self.capture_debug_screenshot("debug_error").await;
                return Err(e);
            }
        };
        self.progress.range_resolved(range.start, range.end);
        info!(
            "Enriching entries {}..={} of {} (matched by '{}')",
            range.start + 1,
            range.end,
            summary.total,
            container_selector
        );

        let visitor = DetailVisitor::new(&layout.detail, self.config.visit_timing());
        let mut results = ResultSet::new();

        for index in range.clone() {
            if self.cancel.is_cancelled() {
                warn!("Cancellation requested, stopping before entry {}", index + 1);
                results.mark_cancelled();
                break;
            }

            let position = index + 1;
            match self.process_item(index, container_selector, &visitor).await {
                Ok(ItemOutcome::Enriched(record)) => {
                    results.push(*record);
                    self.progress.item_completed(position);
                }
                Ok(ItemOutcome::Skipped(reason)) => {
                    warn!("Entry {position} skipped: {reason}");
                    self.progress.item_skipped(position, reason);
                }
                Err(e) => {
                    error!("Entry {position} failed: {e:#}");
                    self.progress.item_failed(position, &format!("{e:#}"));
                    close_stray_tabs(self.driver, &primary).await;
                }
            }

            if index + 1 < range.end {
                settle(self.config.item_delay()).await;
            }
        }

        info!("Collected {} records", results.len());
        self.progress.completed(results.len());
        Ok(results)
    }

    async fn process_item(
        &self,
        index: usize,
        container_selector: &str,
        visitor: &DetailVisitor<'_>,
    ) -> anyhow::Result<ItemOutcome> {
        let position = index + 1;

        // Handles from earlier iterations may be stale after a re-render.
        let scopes = self.driver.query(container_selector, None).await?;
        let scope = scopes.get(index).ok_or_else(|| {
            anyhow!(
                "Entry {position} is no longer rendered ({} entries visible)",
                scopes.len()
            )
        })?;

        let base = extract_base_record(
            self.driver,
            scope,
            self.config.layout(),
            position,
            self.config.base_url(),
        )
        .await;
        self.progress.item_started(position, &base);

        if base.detail_url.is_none() {
            return Ok(ItemOutcome::Skipped("no detail URL"));
        }

        Ok(ItemOutcome::Enriched(Box::new(
            visitor.visit(self.driver, base).await,
        )))
    }

    async fn prepare_catalog(&self) -> CrawlResult<()> {
        let catalog_url = self.config.catalog_url();
        info!("Opening catalog {catalog_url}");

        if let Err(e) = with_page_timeout(
            self.driver.navigate(catalog_url),
            self.config.page_load_timeout(),
            "Catalog navigation",
        )
        .await
        {
            error!("Could not open catalog {catalog_url}: {e:#}");
            self.capture_debug_screenshot("debug_navigation").await;
            return Err(e.into());
        }

        if !self
            .driver
            .wait_for_ready(self.config.readiness_timeout())
            .await
        {
            debug!("Catalog not reported ready in time, continuing");
        }

        if let Some(selector) = self.config.sort_option_selector()
            && let Err(e) = self.select_sort_option(selector).await
        {
            warn!("Could not apply catalog ordering '{selector}', keeping default: {e:#}");
        }

        Ok(())
    }

    async fn select_sort_option(&self, selector: &str) -> anyhow::Result<()> {
        // Presence, not actionability: styled radios hide the input itself.
        let option = self
            .driver
            .wait_for_present(selector, self.config.control_timeout())
            .await
            .ok_or_else(|| anyhow!("ordering control not found"))?;

        if self.driver.is_selected(&option).await? {
            debug!("Catalog ordering '{selector}' already selected");
            return Ok(());
        }

        self.driver.scroll_into_view(&option).await?;
        settle(self.config.scroll_settle()).await;
        self.driver.click(&option).await?;
        settle(self.config.load_more_settle()).await;
        info!("Catalog ordering '{selector}' applied");
        Ok(())
    }

    async fn capture_debug_screenshot(&self, prefix: &str) {
        let Some(dir) = self.config.debug_screenshot_dir() else {
            return;
        };

        let saved = match self.driver.screenshot().await {
            Ok(png) => save_debug_screenshot(&png, dir, prefix).await,
            Err(e) => Err(CrawlError::from(e)),
        };

        match saved {
            Ok(path) => info!("Debug screenshot saved to {}", path.display()),
            Err(e) => warn!("Failed to save debug screenshot: {e}"),
        }
    }
}
