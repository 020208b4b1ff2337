//! Detail page visits.
//!
//! Each visit happens in its own scoped tab so the catalog page, and the
//! entry handles the orchestrator holds on it, stay untouched. A visit never
//! fails: anything that goes wrong degrades the record instead.

use anyhow::Result;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, warn};

use super::external_link::{RedirectTiming, resolve_external_link};
use super::page_timeout::{settle, with_page_timeout};
use super::tab_scope::with_scoped_tab;
use crate::driver::BrowserDriver;
use crate::page_extractor::{
    BaseRecord, DetailLayout, DetailRecord, EnrichedRecord, classify_key_facts, extract_all,
    extract_field,
};

/// Waits applied during one detail visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitTiming {
    pub page_load_timeout: Duration,
    pub readiness_timeout: Duration,
    /// Pause after readiness for client-rendered sections
    pub detail_settle: Duration,
    pub redirect_settle: Duration,
}

impl VisitTiming {
    fn redirect(&self) -> RedirectTiming {
        RedirectTiming {
            page_load_timeout: self.page_load_timeout,
            redirect_settle: self.redirect_settle,
        }
    }
}

pub struct DetailVisitor<'a> {
    layout: &'a DetailLayout,
    timing: VisitTiming,
}

impl<'a> DetailVisitor<'a> {
    #[must_use]
    pub fn new(layout: &'a DetailLayout, timing: VisitTiming) -> Self {
        Self { layout, timing }
    }

    /// Enrich `base` from its detail page.
    ///
    /// Entries without a detail URL get an all-absent detail record and no
    /// tab is opened.
    pub async fn visit<D: BrowserDriver>(&self, driver: &D, base: BaseRecord) -> EnrichedRecord {
        let Some(detail_url) = base.detail_url.clone() else {
            debug!("Entry {}: no detail URL, nothing to visit", base.index);
            return EnrichedRecord::merge(base, DetailRecord::absent(Utc::now()));
        };

        let position = base.index;
        let scraped = with_scoped_tab(driver, || {
            self.scrape_detail(driver, &detail_url, position)
        })
        .await;

        match scraped {
            Ok(detail) => EnrichedRecord::merge(base, detail),
            Err(e) => {
                warn!("Entry {position}: detail visit to {detail_url} failed: {e:#}");
                EnrichedRecord::merge(base, DetailRecord::absent(Utc::now()))
            }
        }
    }

    async fn scrape_detail<D: BrowserDriver>(
        &self,
        driver: &D,
        detail_url: &str,
        position: usize,
    ) -> Result<DetailRecord> {
        with_page_timeout(
            driver.navigate(detail_url),
            self.timing.page_load_timeout,
            "Detail page navigation",
        )
        .await?;

        if !driver.wait_for_ready(self.timing.readiness_timeout).await {
            debug!("Entry {position}: detail page not ready in time, reading current DOM");
        }
        settle(self.timing.detail_settle).await;

        let layout = self.layout;
        let key_facts = classify_key_facts(&extract_all(driver, None, &layout.key_facts).await);
        let sector = extract_field(driver, None, &layout.sector).await;
        let mission = extract_field(driver, None, &layout.mission).await;
        let outlet_count = extract_field(driver, None, &layout.outlet_count).await;
        let sought_solutions = extract_field(driver, None, &layout.sought_solutions).await;

        if key_facts.is_empty() {
            debug!("Entry {position}: {} not found", layout.key_facts.field);
        }
        for (strategy, value) in [
            (&layout.sector, &sector),
            (&layout.mission, &mission),
            (&layout.outlet_count, &outlet_count),
            (&layout.sought_solutions, &sought_solutions),
        ] {
            if value.is_none() {
                debug!("Entry {position}: {} not found", strategy.field);
            }
        }

        let external_profile_url =
            resolve_external_link(driver, &layout.external_link, &self.timing.redirect()).await;

        Ok(DetailRecord {
            key_facts,
            sector,
            mission,
            outlet_count,
            sought_solutions,
            external_profile_url,
            scraped_at: Utc::now(),
        })
    }
}
