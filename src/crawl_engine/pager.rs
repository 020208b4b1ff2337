//! "Load more" pagination over the catalog page.
//!
//! The catalog renders a first batch of entries and appends more each time
//! the load-more control is activated. The control is not reliable: it may
//! stay visible after the last batch, or stop responding. Pagination ends on
//! the first iteration that adds nothing.

use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info};

use super::page_timeout::settle;
use crate::driver::BrowserDriver;
use crate::page_extractor::CatalogLayout;

/// Timing and bounds for one pagination pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerSettings {
    /// How long to wait for the control to become actionable
    pub control_timeout: Duration,
    pub scroll_settle: Duration,
    pub load_more_settle: Duration,
    pub max_activations: usize,
}

/// Why pagination stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStop {
    /// Control absent, never actionable, or failed to activate
    NoControl,
    /// An activation added no entries
    Stalled,
    /// Activation cap reached while entries were still growing
    ActivationCap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSummary {
    /// Entries rendered when pagination stopped
    pub total: usize,
    /// Container selector that matched on the last count
    pub container_selector: Option<&'static str>,
    pub activations: usize,
    pub stop: PaginationStop,
}

/// Count rendered entries with the first container selector that matches.
pub async fn count_items<D: BrowserDriver>(
    driver: &D,
    containers: &[&'static str],
) -> (usize, Option<&'static str>) {
    for &selector in containers {
        match driver.query(selector, None).await {
            Ok(items) if !items.is_empty() => return (items.len(), Some(selector)),
            Ok(_) => {}
            Err(e) => debug!("Container selector '{selector}' failed: {e:#}"),
        }
    }
    (0, None)
}

async fn activate<D: BrowserDriver>(
    driver: &D,
    control: &D::Element,
    settings: &PagerSettings,
) -> Result<()> {
    driver.scroll_into_view(control).await?;
    settle(settings.scroll_settle).await;
    driver.click(control).await?;
    settle(settings.load_more_settle).await;
    Ok(())
}

/// Activate the load-more control until the entry count stops growing.
///
/// Never fails: trouble with the control ends pagination with the last
/// observed count.
pub async fn load_all<D: BrowserDriver>(
    driver: &D,
    layout: &CatalogLayout,
    settings: &PagerSettings,
) -> PaginationSummary {
    let (mut total, mut container_selector) = count_items(driver, layout.containers).await;
    let mut activations = 0;
    debug!("Catalog shows {total} entries before pagination");

    let stop = loop {
        if activations >= settings.max_activations {
            break PaginationStop::ActivationCap;
        }

        let Some(control) = driver
            .wait_for_actionable(layout.load_more_control, settings.control_timeout)
            .await
        else {
            break PaginationStop::NoControl;
        };

        if let Err(e) = activate(driver, &control, settings).await {
            debug!("Load-more activation failed, treating as exhausted: {e:#}");
            break PaginationStop::NoControl;
        }
        activations += 1;

        let (after, selector) = count_items(driver, layout.containers).await;
        let grew = after > total;
        total = after;
        container_selector = selector.or(container_selector);

        if !grew {
            break PaginationStop::Stalled;
        }
        debug!("Load-more activation {activations}: {total} entries");
    };

    info!("Pagination finished after {activations} activations ({stop:?}): {total} entries");

    PaginationSummary {
        total,
        container_selector,
        activations,
        stop,
    }
}
