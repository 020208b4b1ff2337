//! Browser, tab and resource cleanup
//!
//! Tab hygiene between catalog entries, and browser shutdown once a run
//! is over.

use anyhow::Result;
use chromiumoxide::Browser;
use log::{debug, warn};
use std::path::Path;

use crate::driver::BrowserDriver;

/// Result of cleanup operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// All cleanup operations succeeded
    Success,
    /// Some cleanup operations failed, with error details
    PartialFailure(Vec<String>),
}

/// Close every tab except `primary` and focus `primary` again.
///
/// Used after an entry failed somewhere a scoped tab could not clean up
/// behind it.
pub async fn close_stray_tabs<D: BrowserDriver>(
    driver: &D,
    primary: &D::TabHandle,
) -> CleanupResult {
    let mut errors = Vec::new();

    let tabs = match driver.list_tab_handles().await {
        Ok(tabs) => tabs,
        Err(e) => {
            warn!(target: "catalog_enricher::cleanup", "Failed to list tabs: {e:#}");
            errors.push(format!("Tab listing failed: {e:#}"));
            Vec::new()
        }
    };

    for tab in tabs.iter().filter(|tab| *tab != primary) {
        debug!(target: "catalog_enricher::cleanup", "Closing stray tab {tab:?}");
        let closed = match driver.switch_to_tab(tab).await {
            Ok(()) => driver.close_current_tab().await,
            Err(e) => Err(e),
        };
        if let Err(e) = closed {
            warn!(target: "catalog_enricher::cleanup", "Failed to close stray tab {tab:?}: {e:#}");
            errors.push(format!("Tab close failed: {e:#}"));
        }
    }

    if let Err(e) = driver.switch_to_tab(primary).await {
        warn!(target: "catalog_enricher::cleanup", "Failed to refocus primary tab: {e:#}");
        errors.push(format!("Primary refocus failed: {e:#}"));
    }

    if errors.is_empty() {
        CleanupResult::Success
    } else {
        CleanupResult::PartialFailure(errors)
    }
}

/// Clean up browser and Chrome data directory
pub async fn cleanup_browser_and_data(
    mut browser: Browser,
    chrome_data_dir: &Path,
) -> Result<CleanupResult> {
    let mut errors = Vec::new();

    debug!(target: "catalog_enricher::cleanup", "Closing browser");
    if let Err(e) = browser.close().await {
        warn!(target: "catalog_enricher::cleanup", "Failed to close browser: {e}");
        errors.push(format!("Browser close failed: {e}"));
    } else {
        debug!(target: "catalog_enricher::cleanup", "Browser closed successfully");
    }

    // Wait for browser process to fully exit (prevents "not closed manually" warning)
    debug!(target: "catalog_enricher::cleanup", "Waiting for browser process to exit");
    if let Err(e) = browser.wait().await {
        warn!(target: "catalog_enricher::cleanup", "Failed to wait for browser exit: {e}");
        errors.push(format!("Browser wait failed: {e}"));
    }

    debug!(target: "catalog_enricher::cleanup", "Cleaning up Chrome data directory");
    if let Err(e) = tokio::fs::remove_dir_all(chrome_data_dir).await {
        warn!(target: "catalog_enricher::cleanup", "Failed to clean up Chrome data directory: {e}");
        errors.push(format!("Directory cleanup failed: {e}"));
    }

    if errors.is_empty() {
        Ok(CleanupResult::Success)
    } else {
        Ok(CleanupResult::PartialFailure(errors))
    }
}
