//! End-to-end run against a real browser
//!
//! Launches Chrome, establishes the session, runs the orchestrator, and
//! tears the browser down again whatever the outcome.

use log::{info, warn};

use super::cleanup::{CleanupResult, cleanup_browser_and_data};
use super::crawl_types::{CancelSignal, CrawlError, CrawlResult, SelectionRequest};
use super::orchestrator::CatalogCrawler;
use super::progress::ProgressReporter;
use super::result_set::ResultSet;
use crate::browser_setup::launch_browser;
use crate::config::EnrichConfig;
use crate::driver::{ChromiumDriver, SessionProvider};

/// Launch a browser, sign in with `session`, and enrich `request`.
///
/// Login failure is reported as [`CrawlError::Config`] since it almost
/// always means wrong credentials or login URL.
pub async fn enrich_catalog<S, P>(
    config: &EnrichConfig,
    request: SelectionRequest,
    session: &S,
    progress: P,
    cancel: CancelSignal,
) -> CrawlResult<ResultSet>
where
    S: SessionProvider,
    P: ProgressReporter,
{
    let (browser, handler_task, chrome_data_dir) =
        launch_browser(config.headless(), config.chrome_data_dir().cloned()).await?;

    let driver = match ChromiumDriver::new(browser).await {
        Ok(driver) => driver,
        Err(e) => {
            handler_task.abort();
            return Err(e.into());
        }
    };

    let outcome = match session.establish(&driver).await {
        Ok(()) => {
            CatalogCrawler::new(&driver, config, progress)
                .with_cancel(cancel)
                .run(request)
                .await
        }
        Err(e) => Err(CrawlError::Config(format!("Login failed: {e:#}"))),
    };

    let browser = driver.into_browser().await;
    match cleanup_browser_and_data(browser, &chrome_data_dir).await {
        Ok(CleanupResult::Success) => info!("Browser shut down cleanly"),
        Ok(CleanupResult::PartialFailure(errors)) => {
            warn!("Browser cleanup incomplete: {}", errors.join("; "));
        }
        Err(e) => warn!("Browser cleanup failed: {e:#}"),
    }
    handler_task.abort();

    outcome
}
