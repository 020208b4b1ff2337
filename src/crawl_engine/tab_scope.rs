//! Scoped secondary tabs.
//!
//! A detail visit, and the redirect lookup nested inside it, each work in a
//! throwaway tab. [`with_scoped_tab`] opens the tab, focuses it, runs the
//! body, then closes it and refocuses the tab that was active before, on
//! every exit path. Tab count and focus after the call equal those before.

use anyhow::{Result, anyhow};
use std::future::Future;
use tracing::{trace, warn};

use crate::driver::BrowserDriver;

/// Run `body` with a freshly opened tab focused.
///
/// The body's result is returned unchanged; release problems are logged
/// and never mask it.
pub async fn with_scoped_tab<D, F, Fut, T>(driver: &D, body: F) -> Result<T>
where
    D: BrowserDriver,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let origin = driver.current_tab().await?;
    let opened = driver.open_tab().await?;
    trace!("Scoped tab {:?} opened from {:?}", opened, origin);

    if let Err(e) = driver.switch_to_tab(&opened).await {
        release(driver, &opened, &origin).await;
        return Err(anyhow!("Failed to focus scoped tab: {e:#}"));
    }

    let outcome = body().await;
    release(driver, &opened, &origin).await;
    outcome
}

async fn release<D: BrowserDriver>(driver: &D, opened: &D::TabHandle, origin: &D::TabHandle) {
    let focused_on_opened = match driver.current_tab().await {
        Ok(current) if current == *opened => true,
        _ => match driver.switch_to_tab(opened).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Scoped tab {:?} no longer reachable: {e:#}", opened);
                false
            }
        },
    };

    if focused_on_opened && let Err(e) = driver.close_current_tab().await {
        warn!("Failed to close scoped tab {:?}: {e:#}", opened);
    }

    if let Err(e) = driver.switch_to_tab(origin).await {
        warn!("Failed to refocus tab {:?}: {e:#}", origin);
    }
}
