//! Timeout utilities for page operations
//!
//! Provides async timeout wrappers to prevent indefinite hangs during
//! page navigation, and bounded polling waits that stand in for
//! "wait until the page shows X".

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::utils::WAIT_POLL_INTERVAL_MS;

/// Helper function to wrap async page operations with explicit timeout
///
/// Prevents indefinite hangs on page operations by applying `tokio::time::timeout`.
/// Returns proper error messages distinguishing between timeout and operation failures.
///
/// # Arguments
/// * `operation` - The async Future to execute with a timeout
/// * `timeout` - Upper bound for the operation
/// * `operation_name` - Human-readable name for error messages
pub async fn with_page_timeout<F, T>(operation: F, timeout: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {:.1} seconds",
            timeout.as_secs_f64()
        )),
    }
}

/// Poll `check` until it yields a value or `timeout` elapses.
///
/// The check runs at least once, even with a zero timeout. Returns `None`
/// on timeout; callers decide whether that is fatal (it almost never is).
pub async fn poll_until<F, Fut, T>(mut check: F, timeout: Duration) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let start = Instant::now();
    let poll_interval = Duration::from_millis(WAIT_POLL_INTERVAL_MS);

    loop {
        if let Some(value) = check().await {
            return Some(value);
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return None;
        }

        tokio::time::sleep(poll_interval.min(timeout - elapsed)).await;
    }
}

/// Bounded `waitUntil(predicate, timeout)`. Returns whether the condition held.
pub async fn wait_until<F, Fut>(mut condition: F, timeout: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    poll_until(
        move || {
            let check = condition();
            async move { check.await.then_some(()) }
        },
        timeout,
    )
    .await
    .is_some()
}

/// Fixed pause after a UI action; skipped entirely for a zero duration.
pub async fn settle(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
