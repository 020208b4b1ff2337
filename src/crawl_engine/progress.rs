//! Progress reporting abstraction for enrichment runs
//!
//! Defines the `ProgressReporter` trait for lifecycle event reporting
//! and provides no-op and logging implementations.

use log::{info, warn};

use crate::page_extractor::BaseRecord;

/// Trait for reporting run progress at key lifecycle events
///
/// Implementations can send updates to channels, log to console, update UI, etc.
/// Positions are 1-based catalog positions.
pub trait ProgressReporter: Send + Sync {
    /// Pagination finished with `total` entries rendered
    fn catalog_loaded(&self, total: usize);

    /// Zero-based `[begin, end)` slice about to be processed
    fn range_resolved(&self, begin: usize, end: usize);

    /// Base fields of an entry were read
    fn item_started(&self, position: usize, base: &BaseRecord);

    /// Entry was enriched and appended to the result set
    fn item_completed(&self, position: usize);

    /// Entry was passed over without a detail visit
    fn item_skipped(&self, position: usize, reason: &str);

    /// Entry could not be processed at all
    fn item_failed(&self, position: usize, error: &str);

    /// Run finished with `collected` records
    fn completed(&self, collected: usize);
}

/// Progress reporter that does nothing
///
/// All methods are no-ops and will be inlined away by the compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn catalog_loaded(&self, _total: usize) {}

    #[inline(always)]
    fn range_resolved(&self, _begin: usize, _end: usize) {}

    #[inline(always)]
    fn item_started(&self, _position: usize, _base: &BaseRecord) {}

    #[inline(always)]
    fn item_completed(&self, _position: usize) {}

    #[inline(always)]
    fn item_skipped(&self, _position: usize, _reason: &str) {}

    #[inline(always)]
    fn item_failed(&self, _position: usize, _error: &str) {}

    #[inline(always)]
    fn completed(&self, _collected: usize) {}
}

/// Progress reporter that writes every event to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn catalog_loaded(&self, total: usize) {
        info!(target: "catalog_enricher::progress", "{total} catalog entries loaded");
    }

    fn range_resolved(&self, begin: usize, end: usize) {
        info!(
            target: "catalog_enricher::progress",
            "Processing entries {} to {} ({} total)",
            begin + 1,
            end,
            end.saturating_sub(begin)
        );
    }

    fn item_started(&self, position: usize, base: &BaseRecord) {
        info!(
            target: "catalog_enricher::progress",
            "Entry {position}: {} / {}",
            base.full_name.as_deref().unwrap_or("?"),
            base.company.as_deref().unwrap_or("?")
        );
    }

    fn item_completed(&self, position: usize) {
        info!(target: "catalog_enricher::progress", "Entry {position} enriched");
    }

    fn item_skipped(&self, position: usize, reason: &str) {
        warn!(target: "catalog_enricher::progress", "Entry {position} skipped: {reason}");
    }

    fn item_failed(&self, position: usize, error: &str) {
        warn!(target: "catalog_enricher::progress", "Entry {position} failed: {error}");
    }

    fn completed(&self, collected: usize) {
        info!(target: "catalog_enricher::progress", "Run finished with {collected} records");
    }
}
