//! Core types for catalog enrichment runs.
//!
//! This module contains the error type surfaced to callers of a run, the
//! caller's selection request, and the cooperative cancellation flag.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::utils::{DEFAULT_REQUEST_COUNT, DEFAULT_REQUEST_START};

/// Errors that abort a run.
///
/// Everything that can go wrong with a single field or a single entry is
/// absorbed below this level; only these reach the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CrawlError {
    /// The catalog rendered no entries after pagination
    #[error("No catalog entries found")]
    NoItemsFound,

    /// Requested start position lies outside `[1, total]`
    #[error("Start position {start} is outside the catalog (1..={total})")]
    InvalidStartPosition { start: usize, total: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Browser setup or session error
    #[error("Browser error: {0}")]
    Browser(String),

    /// Export error
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Browser(format!("{err:#}"))
    }
}

impl From<std::io::Error> for CrawlError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;

/// Which slice of the catalog to enrich.
///
/// `count == 0` means "every entry from `start` to the end".
/// `start` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub count: usize,
    pub start: usize,
}

impl SelectionRequest {
    #[must_use]
    pub fn new(count: usize, start: usize) -> Self {
        Self { count, start }
    }

    /// Every entry of the catalog.
    #[must_use]
    pub fn all() -> Self {
        Self { count: 0, start: 1 }
    }
}

impl Default for SelectionRequest {
    fn default() -> Self {
        Self {
            count: DEFAULT_REQUEST_COUNT,
            start: DEFAULT_REQUEST_START,
        }
    }
}

/// Cooperative cancellation flag checked between catalog entries.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    flag: Arc<AtomicBool>,
}

impl CancelSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
