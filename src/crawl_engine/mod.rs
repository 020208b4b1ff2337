//! Crawl Engine Module
//!
//! Pagination, range selection, detail visits and the orchestration that
//! ties them together, plus the bounded waits and tab scoping they share.

// Sub-modules
pub mod cleanup;
pub mod crawl_types;
pub mod execution;
pub mod external_link;
pub mod orchestrator;
pub mod page_timeout;
pub mod pager;
pub mod progress;
pub mod range;
pub mod result_set;
pub mod tab_scope;
pub mod visitor;

// Re-exports for public API
pub use execution::enrich_catalog;
pub use orchestrator::CatalogCrawler;
pub use progress::{LogProgress, NoOpProgress, ProgressReporter};

pub use cleanup::{CleanupResult, close_stray_tabs};
pub use crawl_types::{CancelSignal, CrawlError, CrawlResult, SelectionRequest};
pub use external_link::{ExternalLinkPolicy, LinkResolution, classify_destination, resolve_external_link};
pub use pager::{PagerSettings, PaginationStop, PaginationSummary, count_items, load_all};
pub use range::resolve_range;
pub use result_set::ResultSet;
pub use tab_scope::with_scoped_tab;
pub use visitor::{DetailVisitor, VisitTiming};
