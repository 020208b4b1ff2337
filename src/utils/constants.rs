//! Shared configuration constants for the catalog enricher
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default number of catalog entries to enrich when none is requested.
pub const DEFAULT_REQUEST_COUNT: usize = 2;

/// Default 1-based catalog position to start from.
pub const DEFAULT_REQUEST_START: usize = 1;

/// Timeout for a single page navigation.
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Timeout for `document.readyState === 'complete'` waits.
pub const DEFAULT_READINESS_TIMEOUT_SECS: u64 = 15;

/// Timeout for the "load more" control to become actionable.
pub const DEFAULT_CONTROL_TIMEOUT_SECS: u64 = 15;

/// Pause after scrolling the "load more" control into view.
pub const DEFAULT_SCROLL_SETTLE_MS: u64 = 1_000;

/// Pause after activating the "load more" control so new entries can render.
pub const DEFAULT_LOAD_MORE_SETTLE_MS: u64 = 3_000;

/// Pause after a detail page reports ready, for client-side sections.
pub const DEFAULT_DETAIL_SETTLE_MS: u64 = 2_000;

/// Pause after following a forwarding link so the redirect chain completes.
pub const DEFAULT_REDIRECT_SETTLE_MS: u64 = 3_000;

/// Pause between two catalog entries.
pub const DEFAULT_ITEM_DELAY_MS: u64 = 1_000;

/// Upper bound on "load more" activations in one pagination pass.
///
/// The stall rule normally ends pagination long before this; the cap only
/// matters for a control that keeps adding entries forever.
pub const DEFAULT_MAX_LOAD_MORE_ACTIVATIONS: usize = 500;

/// Poll interval used by bounded condition waits.
pub const WAIT_POLL_INTERVAL_MS: u64 = 100;

/// Catalog ordering control selected before paging ("latest registrations").
pub const DEFAULT_SORT_OPTION_SELECTOR: &str = "#orderBy_2";

/// Chrome user agent string presented by the launched browser
///
/// Chrome releases new stable versions ~every 4 weeks.
/// Update quarterly to stay within reasonable version window.
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
