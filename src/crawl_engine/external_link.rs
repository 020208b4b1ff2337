//! Resolution of a detail page's outbound profile link.
//!
//! Detail pages rarely link the external profile directly. They link a
//! forwarding endpoint on the catalog site, which redirects to the profile,
//! and the profile site may in turn park anonymous visitors on an
//! authentication wall that carries the real destination in a query
//! parameter. The forwarding link is followed in a nested scoped tab and the
//! landing URL is classified.

use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::page_timeout::{settle, with_page_timeout};
use super::tab_scope::with_scoped_tab;
use crate::driver::BrowserDriver;
use crate::page_extractor::{SelectorStrategy, extract_field};
use crate::utils::{absolutize_href, strip_query};

pub const FORWARDING_LINK: SelectorStrategy = SelectorStrategy::attribute(
    "forwardingLink",
    &["a[href*='forward/'][target='_blank']"],
    "href",
);

pub const DIRECT_PROFILE_LINK: SelectorStrategy =
    SelectorStrategy::attribute("directProfileLink", &["a[href*='linkedin.com/in/']"], "href");

/// Where outbound links live and how their landing URLs are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalLinkPolicy {
    pub forwarding_link: SelectorStrategy,
    pub direct_link: SelectorStrategy,
    /// Substrings identifying an authentication wall URL
    pub auth_wall_markers: &'static [&'static str],
    /// Query parameter holding the wall's percent-encoded destination
    pub redirect_param: &'static str,
    /// Substring identifying a canonical profile URL
    pub canonical_marker: &'static str,
}

impl Default for ExternalLinkPolicy {
    fn default() -> Self {
        Self {
            forwarding_link: FORWARDING_LINK,
            direct_link: DIRECT_PROFILE_LINK,
            auth_wall_markers: &["linkedin.com/authwall", "sessionRedirect"],
            redirect_param: "sessionRedirect",
            canonical_marker: "linkedin.com/in/",
        }
    }
}

/// Classified landing URL of a followed forwarding link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution {
    /// Destination decoded from an authentication wall
    AuthWall(String),
    /// Already a profile URL, query removed
    Canonical(String),
    /// Unrecognized landing URL, kept as is
    Verbatim(String),
}

impl LinkResolution {
    #[must_use]
    pub fn into_url(self) -> String {
        match self {
            Self::AuthWall(url) | Self::Canonical(url) | Self::Verbatim(url) => url,
        }
    }
}

/// Decoded value of `param` in `url`'s query string.
///
/// Only percent-escapes are decoded; a literal `+` is kept.
fn embedded_destination(url: &str, param: &str) -> Option<String> {
    let raw = match Url::parse(url) {
        Ok(parsed) => parsed.query()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == param).then(|| value.to_string())
        })?,
        Err(_) => {
            let tail = url.split(&format!("{param}=")).nth(1)?;
            tail.split('&').next().unwrap_or(tail).to_string()
        }
    };
    let decoded = urlencoding::decode(&raw).ok().map(|value| value.into_owned());
    Some(decoded.unwrap_or(raw))
}

/// Classify the URL a forwarding link landed on.
#[must_use]
pub fn classify_destination(final_url: &str, policy: &ExternalLinkPolicy) -> LinkResolution {
    let behind_wall = policy
        .auth_wall_markers
        .iter()
        .any(|marker| final_url.contains(marker));

    if behind_wall
        && let Some(destination) = embedded_destination(final_url, policy.redirect_param)
        && !destination.is_empty()
    {
        return LinkResolution::AuthWall(strip_query(&destination).to_string());
    }

    if !behind_wall && final_url.contains(policy.canonical_marker) {
        return LinkResolution::Canonical(strip_query(final_url).to_string());
    }

    LinkResolution::Verbatim(final_url.to_string())
}

/// Waits applied while following a forwarding link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectTiming {
    pub page_load_timeout: Duration,
    pub redirect_settle: Duration,
}

async fn follow_forwarding_link<D: BrowserDriver>(
    driver: &D,
    forwarding_url: &str,
    timing: &RedirectTiming,
) -> anyhow::Result<String> {
    with_scoped_tab(driver, || async move {
        with_page_timeout(
            driver.navigate(forwarding_url),
            timing.page_load_timeout,
            "Forwarding link navigation",
        )
        .await?;
        settle(timing.redirect_settle).await;
        driver.current_url().await
    })
    .await
}

/// Outbound profile URL of the focused detail page, or `""` if it has none.
///
/// Focus is back on the detail page when this returns.
pub async fn resolve_external_link<D: BrowserDriver>(
    driver: &D,
    policy: &ExternalLinkPolicy,
    timing: &RedirectTiming,
) -> String {
    if let Some(href) = extract_field(driver, None, &policy.forwarding_link).await {
        let page_url = driver.current_url().await.unwrap_or_default();
        let forwarding_url = absolutize_href(&href, &page_url);
        debug!("Following forwarding link {forwarding_url}");

        return match follow_forwarding_link(driver, &forwarding_url, timing).await {
            Ok(final_url) => match classify_destination(&final_url, policy) {
                LinkResolution::Verbatim(url) => {
                    warn!("Forwarding link landed on unrecognized URL {url}");
                    url
                }
                resolved => {
                    info!("External profile resolved: {resolved:?}");
                    resolved.into_url()
                }
            },
            Err(e) => {
                warn!("Failed to follow forwarding link, keeping it as is: {e:#}");
                forwarding_url
            }
        };
    }

    match extract_field(driver, None, &policy.direct_link).await {
        Some(url) => {
            debug!("Direct external profile link {url}");
            url
        }
        None => {
            debug!("No external profile link on page");
            String::new()
        }
    }
}
