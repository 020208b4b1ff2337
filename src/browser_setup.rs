//! Locate or download Chrome and launch it for automation.

use anyhow::{Context, Result, anyhow};
use chromiumoxide::Handler;
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::utils::constants::CHROME_USER_AGENT;

#[cfg(target_os = "windows")]
const INSTALL_LOCATIONS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files\Chromium\Application\chrome.exe",
];

#[cfg(target_os = "macos")]
const INSTALL_LOCATIONS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/opt/homebrew/bin/chromium",
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const INSTALL_LOCATIONS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    "/opt/google/chrome/chrome",
];

const PATH_COMMANDS: &[&str] = &["chromium", "chromium-browser", "google-chrome", "chrome"];

/// Flags passed to every launch besides the user agent.
///
/// The catalog site serves a reduced page to browsers that advertise
/// automation, and opens profile links with `target=_blank`.
const CHROME_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-notifications",
    "--disable-popup-blocking",
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--no-first-run",
    "--no-default-browser-check",
    "--no-sandbox",
    "--password-store=basic",
    "--mute-audio",
];

fn expand_home(raw: &str) -> Option<PathBuf> {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(raw)),
    }
}

fn which(command: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(command).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!found.is_empty()).then(|| PathBuf::from(found))
}

/// Find a Chrome/Chromium executable.
///
/// `CHROMIUM_PATH` wins when it points at an existing file; then the
/// platform's usual install locations; then `which` on Unix.
pub async fn find_browser_executable() -> Result<PathBuf> {
    if let Some(configured) = std::env::var_os("CHROMIUM_PATH").map(PathBuf::from) {
        if configured.exists() {
            info!("Using browser from CHROMIUM_PATH: {}", configured.display());
            return Ok(configured);
        }
        warn!("CHROMIUM_PATH does not exist: {}", configured.display());
    }

    if let Some(installed) = INSTALL_LOCATIONS
        .iter()
        .filter_map(|raw| expand_home(raw))
        .find(|path| path.exists())
    {
        info!("Found browser at {}", installed.display());
        return Ok(installed);
    }

    if !cfg!(target_os = "windows")
        && let Some(on_path) = PATH_COMMANDS.iter().find_map(|cmd| which(cmd))
    {
        info!("Found browser on PATH: {}", on_path.display());
        return Ok(on_path);
    }

    Err(anyhow!("No Chrome/Chromium executable found"))
}

/// Download a managed Chromium into the user cache directory.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("catalog_enricher")
        .join("chromium");
    info!("Downloading managed Chromium into {}", cache_dir.display());

    tokio::fs::create_dir_all(&cache_dir)
        .await
        .with_context(|| format!("Failed to create {}", cache_dir.display()))?;

    let options = BrowserFetcherOptions::builder()
        .with_path(&cache_dir)
        .build()
        .context("Invalid browser fetcher options")?;
    let installed = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Chromium download failed")?;

    Ok(installed.executable_path)
}

/// Poll the CDP connection until it closes.
async fn drive_handler(mut handler: Handler) {
    while let Some(event) = handler.next().await {
        let Err(e) = event else { continue };
        let message = e.to_string();

        // Events chromiumoxide cannot deserialize are harmless
        // (mattsse/chromiumoxide#167, #229).
        if message.contains("data did not match any variant of untagged enum Message")
            || message.contains("Failed to deserialize WS response")
        {
            trace!("Ignored undecodable CDP event: {message}");
        } else {
            error!("Browser connection error: {e:?}");
        }
    }
    debug!("Browser connection closed");
}

/// Launch Chrome with automation markers suppressed.
///
/// Returns the browser, the task driving its CDP connection, and the user
/// data directory (removed again by cleanup).
pub async fn launch_browser(
    headless: bool,
    chrome_data_dir: Option<PathBuf>,
) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let executable = match find_browser_executable().await {
        Ok(path) => path,
        Err(e) => {
            warn!("{e}, falling back to a managed build");
            download_managed_browser().await?
        }
    };

    let data_dir = chrome_data_dir.unwrap_or_else(|| {
        std::env::temp_dir().join(format!("catalog_enricher_chrome_{}", std::process::id()))
    });
    tokio::fs::create_dir_all(&data_dir)
        .await
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    let builder = BrowserConfigBuilder::default()
        .chrome_executable(executable)
        .user_data_dir(data_dir.clone())
        .request_timeout(Duration::from_secs(30))
        .window_size(1920, 1080)
        .arg(format!("--user-agent={CHROME_USER_AGENT}"))
        .args(CHROME_ARGS.iter().copied());
    let builder = if headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };
    let browser_config = builder
        .build()
        .map_err(|e| anyhow!("Invalid browser configuration: {e}"))?;

    info!("Launching browser (headless: {headless})");
    let (browser, handler) = Browser::launch(browser_config)
        .await
        .context("Failed to launch browser")?;

    Ok((browser, tokio::spawn(drive_handler(handler)), data_dir))
}
