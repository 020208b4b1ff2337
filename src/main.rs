// Catalog enrichment CLI
//
// Usage: catalog-enrich [count] [start]
//
// count = 0 enriches every entry from start on. Site and credentials come
// from the environment (CATALOG_URL, CATALOG_LOGIN_URL, CATALOG_EMAIL,
// CATALOG_PASSWORD); see also CHROMIUM_PATH, ENRICH_HEADLESS,
// ENRICH_OUTPUT_DIR and RUST_LOG.

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_enricher::{
    CancelSignal, EnrichConfig, FormLogin, LogProgress, LoginCredentials, NoLogin,
    SelectionRequest, enrich_catalog, save_result_set, save_result_set_csv,
};

fn parse_request() -> Result<SelectionRequest> {
    let defaults = SelectionRequest::default();
    let mut args = std::env::args().skip(1);

    let count = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("count must be a non-negative integer, got '{raw}'"))?,
        None => defaults.count,
    };
    let start = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("start must be a positive integer, got '{raw}'"))?,
        None => defaults.start,
    };

    Ok(SelectionRequest::new(count, start))
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => !matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"),
        Err(_) => default,
    }
}

fn build_config() -> Result<EnrichConfig> {
    let catalog_url = std::env::var("CATALOG_URL").map_err(|_| anyhow!("CATALOG_URL is not set"))?;

    let output_dir = std::env::var("ENRICH_OUTPUT_DIR").unwrap_or_else(|_| "./output".to_string());

    // Diagnostic captures land next to the export.
    Ok(EnrichConfig::builder()
        .catalog_url(catalog_url)
        .headless(env_flag("ENRICH_HEADLESS", true))
        .output_dir(&output_dir)
        .debug_screenshot_dir(&output_dir)
        .build()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let request = parse_request()?;
    let config = build_config()?;

    let cancel = CancelSignal::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing current entry then exporting");
            on_ctrl_c.cancel();
        }
    });

    let login_url = std::env::var("CATALOG_LOGIN_URL").ok();
    let email = std::env::var("CATALOG_EMAIL").ok();
    let password = std::env::var("CATALOG_PASSWORD").ok();

    let results = match (login_url, email, password) {
        (Some(login_url), Some(email), Some(password)) => {
            let login = FormLogin::new(login_url, LoginCredentials::new(email, password));
            enrich_catalog(&config, request, &login, LogProgress, cancel).await?
        }
        _ => {
            info!("No login credentials configured, browsing anonymously");
            enrich_catalog(&config, request, &NoLogin, LogProgress, cancel).await?
        }
    };

    if results.was_cancelled() {
        warn!("Run was cancelled, exporting {} partial records", results.len());
    }

    match save_result_set(&results, config.output_dir()).await? {
        Some(path) => info!("Results written to {}", path.display()),
        None => info!("Nothing to export"),
    }
    if let Some(path) = save_result_set_csv(&results, config.output_dir()).await? {
        info!("CSV written to {}", path.display());
    }

    Ok(())
}
