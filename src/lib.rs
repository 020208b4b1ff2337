pub mod browser_setup;
pub mod config;
pub mod content_saver;
pub mod crawl_engine;
pub mod driver;
pub mod page_extractor;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::EnrichConfig;
pub use content_saver::{save_result_set, save_result_set_csv};
pub use crawl_engine::{
    CancelSignal, CatalogCrawler, CrawlError, CrawlResult, LogProgress, NoOpProgress,
    ProgressReporter, ResultSet, SelectionRequest, enrich_catalog,
};
pub use driver::{BrowserDriver, ChromiumDriver, FormLogin, LoginCredentials, NoLogin, SessionProvider};
pub use page_extractor::schema::*;

/// Enrich a catalog that needs no sign-in, without progress reporting.
pub async fn enrich(config: &EnrichConfig, request: SelectionRequest) -> CrawlResult<ResultSet> {
    enrich_catalog(config, request, &NoLogin, NoOpProgress, CancelSignal::new()).await
}
