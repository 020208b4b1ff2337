use std::path::{Path, PathBuf};

use crate::crawl_engine::crawl_types::CrawlResult;

/// Write a PNG capture to `<dir>/<prefix>_<unix>.png`.
pub async fn save_debug_screenshot(png: &[u8], dir: &Path, prefix: &str) -> CrawlResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{prefix}_{}.png", chrono::Utc::now().timestamp()));
    tokio::fs::write(&path, png).await?;
    Ok(path)
}
