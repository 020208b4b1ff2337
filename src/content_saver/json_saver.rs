use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;

use crate::crawl_engine::crawl_types::{CrawlError, CrawlResult};
use crate::crawl_engine::result_set::ResultSet;

/// Timeout for blocking JSON serialization
/// Prevents hangs on pathological data structures
const BLOCKING_SERIALIZATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Write a result set as a pretty JSON array to
/// `<output_dir>/enriched_records_<unix>.json`.
///
/// Returns `None` without touching the filesystem when the set is empty.
pub async fn save_result_set(results: &ResultSet, output_dir: &Path) -> CrawlResult<Option<PathBuf>> {
    if results.is_empty() {
        log::info!("No records to export");
        return Ok(None);
    }

    // Serialization off the runtime threads (owned copy for spawn_blocking)
    let records = results.clone();
    let blocking_task = tokio::task::spawn_blocking(move || serde_json::to_string_pretty(&records));

    let json_str = match timeout(BLOCKING_SERIALIZATION_TIMEOUT, blocking_task).await {
        Ok(Ok(result)) => result.map_err(|e| CrawlError::Io(format!("JSON serialization failed: {e}")))?,
        Ok(Err(e)) => {
            return Err(CrawlError::Io(format!("JSON serialization task panicked: {e}")));
        }
        Err(_) => {
            log::warn!("JSON serialization timeout (timeout: {BLOCKING_SERIALIZATION_TIMEOUT:?})");
            return Err(CrawlError::Io(format!(
                "JSON serialization timed out after {BLOCKING_SERIALIZATION_TIMEOUT:?}"
            )));
        }
    };

    tokio::fs::create_dir_all(output_dir).await?;

    let path = output_dir.join(format!(
        "enriched_records_{}.json",
        chrono::Utc::now().timestamp()
    ));
    tokio::fs::write(&path, json_str).await?;

    log::info!("Exported {} records to {}", results.len(), path.display());
    Ok(Some(path))
}
