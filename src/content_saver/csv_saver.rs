use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;

use serde_json::Value;

use crate::crawl_engine::crawl_types::{CrawlError, CrawlResult};
use crate::crawl_engine::result_set::ResultSet;
use crate::page_extractor::EnrichedRecord;

const BLOCKING_SERIALIZATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Prefix of the columns holding individual key facts.
const KEY_FACTS_PREFIX: &str = "keyFacts.";

/// One record as column name to cell text.
///
/// Field names follow the JSON export; the key-facts map is spread into
/// `keyFacts.<name>` columns and nulls become empty cells.
fn flatten_record(record: &EnrichedRecord) -> CrawlResult<BTreeMap<String, String>> {
    let value = serde_json::to_value(record)
        .map_err(|e| CrawlError::Io(format!("CSV row serialization failed: {e}")))?;
    let Value::Object(fields) = value else {
        return Err(CrawlError::Io("CSV row is not an object".to_string()));
    };

    let mut row = BTreeMap::new();
    for (name, value) in fields {
        match value {
            Value::Object(facts) if name == "keyFacts" => {
                for (fact, text) in facts {
                    row.insert(format!("{KEY_FACTS_PREFIX}{fact}"), cell_text(text));
                }
            }
            other => {
                row.insert(name, cell_text(other));
            }
        }
    }
    Ok(row)
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Render records as CSV text with a header of every column any record has.
///
/// Columns are sorted by name; a record lacking a column gets an empty cell.
pub fn render_csv(records: &[EnrichedRecord]) -> CrawlResult<String> {
    let rows = records
        .iter()
        .map(flatten_record)
        .collect::<CrawlResult<Vec<_>>>()?;
    let header: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record(header.iter().copied())
        .map_err(|e| CrawlError::Io(format!("CSV header write failed: {e}")))?;
    for row in &rows {
        writer
            .write_record(
                header
                    .iter()
                    .map(|column| row.get(*column).map_or("", String::as_str)),
            )
            .map_err(|e| CrawlError::Io(format!("CSV row write failed: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CrawlError::Io(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| CrawlError::Io(format!("CSV is not UTF-8: {e}")))
}

/// Write a result set as CSV to `<output_dir>/enriched_records_<unix>.csv`.
///
/// Returns `None` without touching the filesystem when the set is empty.
pub async fn save_result_set_csv(results: &ResultSet, output_dir: &Path) -> CrawlResult<Option<PathBuf>> {
    if results.is_empty() {
        log::info!("No records to export as CSV");
        return Ok(None);
    }

    let records = results.records().to_vec();
    let blocking_task = tokio::task::spawn_blocking(move || render_csv(&records));

    let csv_text = match timeout(BLOCKING_SERIALIZATION_TIMEOUT, blocking_task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(e)) => {
            return Err(CrawlError::Io(format!("CSV serialization task panicked: {e}")));
        }
        Err(_) => {
            log::warn!("CSV serialization timeout (timeout: {BLOCKING_SERIALIZATION_TIMEOUT:?})");
            return Err(CrawlError::Io(format!(
                "CSV serialization timed out after {BLOCKING_SERIALIZATION_TIMEOUT:?}"
            )));
        }
    };

    tokio::fs::create_dir_all(output_dir).await?;

    let path = output_dir.join(format!(
        "enriched_records_{}.csv",
        chrono::Utc::now().timestamp()
    ));
    tokio::fs::write(&path, csv_text).await?;

    log::info!("Exported {} records to {}", results.len(), path.display());
    Ok(Some(path))
}
