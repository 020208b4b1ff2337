use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fields read from one catalog entry.
///
/// `None` means every strategy for that field missed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRecord {
    /// 1-based catalog position at scrape time
    pub index: usize,
    pub company: Option<String>,
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    /// Absolute detail page URL; `None` when the entry links nowhere
    pub detail_url: Option<String>,
    /// Empty when the entry has no avatar
    pub avatar_url: String,
}

/// Fields read from one entry's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    /// Only the facts that were found appear as keys
    pub key_facts: BTreeMap<String, String>,
    pub sector: Option<String>,
    pub mission: Option<String>,
    pub outlet_count: Option<String>,
    pub sought_solutions: Option<String>,
    /// Empty when no outbound profile link exists
    pub external_profile_url: String,
    pub scraped_at: DateTime<Utc>,
}

impl DetailRecord {
    /// Record with every optional field unset.
    #[must_use]
    pub fn absent(scraped_at: DateTime<Utc>) -> Self {
        Self {
            key_facts: BTreeMap::new(),
            sector: None,
            mission: None,
            outlet_count: None,
            sought_solutions: None,
            external_profile_url: String::new(),
            scraped_at,
        }
    }

    /// True when nothing beyond the timestamp was captured.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.key_facts.is_empty()
            && self.sector.is_none()
            && self.mission.is_none()
            && self.outlet_count.is_none()
            && self.sought_solutions.is_none()
            && self.external_profile_url.is_empty()
    }
}

/// One output row: a base record merged with its detail record.
///
/// The two halves have disjoint field names, so the flattened JSON object
/// carries the union of both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub base: BaseRecord,
    #[serde(flatten)]
    pub detail: DetailRecord,
}

impl EnrichedRecord {
    #[must_use]
    pub fn merge(base: BaseRecord, detail: DetailRecord) -> Self {
        Self { base, detail }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.base.index
    }
}
