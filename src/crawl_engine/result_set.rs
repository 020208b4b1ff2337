use serde::{Deserialize, Serialize};

use crate::page_extractor::EnrichedRecord;

/// Ordered output of one run, in catalog scan order.
///
/// Only the orchestrator appends; everyone else reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<EnrichedRecord>,
    #[serde(skip)]
    cancelled: bool,
}

impl ResultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: EnrichedRecord) {
        self.records.push(record);
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<EnrichedRecord> {
        self.records
    }

    /// Whether the run stopped early on a cancellation request.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl FromIterator<EnrichedRecord> for ResultSet {
    fn from_iter<I: IntoIterator<Item = EnrichedRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
            cancelled: false,
        }
    }
}
