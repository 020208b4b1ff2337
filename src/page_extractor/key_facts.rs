//! Classification of the "key facts" list on a detail page.
//!
//! The list is free text, one fact per `li`. Labelled facts carry a
//! `Label : value` prefix; expertise lines carry no label at all.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

pub const HEADCOUNT: &str = "headcount";
pub const REVENUE: &str = "revenue";
pub const EXPERTISE: &str = "expertise";

static HEADCOUNT_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Effectifs\s*:?\s*").expect("Invalid headcount label regex"));

static REVENUE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Chiffre d['’]affaires\s*:?\s*").expect("Invalid revenue label regex")
});

static EXPERTISE_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)transformation|digital|retail|tech").expect("Invalid expertise keyword regex")
});

/// Map each fact line to its named metric.
///
/// Lines matching nothing are dropped. When two lines map to the same
/// metric the later one wins.
#[must_use]
pub fn classify_key_facts(lines: &[String]) -> BTreeMap<String, String> {
    let mut facts = BTreeMap::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(label) = HEADCOUNT_LABEL.find(line) {
            facts.insert(HEADCOUNT.to_string(), line[label.end()..].to_string());
        } else if let Some(label) = REVENUE_LABEL.find(line) {
            facts.insert(REVENUE.to_string(), line[label.end()..].to_string());
        } else if EXPERTISE_KEYWORDS.is_match(line) {
            facts.insert(EXPERTISE.to_string(), line.to_string());
        }
    }

    facts
}
