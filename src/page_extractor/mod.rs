//! Field extraction for catalog entries and detail pages.
//!
//! Strategy tables describe where each field may live; the extractors walk
//! them in order and stop at the first non-empty value.

pub mod extractors;
pub mod key_facts;
pub mod schema;
pub mod strategies;

pub use extractors::{extract_all, extract_base_record, extract_field};
pub use key_facts::classify_key_facts;
pub use schema::{BaseRecord, DetailRecord, EnrichedRecord};
pub use strategies::{CatalogLayout, DetailLayout, ReadMode, SelectorStrategy};
