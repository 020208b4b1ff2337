//! Configuration module for catalog enrichment
//!
//! This module provides the `EnrichConfig` struct and its type-safe builder
//! for configuring enrichment runs with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{EnrichConfigBuilder, WithCatalogUrl};
pub use types::EnrichConfig;
