//! Builders
//!
//! Fluent builders for catalog configuration.

pub mod config;

pub use config::{catalog_config, CatalogConfigBuilder};
