//! Catalog Types
//!
//! Records, queries, configuration and token types.

pub mod beer;
pub mod config;
pub mod query;
pub mod token;

pub use beer::*;
pub use config::*;
pub use query::*;
pub use token::*;
