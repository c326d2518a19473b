//! Catalog Core Components
//!
//! HTTP transport, bearer authentication and request URI construction.

pub mod auth;
pub mod transport;
pub mod uri;

pub use auth::*;
pub use transport::*;
pub use uri::*;
