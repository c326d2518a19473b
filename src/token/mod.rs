//! Token Management
//!
//! Access token caching and single-flight refresh.

pub mod manager;

pub use manager::{
    create_mock_token_manager, CachingTokenManager, MockTokenManager, TokenManager,
    TokenManagerConfig,
};
