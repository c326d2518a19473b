//! Beer Catalog Integration Module
//!
//! Typed async client for a beer catalog REST service protected by OAuth2
//! client credentials.
//!
//! # Features
//!
//! - Client Credentials Flow (RFC 6749 Section 4.4) with `client_secret_basic`
//!   or `client_secret_post`
//! - Cached access token with single-flight refresh shared by all tasks
//! - One token refresh and retry when the catalog answers 401
//! - Paged listing with name, style, inventory and paging filters
//! - Create, read, update and delete of beer records
//!
//! # Example
//!
//! ```rust,ignore
//! use beer_catalog_integration::{catalog_config, BeerDto, BeerQuery, BeerStyle, CatalogClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = catalog_config()
//!         .base_url("http://localhost:8080")
//!         .token_endpoint("http://localhost:9000/oauth2/token")
//!         .client_id("messaging-client")
//!         .client_secret("secret")
//!         .add_scope("message.read")
//!         .add_scope("message.write")
//!         .build()?;
//!
//!     let client = CatalogClient::new(config)?;
//!
//!     let created = client
//!         .create(&BeerDto::new("Mango Bobs", BeerStyle::Ale).with_quantity_on_hand(500))
//!         .await?;
//!     println!("Created {:?}", created.id);
//!
//!     let page = client
//!         .list(Some(&BeerQuery::new().style(BeerStyle::Ale).page_size(10)))
//!         .await?;
//!     for beer in &page {
//!         println!("{} ({})", beer.beer_name, beer.beer_style);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: records, queries, configuration and token types
//! - `error`: error hierarchy and status mapping
//! - `core`: HTTP transport, authenticated transport, request URIs
//! - `flows`: client credentials token flow
//! - `token`: token caching and single-flight refresh
//! - `pagination`: page envelope decoding
//! - `builders`: fluent configuration builder
//! - `client`: high-level catalog client

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod flows;
pub mod pagination;
pub mod token;
pub mod types;

// Re-export main client
pub use client::{catalog_client, CatalogClient, DefaultTokenManager};

// Re-export builders
pub use builders::{catalog_config, CatalogConfigBuilder};

// Re-export errors
pub use error::{
    create_error_from_response, map_token_error, parse_error_response, AuthError, CatalogError,
    CatalogResult, ConfigurationError, DecodeError, NetworkError, OAuth2ErrorResponse,
    ValidationError,
};

// Re-export types
pub use types::{
    // Records
    BeerDto, BeerId, BeerStyle, UnknownBeerStyle,
    // Query
    BeerQuery,
    // Config
    CatalogConfig, ClientAuthMethod, ClientCredentials,
    // Token
    AccessToken, TokenResponse,
};

// Re-export pagination
pub use pagination::{decode_page, decode_record, Page};

// Re-export core components
pub use core::{
    // Transport
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
    // Authentication
    AuthenticatedTransport,
    // URIs
    build_collection_uri, build_instance_uri, build_list_uri,
};

// Re-export flows
pub use flows::{ClientCredentialsFlow, ClientCredentialsFlowImpl, MockClientCredentialsFlow};

// Re-export token management
pub use token::{CachingTokenManager, MockTokenManager, TokenManager, TokenManagerConfig};
