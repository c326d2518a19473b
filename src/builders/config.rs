//! Configuration Builder
//!
//! Fluent builder for catalog client configuration.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::{CatalogResult, ConfigurationError};
use crate::types::{
    CatalogConfig, ClientAuthMethod, ClientCredentials, DEFAULT_MAX_RESPONSE_SIZE,
    DEFAULT_REFRESH_BUFFER_SECS, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_TTL_SECS,
};

/// Catalog configuration builder.
pub struct CatalogConfigBuilder {
    base_url: Option<String>,
    token_endpoint: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    auth_method: ClientAuthMethod,
    scopes: Vec<String>,
    timeout: Duration,
    refresh_buffer: Duration,
    default_token_ttl: Duration,
    max_response_size: usize,
}

impl Default for CatalogConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            token_endpoint: None,
            client_id: None,
            client_secret: None,
            auth_method: ClientAuthMethod::default(),
            scopes: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            refresh_buffer: Duration::from_secs(DEFAULT_REFRESH_BUFFER_SECS),
            default_token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }

    /// Set catalog base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set token endpoint.
    pub fn token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = Some(endpoint.into());
        self
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set client authentication method.
    pub fn auth_method(mut self, method: ClientAuthMethod) -> Self {
        self.auth_method = method;
        self
    }

    /// Add a scope to request.
    pub fn add_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the early-refresh window for cached tokens.
    pub fn refresh_buffer(mut self, buffer: Duration) -> Self {
        self.refresh_buffer = buffer;
        self
    }

    /// Set the lifetime assumed for tokens without `expires_in`.
    pub fn default_token_ttl(mut self, ttl: Duration) -> Self {
        self.default_token_ttl = ttl;
        self
    }

    /// Set maximum response body size.
    pub fn max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = bytes;
        self
    }

    /// Build the catalog configuration.
    pub fn build(self) -> CatalogResult<CatalogConfig> {
        let base_url = parse_endpoint("base_url", self.base_url)?;
        let token_endpoint = parse_endpoint("token_endpoint", self.token_endpoint)?;

        let client_id = self
            .client_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| missing("client_id"))?;
        let client_secret = self.client_secret.ok_or_else(|| missing("client_secret"))?;

        if self.timeout.is_zero() {
            return Err(ConfigurationError::InvalidValue {
                field: "timeout".to_string(),
                message: "must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(CatalogConfig {
            base_url,
            token_endpoint,
            credentials: ClientCredentials {
                client_id,
                client_secret,
                auth_method: self.auth_method,
            },
            scopes: self.scopes,
            timeout: self.timeout,
            refresh_buffer: self.refresh_buffer,
            default_token_ttl: self.default_token_ttl,
            max_response_size: self.max_response_size,
        })
    }
}

fn missing(field: &str) -> ConfigurationError {
    ConfigurationError::MissingField {
        field: field.to_string(),
    }
}

fn parse_endpoint(field: &str, raw: Option<String>) -> Result<Url, ConfigurationError> {
    let raw = raw.ok_or_else(|| missing(field))?;
    let invalid = || ConfigurationError::InvalidEndpoint {
        field: field.to_string(),
        url: raw.clone(),
    };

    let url = Url::parse(&raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

/// Create a new catalog configuration builder.
pub fn catalog_config() -> CatalogConfigBuilder {
    CatalogConfigBuilder::new()
}
