//! Configuration Types
//!
//! Resolved catalog client configuration.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::builders::CatalogConfigBuilder;
use crate::error::{CatalogResult, ConfigurationError};

/// Catalog client configuration.
///
/// Produced by [`CatalogConfigBuilder`] or [`CatalogConfig::from_env`], both of
/// which validate the endpoints.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Base URL of the catalog service (scheme, host, optional path prefix).
    pub base_url: Url,
    /// OAuth2 token endpoint.
    pub token_endpoint: Url,
    /// Client credentials.
    pub credentials: ClientCredentials,
    /// Scopes to request with the client-credentials grant.
    pub scopes: Vec<String>,
    /// Deadline for each HTTP exchange.
    pub timeout: Duration,
    /// Tokens expiring within this window are treated as expired.
    pub refresh_buffer: Duration,
    /// Lifetime assumed when the token endpoint omits `expires_in`.
    pub default_token_ttl: Duration,
    /// Maximum accepted response body size in bytes.
    pub max_response_size: usize,
}

impl CatalogConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::new()
    }

    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CATALOG_BASE_URL` (required): catalog service base URL
    /// - `CATALOG_TOKEN_ENDPOINT` (required): OAuth2 token endpoint
    /// - `CATALOG_CLIENT_ID` (required): OAuth2 client id
    /// - `CATALOG_CLIENT_SECRET` (required): OAuth2 client secret
    /// - `CATALOG_SCOPES` (optional): space-separated scopes
    /// - `CATALOG_TIMEOUT_SECS` (optional): per-request timeout in seconds
    pub fn from_env() -> CatalogResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> CatalogResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| ConfigurationError::MissingEnvironment {
                name: name.to_string(),
            })
        };

        let mut builder = CatalogConfigBuilder::new()
            .base_url(required(ENV_BASE_URL)?)
            .token_endpoint(required(ENV_TOKEN_ENDPOINT)?)
            .client_id(required(ENV_CLIENT_ID)?)
            .client_secret(required(ENV_CLIENT_SECRET)?);

        if let Some(scopes) = lookup(ENV_SCOPES) {
            for scope in scopes.split_whitespace() {
                builder = builder.add_scope(scope);
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| ConfigurationError::InvalidValue {
                    field: ENV_TIMEOUT_SECS.to_string(),
                    message: e.to_string(),
                })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }
}

/// Client credentials for the OAuth2 client-credentials grant.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Client identifier.
    pub client_id: String,
    /// Client secret.
    pub client_secret: SecretString,
    /// Client authentication method.
    pub auth_method: ClientAuthMethod,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

/// Client authentication method at the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    /// client_id and client_secret in request body.
    ClientSecretPost,
    /// HTTP Basic Authentication header.
    #[default]
    ClientSecretBasic,
}

/// Default configuration values.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REFRESH_BUFFER_SECS: u64 = 5;
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 300;
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 1024 * 1024;

pub const ENV_BASE_URL: &str = "CATALOG_BASE_URL";
pub const ENV_TOKEN_ENDPOINT: &str = "CATALOG_TOKEN_ENDPOINT";
pub const ENV_CLIENT_ID: &str = "CATALOG_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "CATALOG_CLIENT_SECRET";
pub const ENV_SCOPES: &str = "CATALOG_SCOPES";
pub const ENV_TIMEOUT_SECS: &str = "CATALOG_TIMEOUT_SECS";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_lookup_success() {
        let vars = env(&[
            (ENV_BASE_URL, "http://localhost:8080"),
            (ENV_TOKEN_ENDPOINT, "http://localhost:9000/oauth2/token"),
            (ENV_CLIENT_ID, "messaging-client"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_SCOPES, "message.read message.write"),
            (ENV_TIMEOUT_SECS, "12"),
        ]);

        let config = CatalogConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.credentials.client_id, "messaging-client");
        assert_eq!(config.scopes, vec!["message.read", "message.write"]);
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_from_lookup_missing_variable() {
        let vars = env(&[(ENV_BASE_URL, "http://localhost:8080")]);

        let err = CatalogConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Configuration(ConfigurationError::MissingEnvironment { ref name })
                if name == ENV_TOKEN_ENDPOINT
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let config = CatalogConfig::builder()
            .base_url("http://localhost:8080")
            .token_endpoint("http://localhost:9000/oauth2/token")
            .client_id("messaging-client")
            .client_secret("super-secret")
            .build()
            .unwrap();

        let printed = format!("{:?}", config);
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("super-secret"));
    }
}
