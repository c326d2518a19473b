//! Catalog Error Types
//!
//! One variant per failure kind a caller can act on: network, auth,
//! not-found, local validation, decoding, and other server statuses.

use std::time::Duration;
use thiserror::Error;

/// Root error type for catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Server returned HTTP {status}")]
    Server { status: u16, body: String },
}

impl CatalogError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CATALOG_CONFIG",
            Self::Network(_) => "CATALOG_NETWORK",
            Self::Auth(_) => "CATALOG_AUTH",
            Self::NotFound { .. } => "CATALOG_NOT_FOUND",
            Self::Validation(_) => "CATALOG_VALIDATION",
            Self::Decode(_) => "CATALOG_DECODE",
            Self::Server { .. } => "CATALOG_SERVER",
        }
    }

    /// Check if the caller may reasonably retry the operation.
    ///
    /// The client itself never retries these; the hint is for the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_retryable(),
            Self::Auth(AuthError::TokenEndpointUnreachable(e)) => e.is_retryable(),
            Self::Server { status, .. } => matches!(status, 429 | 500..=599),
            _ => false,
        }
    }

    /// Check if the error stems from rejected credentials.
    pub fn needs_reauth(&self) -> bool {
        matches!(self, Self::Auth(e) if !matches!(e, AuthError::TokenEndpointUnreachable(_)))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Server { status, .. } => Some(*status),
            Self::Auth(AuthError::Unauthorized { .. }) => Some(401),
            Self::Auth(AuthError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid endpoint URL for {field}: {url}")]
    InvalidEndpoint { field: String, url: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment variable {name} is not set")]
    MissingEnvironment { name: String },

    #[error("Failed to create HTTP client: {message}")]
    HttpClient { message: String },
}

/// Network/transport error.
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Request failed: {message}")]
    RequestFailed { message: String },
}

impl NetworkError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout { .. })
    }
}

/// Token acquisition or authorization error.
///
/// `Clone` so that a single failed token fetch can be handed to every
/// task waiting on it.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    #[error("Invalid client credentials")]
    InvalidClient { error_description: Option<String> },

    #[error("Unauthorized client for this grant type")]
    UnauthorizedClient { error_description: Option<String> },

    #[error("Invalid scope: {scope}")]
    InvalidScope { scope: String },

    #[error("Unsupported grant type: {grant_type}")]
    UnsupportedGrantType { grant_type: String },

    #[error("Token request rejected with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Token endpoint unreachable: {0}")]
    TokenEndpointUnreachable(#[source] NetworkError),

    #[error("Invalid token response: {message}")]
    InvalidTokenResponse { message: String },

    #[error("Unsupported token type: {token_type}")]
    UnsupportedTokenType { token_type: String },

    #[error("Request to {url} still unauthorized after token refresh")]
    Unauthorized { url: String },
}

/// Client-side input validation error. Raised before any network call.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{operation} requires a record id")]
    MissingId { operation: &'static str },
}

/// Response decoding error.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Record at index {index} has no id")]
    MissingRecordId { index: usize },

    #[error("Record has no id")]
    MissingId,

    #[error("Page holds {content_len} records but declares size {size}")]
    PageOverflow { content_len: usize, size: u32 },

    #[error("Create response carried no Location header")]
    MissingLocation,

    #[error("Invalid Location header: {location}")]
    InvalidLocation { location: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },

    #[error("Failed to read response body: {message}")]
    Body { message: String },
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidJson {
            message: e.to_string(),
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// OAuth2 error response from the token endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OAuth2ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_uri: Option<String>,
}

/// Parse an OAuth2 error response from an HTTP body.
pub fn parse_error_response(body: &str) -> Option<OAuth2ErrorResponse> {
    serde_json::from_str(body).ok()
}

/// Map a non-200 token endpoint response to an auth error.
pub fn map_token_error(status: u16, body: &str) -> AuthError {
    let Some(response) = parse_error_response(body) else {
        return match status {
            401 => AuthError::InvalidClient {
                error_description: None,
            },
            _ => AuthError::Rejected {
                status,
                message: format!("HTTP {}", status),
            },
        };
    };

    match response.error.as_str() {
        "invalid_client" => AuthError::InvalidClient {
            error_description: response.error_description,
        },
        "unauthorized_client" => AuthError::UnauthorizedClient {
            error_description: response.error_description,
        },
        "invalid_scope" => AuthError::InvalidScope {
            scope: response.error_description.unwrap_or_default(),
        },
        "unsupported_grant_type" => AuthError::UnsupportedGrantType {
            grant_type: response.error_description.unwrap_or_default(),
        },
        _ => AuthError::Rejected {
            status,
            message: response.error_description.unwrap_or(response.error),
        },
    }
}

/// Map a non-2xx, non-401 catalog response to an error.
pub fn create_error_from_response(status: u16, url: &str, body: &str) -> CatalogError {
    match status {
        404 => CatalogError::NotFound {
            url: url.to_string(),
        },
        _ => CatalogError::Server {
            status,
            body: body.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        assert!(CatalogError::Network(NetworkError::Timeout {
            timeout: Duration::from_secs(30)
        })
        .is_retryable());
        assert!(CatalogError::Server {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!CatalogError::Server {
            status: 409,
            body: String::new()
        }
        .is_retryable());
        assert!(!CatalogError::NotFound {
            url: "http://localhost/api/v1/beers/x".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_needs_reauth() {
        assert!(CatalogError::Auth(AuthError::InvalidClient {
            error_description: None
        })
        .needs_reauth());
        assert!(!CatalogError::Auth(AuthError::TokenEndpointUnreachable(
            NetworkError::ConnectionFailed {
                message: "refused".to_string()
            }
        ))
        .needs_reauth());
    }

    #[test]
    fn test_create_error_from_response() {
        let err = create_error_from_response(404, "http://localhost/api/v1/beers/1", "");
        assert!(matches!(err, CatalogError::NotFound { .. }));
        assert_eq!(err.status(), Some(404));

        let err = create_error_from_response(500, "http://localhost/api/v1/beers", "boom");
        assert!(matches!(err, CatalogError::Server { status: 500, .. }));
        assert_eq!(err.error_code(), "CATALOG_SERVER");
    }

    #[test]
    fn test_map_token_error() {
        let body = r#"{"error":"invalid_client","error_description":"bad secret"}"#;
        match map_token_error(401, body) {
            AuthError::InvalidClient { error_description } => {
                assert_eq!(error_description.as_deref(), Some("bad secret"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            map_token_error(500, "not json"),
            AuthError::Rejected { status: 500, .. }
        ));
    }
}
