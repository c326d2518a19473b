//! Token Types
//!
//! OAuth2 token type definitions.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;

/// Token response from authorization server.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Expires in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
    /// Additional fields.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

// One year; longer lifetimes are clamped.
const MAX_LIFETIME_SECS: u64 = 365 * 24 * 60 * 60;

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Access token wrapper for safe handling.
///
/// Replaced wholesale on refresh, never mutated.
#[derive(Clone)]
pub struct AccessToken {
    value: SecretString,
    /// Token type.
    pub token_type: String,
    /// Absolute expiry instant.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create new access token.
    pub fn new(value: String, token_type: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: SecretString::new(value),
            token_type,
            expires_at,
        }
    }

    /// Create from a token response, falling back to `default_ttl` when the
    /// server does not state a lifetime.
    pub fn from_response(response: TokenResponse, default_ttl: std::time::Duration) -> Self {
        let lifetime_secs = response
            .expires_in
            .unwrap_or(default_ttl.as_secs())
            .min(MAX_LIFETIME_SECS);
        let lifetime = Duration::seconds(lifetime_secs as i64);

        Self::new(
            response.access_token,
            response.token_type,
            Utc::now() + lifetime,
        )
    }

    /// Get token value (for Authorization header).
    pub fn secret(&self) -> &str {
        self.value.expose_secret()
    }

    /// Check if token is expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Check if the token expires within `buffer` from now.
    pub fn expires_within(&self, buffer: std::time::Duration) -> bool {
        let buffer = Duration::from_std(buffer).unwrap_or(Duration::zero());
        self.expires_at <= Utc::now() + buffer
    }

    /// Format as Authorization header value.
    ///
    /// The scheme is always `Bearer`; token types are checked case-insensitively
    /// when the token is acquired.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.value.expose_secret())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parsing() {
        let json = r#"{
            "access_token": "test-token",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "message.read message.write"
        }"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "test-token");
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, Some(3600));
        assert_eq!(response.scope, Some("message.read message.write".to_string()));
    }

    #[test]
    fn test_from_response_uses_default_ttl() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();

        let token = AccessToken::from_response(response, std::time::Duration::from_secs(120));
        assert_eq!(token.token_type, "Bearer");
        assert!(!token.is_expired());
        assert!(token.expires_within(std::time::Duration::from_secs(121)));
        assert!(!token.expires_within(std::time::Duration::from_secs(60)));
    }

    #[test]
    fn test_authorization_header_and_redaction() {
        let token = AccessToken::new(
            "test-token".to_string(),
            "bearer".to_string(),
            Utc::now() + Duration::seconds(60),
        );
        assert_eq!(token.authorization_header(), "Bearer test-token");
        assert!(!format!("{:?}", token).contains("test-token"));
    }

    #[test]
    fn test_expired_token() {
        let token = AccessToken::new(
            "old".to_string(),
            "Bearer".to_string(),
            Utc::now() - Duration::seconds(10),
        );
        assert!(token.is_expired());
        assert!(token.expires_within(std::time::Duration::ZERO));
    }
}
