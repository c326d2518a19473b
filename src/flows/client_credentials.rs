//! Client Credentials Flow
//!
//! RFC 6749 Section 4.4 - Client Credentials Grant.

use async_trait::async_trait;
use base64::Engine;
use secrecy::ExposeSecret;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::form_urlencoded;

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{map_token_error, AuthError, CatalogError};
use crate::types::{AccessToken, CatalogConfig, ClientAuthMethod, TokenResponse};

/// Client Credentials Flow interface.
#[async_trait]
pub trait ClientCredentialsFlow: Send + Sync {
    /// Request a fresh access token using client credentials.
    async fn request_token(&self) -> Result<AccessToken, AuthError>;
}

/// Client Credentials Flow implementation.
pub struct ClientCredentialsFlowImpl<T: HttpTransport> {
    config: CatalogConfig,
    transport: Arc<T>,
}

impl<T: HttpTransport> ClientCredentialsFlowImpl<T> {
    /// Create new Client Credentials Flow.
    pub fn new(config: CatalogConfig, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    fn build_request_body(&self) -> String {
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("grant_type", "client_credentials");

        if !self.config.scopes.is_empty() {
            form.append_pair("scope", &self.config.scopes.join(" "));
        }

        let credentials = &self.config.credentials;
        if credentials.auth_method == ClientAuthMethod::ClientSecretPost {
            form.append_pair("client_id", &credentials.client_id);
            form.append_pair("client_secret", credentials.client_secret.expose_secret());
        }

        form.finish()
    }

    fn build_request_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("accept".to_string(), "application/json".to_string());

        let credentials = &self.config.credentials;
        if credentials.auth_method == ClientAuthMethod::ClientSecretBasic {
            let raw = format!(
                "{}:{}",
                credentials.client_id,
                credentials.client_secret.expose_secret()
            );
            let encoded = base64::engine::general_purpose::STANDARD.encode(raw);
            headers.insert("authorization".to_string(), format!("Basic {}", encoded));
        }

        headers
    }
}

#[async_trait]
impl<T: HttpTransport> ClientCredentialsFlow for ClientCredentialsFlowImpl<T> {
    async fn request_token(&self) -> Result<AccessToken, AuthError> {
        let http_request = HttpRequest {
            method: HttpMethod::Post,
            url: self.config.token_endpoint.to_string(),
            headers: self.build_request_headers(),
            body: Some(self.build_request_body()),
            timeout: Some(self.config.timeout),
        };

        tracing::debug!(
            token_endpoint = %self.config.token_endpoint,
            client_id = %self.config.credentials.client_id,
            "Requesting client credentials token"
        );

        let response = self
            .transport
            .send(http_request)
            .await
            .map_err(|e| match e {
                CatalogError::Network(network) => AuthError::TokenEndpointUnreachable(network),
                other => AuthError::InvalidTokenResponse {
                    message: other.to_string(),
                },
            })?;

        if response.status != 200 {
            return Err(map_token_error(response.status, &response.body));
        }

        let token_response: TokenResponse =
            serde_json::from_str(&response.body).map_err(|e| AuthError::InvalidTokenResponse {
                message: e.to_string(),
            })?;

        if !token_response.token_type.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::UnsupportedTokenType {
                token_type: token_response.token_type,
            });
        }

        Ok(AccessToken::from_response(
            token_response,
            self.config.default_token_ttl,
        ))
    }
}

/// Mock Client Credentials Flow for testing.
///
/// Issues `mock-token-1`, `mock-token-2`, ... unless results are queued, and
/// can delay each call to widen race windows.
#[derive(Default)]
pub struct MockClientCredentialsFlow {
    calls: AtomicUsize,
    queued: Mutex<VecDeque<Result<AccessToken, AuthError>>>,
    delay: Mutex<Option<Duration>>,
    lifetime: Mutex<Option<chrono::Duration>>,
}

impl MockClientCredentialsFlow {
    /// Create new mock flow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of a future call.
    pub fn queue_result(&self, result: Result<AccessToken, AuthError>) -> &Self {
        self.queued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(result);
        self
    }

    /// Delay every call by `delay`.
    pub fn set_delay(&self, delay: Duration) -> &Self {
        *self.delay.lock().unwrap_or_else(|e| e.into_inner()) = Some(delay);
        self
    }

    /// Lifetime of generated tokens (default one hour).
    pub fn set_lifetime(&self, lifetime: chrono::Duration) -> &Self {
        *self.lifetime.lock().unwrap_or_else(|e| e.into_inner()) = Some(lifetime);
        self
    }

    /// Number of token requests made.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientCredentialsFlow for MockClientCredentialsFlow {
    async fn request_token(&self) -> Result<AccessToken, AuthError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        let delay = *self.delay.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self
            .queued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        if let Some(result) = queued {
            return result;
        }

        let lifetime = *self.lifetime.lock().unwrap_or_else(|e| e.into_inner());
        let lifetime = lifetime.unwrap_or_else(|| chrono::Duration::hours(1));

        Ok(AccessToken::new(
            format!("mock-token-{}", n),
            "Bearer".to_string(),
            chrono::Utc::now() + lifetime,
        ))
    }
}

/// Create mock Client Credentials Flow for testing.
pub fn create_mock_client_credentials_flow() -> MockClientCredentialsFlow {
    MockClientCredentialsFlow::new()
}
