//! Authenticated Transport
//!
//! Attaches the bearer token to catalog requests and maps statuses to
//! errors. A 401 triggers exactly one token refresh and one retry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{create_error_from_response, AuthError, CatalogResult};
use crate::token::TokenManager;
use crate::types::{AccessToken, DEFAULT_TIMEOUT_SECS};

/// HTTP transport wrapped with bearer-token authentication.
pub struct AuthenticatedTransport<T: HttpTransport, M: TokenManager> {
    http: Arc<T>,
    tokens: Arc<M>,
    timeout: Duration,
}

impl<T: HttpTransport, M: TokenManager> AuthenticatedTransport<T, M> {
    /// Wrap `http` so every request carries a token from `tokens`.
    pub fn new(http: Arc<T>, tokens: Arc<M>) -> Self {
        Self {
            http,
            tokens,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Execute a request, returning the response for any 2xx status.
    ///
    /// 404 maps to `NotFound`, a 401 that survives one refresh maps to
    /// `AuthError::Unauthorized`, every other non-2xx status to `Server`.
    pub async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<String>,
    ) -> CatalogResult<HttpResponse> {
        let token = self.tokens.get_token().await?;
        let mut response = self.send_once(method, url, &token, body.clone()).await?;

        if response.status == 401 {
            tracing::debug!(method = method.as_str(), url, "Received 401, refreshing token");
            self.tokens.invalidate(&token);
            let token = self.tokens.get_token().await?;
            response = self.send_once(method, url, &token, body).await?;

            if response.status == 401 {
                return Err(AuthError::Unauthorized {
                    url: url.to_string(),
                }
                .into());
            }
        }

        if !response.is_success() {
            return Err(create_error_from_response(
                response.status,
                url,
                &response.body,
            ));
        }

        Ok(response)
    }

    async fn send_once(
        &self,
        method: HttpMethod,
        url: &str,
        token: &AccessToken,
        body: Option<String>,
    ) -> CatalogResult<HttpResponse> {
        let mut headers = HashMap::new();
        headers.insert("authorization".to_string(), token.authorization_header());
        headers.insert("accept".to_string(), "application/json".to_string());
        if body.is_some() {
            headers.insert("content-type".to_string(), "application/json".to_string());
        }

        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body,
            timeout: Some(self.timeout),
        };

        tracing::trace!(method = method.as_str(), url, "Sending catalog request");
        let response = self.http.send(request).await?;
        tracing::trace!(status = response.status, url, "Catalog response received");

        Ok(response)
    }
}
