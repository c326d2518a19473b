//! Token Manager
//!
//! Caches the client-credentials access token and refreshes it on expiry or
//! on demand. Refresh is single-flight: concurrent callers that find the
//! cache stale all await one shared fetch.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use crate::error::AuthError;
use crate::flows::ClientCredentialsFlow;
use crate::types::{AccessToken, CatalogConfig, DEFAULT_REFRESH_BUFFER_SECS};

/// Token manager interface.
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Get a currently valid access token, fetching one if necessary.
    async fn get_token(&self) -> Result<AccessToken, AuthError>;

    /// Drop the cached token if it is still `rejected`, so the next
    /// `get_token` fetches a new one. A token already replaced by a newer
    /// fetch is left alone.
    fn invalidate(&self, rejected: &AccessToken);
}

/// Token manager configuration.
#[derive(Debug, Clone)]
pub struct TokenManagerConfig {
    /// Tokens expiring within this window are refreshed early.
    pub refresh_buffer: Duration,
}

impl Default for TokenManagerConfig {
    fn default() -> Self {
        Self {
            refresh_buffer: Duration::from_secs(DEFAULT_REFRESH_BUFFER_SECS),
        }
    }
}

impl From<&CatalogConfig> for TokenManagerConfig {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            refresh_buffer: config.refresh_buffer,
        }
    }
}

type TokenFetch = Shared<BoxFuture<'static, Result<AccessToken, AuthError>>>;

#[derive(Default)]
struct TokenState {
    cached: RwLock<Option<AccessToken>>,
    in_flight: Mutex<Option<TokenFetch>>,
}

impl TokenState {
    fn fresh(&self, refresh_buffer: Duration) -> Option<AccessToken> {
        self.cached
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .filter(|token| !token.expires_within(refresh_buffer))
            .cloned()
    }

    fn store(&self, token: Option<AccessToken>) {
        *self.cached.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    fn clear_if(&self, rejected: &AccessToken) -> bool {
        let mut cached = self.cached.write().unwrap_or_else(|e| e.into_inner());
        match cached.as_ref() {
            Some(token) if token.secret() == rejected.secret() => {
                *cached = None;
                true
            }
            _ => false,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<TokenFetch>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Caching, single-flight token manager.
pub struct CachingTokenManager<F: ClientCredentialsFlow + 'static> {
    flow: Arc<F>,
    config: TokenManagerConfig,
    state: Arc<TokenState>,
}

impl<F: ClientCredentialsFlow + 'static> CachingTokenManager<F> {
    /// Create new token manager.
    pub fn new(flow: Arc<F>, config: TokenManagerConfig) -> Self {
        Self {
            flow,
            config,
            state: Arc::new(TokenState::default()),
        }
    }

    /// Whether a token is cached and outside the refresh window.
    pub fn has_valid_token(&self) -> bool {
        self.state.fresh(self.config.refresh_buffer).is_some()
    }

    // The fetch publishes its token before clearing the slot, so a caller
    // holding the slot lock sees either the in-flight fetch or its result.
    fn start_fetch(&self) -> TokenFetch {
        let flow = Arc::clone(&self.flow);
        let state = Arc::clone(&self.state);

        async move {
            let result = flow.request_token().await;
            match &result {
                Ok(token) => {
                    tracing::debug!(expires_at = %token.expires_at, "Access token refreshed");
                    state.store(Some(token.clone()));
                }
                Err(e) => tracing::debug!(error = %e, "Access token fetch failed"),
            }
            *state.slot() = None;
            result
        }
        .boxed()
        .shared()
    }
}

#[async_trait]
impl<F: ClientCredentialsFlow + 'static> TokenManager for CachingTokenManager<F> {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        if let Some(token) = self.state.fresh(self.config.refresh_buffer) {
            return Ok(token);
        }

        let fetch = {
            let mut slot = self.state.slot();
            if let Some(token) = self.state.fresh(self.config.refresh_buffer) {
                return Ok(token);
            }
            match slot.as_ref() {
                Some(fetch) => fetch.clone(),
                None => {
                    let fetch = self.start_fetch();
                    *slot = Some(fetch.clone());
                    fetch
                }
            }
        };

        fetch.await
    }

    fn invalidate(&self, rejected: &AccessToken) {
        if self.state.clear_if(rejected) {
            tracing::trace!("Invalidated cached access token");
        } else {
            tracing::trace!("Rejected token already replaced, keeping cache");
        }
    }
}

/// Mock token manager for testing.
///
/// Hands out `mock-access-1`; invalidating the current token advances the
/// suffix, a stale one is ignored.
#[derive(Default)]
pub struct MockTokenManager {
    generation: AtomicUsize,
    get_count: AtomicUsize,
    invalidate_count: AtomicUsize,
    next_error: Mutex<Option<AuthError>>,
}

impl MockTokenManager {
    /// Create new mock token manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `get_token` call.
    pub fn set_next_error(&self, error: AuthError) -> &Self {
        *self.next_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
        self
    }

    fn secret_for(generation: usize) -> String {
        format!("mock-access-{}", generation)
    }

    /// Number of `get_token` calls.
    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }

    /// Number of `invalidate` calls that dropped the current token.
    pub fn invalidate_count(&self) -> usize {
        self.invalidate_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenManager for MockTokenManager {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        self.get_count.fetch_add(1, Ordering::SeqCst);

        let error = self
            .next_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(error) = error {
            return Err(error);
        }

        let generation = self.generation.load(Ordering::SeqCst) + 1;
        Ok(AccessToken::new(
            Self::secret_for(generation),
            "Bearer".to_string(),
            chrono::Utc::now() + chrono::Duration::hours(1),
        ))
    }

    fn invalidate(&self, rejected: &AccessToken) {
        let current = self.generation.load(Ordering::SeqCst);
        if rejected.secret() != Self::secret_for(current + 1) {
            return;
        }
        if self
            .generation
            .compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.invalidate_count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Create mock token manager for testing.
pub fn create_mock_token_manager() -> MockTokenManager {
    MockTokenManager::new()
}
