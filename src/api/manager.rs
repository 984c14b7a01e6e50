use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::auth::Authenticator;
use super::constants::{TOKEN_LIFETIME, TOKEN_SAFETY_MARGIN};
use super::error::ApiResult;
use super::models::TokenInfo;

/// Owns the cached session token and refreshes it on demand.
///
/// The check-refresh-store sequence runs under one async mutex, so concurrent
/// callers that find the token expired share a single authentication call:
/// the first one authenticates, the rest wait and then read the new token.
pub struct TokenManager {
    authenticator: Arc<dyn Authenticator>,
    token: Mutex<Option<TokenInfo>>,
    lifetime: Duration,
    safety_margin: Duration,
}

impl TokenManager {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self::with_lifetime(authenticator, TOKEN_LIFETIME, TOKEN_SAFETY_MARGIN)
    }

    /// Create a manager with a custom token lifetime and expiry margin
    pub fn with_lifetime(authenticator: Arc<dyn Authenticator>, lifetime: Duration, safety_margin: Duration) -> Self {
        Self {
            authenticator,
            token: Mutex::new(None),
            lifetime,
            safety_margin,
        }
    }

    /// Return the cached token, authenticating first if it is missing or expired
    pub async fn get_token(&self) -> ApiResult<String> {
        let mut slot = self.token.lock().await;

        if let Some(token) = slot.as_ref() {
            if !token.is_expired() {
                log::debug!("Using cached token");
                return Ok(token.access_token.clone());
            }
            log::debug!("Cached token expired");
        }

        self.refresh_locked(&mut slot).await
    }

    /// Discard the current token and authenticate unconditionally.
    ///
    /// Called after the server rejected a token with 401.
    pub async fn force_refresh(&self) -> ApiResult<String> {
        let mut slot = self.token.lock().await;
        log::warn!("Forcing token refresh");
        self.refresh_locked(&mut slot).await
    }

    /// Drop the cached token without contacting the server
    pub async fn invalidate(&self) {
        self.token.lock().await.take();
    }

    /// Expiry of the cached token, if one is held
    pub async fn expires_at(&self) -> Option<Instant> {
        self.token.lock().await.as_ref().map(|t| t.expires_at)
    }

    // Caller must hold the token lock.
    async fn refresh_locked(&self, slot: &mut Option<TokenInfo>) -> ApiResult<String> {
        slot.take();

        match self.authenticator.authenticate().await {
            Ok(access_token) => {
                let token = TokenInfo::issued(access_token, Instant::now(), self.lifetime, self.safety_margin);
                let value = token.access_token.clone();
                *slot = Some(token);
                log::info!("Successfully authenticated and cached token");
                Ok(value)
            }
            Err(e) => {
                log::warn!("Authentication failed: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Scripted {
        calls: AtomicU32,
        fail_on: Option<u32>,
    }

    #[async_trait]
    impl Authenticator for Scripted {
        async fn authenticate(&self) -> ApiResult<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on == Some(n) {
                return Err(ApiError::Authentication("rejected".into()));
            }
            Ok(format!("tok-{}", n))
        }
    }

    #[tokio::test]
    async fn test_failed_refresh_discards_previous_token() {
        let auth = Arc::new(Scripted { calls: AtomicU32::new(0), fail_on: Some(2) });
        let manager = TokenManager::new(auth.clone());

        assert_eq!(manager.get_token().await.unwrap(), "tok-1");
        assert!(manager.expires_at().await.is_some());

        let err = manager.force_refresh().await.unwrap_err();
        assert!(matches!(err, ApiError::Authentication(_)));
        assert!(manager.expires_at().await.is_none());

        // Next call authenticates again instead of reviving tok-1
        assert_eq!(manager.get_token().await.unwrap(), "tok-3");
        assert_eq!(auth.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reauthentication() {
        let auth = Arc::new(Scripted { calls: AtomicU32::new(0), fail_on: None });
        let manager = TokenManager::new(auth.clone());

        manager.get_token().await.unwrap();
        manager.invalidate().await;
        assert_eq!(manager.get_token().await.unwrap(), "tok-2");
    }
}
