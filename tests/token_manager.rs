//! Token caching, expiry and refresh coalescing

use async_trait::async_trait;
use catalyst_center_mcp::api::{ApiError, ApiResult, Authenticator, TokenManager};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Issues `tok-1`, `tok-2`, ... and counts calls
struct CountingAuthenticator {
    calls: AtomicU32,
    delay: Duration,
}

impl CountingAuthenticator {
    fn new() -> Arc<Self> {
        Self::with_delay(Duration::ZERO)
    }

    fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            delay,
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for CountingAuthenticator {
    async fn authenticate(&self) -> ApiResult<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(format!("tok-{}", n))
    }
}

struct RejectingAuthenticator;

#[async_trait]
impl Authenticator for RejectingAuthenticator {
    async fn authenticate(&self) -> ApiResult<String> {
        Err(ApiError::Authentication("token endpoint returned 401: bad credentials".into()))
    }
}

#[tokio::test]
async fn test_cached_token_reused_while_valid() {
    let auth = CountingAuthenticator::new();
    let manager = TokenManager::new(auth.clone());

    let first = manager.get_token().await.unwrap();
    let second = manager.get_token().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(auth.calls(), 1);
}

#[tokio::test]
async fn test_expired_token_refreshed_once_with_later_expiry() {
    let auth = CountingAuthenticator::new();
    // Margin equals lifetime, so every token is expired as soon as it is issued
    let manager = TokenManager::with_lifetime(auth.clone(), Duration::from_secs(5), Duration::from_secs(5));

    let first = manager.get_token().await.unwrap();
    let first_expiry = manager.expires_at().await.unwrap();
    assert_eq!(auth.calls(), 1);

    tokio::time::sleep(Duration::from_millis(5)).await;

    let second = manager.get_token().await.unwrap();
    let second_expiry = manager.expires_at().await.unwrap();

    assert_eq!(auth.calls(), 2);
    assert_ne!(first, second);
    assert!(second_expiry > first_expiry);
}

#[tokio::test]
async fn test_short_lived_token_expires_after_lifetime() {
    let auth = CountingAuthenticator::new();
    let manager = TokenManager::with_lifetime(auth.clone(), Duration::from_millis(50), Duration::ZERO);

    manager.get_token().await.unwrap();
    manager.get_token().await.unwrap();
    assert_eq!(auth.calls(), 1);

    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(manager.get_token().await.unwrap(), "tok-2");
    assert_eq!(auth.calls(), 2);
}

#[tokio::test]
async fn test_force_refresh_bypasses_valid_cache() {
    let auth = CountingAuthenticator::new();
    let manager = TokenManager::new(auth.clone());

    assert_eq!(manager.get_token().await.unwrap(), "tok-1");
    assert_eq!(manager.force_refresh().await.unwrap(), "tok-2");
    assert_eq!(manager.get_token().await.unwrap(), "tok-2");
    assert_eq!(auth.calls(), 2);
}

#[tokio::test]
async fn test_rejected_credentials_surface_authentication_error() {
    let manager = TokenManager::new(Arc::new(RejectingAuthenticator));

    let err = manager.get_token().await.unwrap_err();
    assert!(matches!(err, ApiError::Authentication(_)));
    assert!(manager.expires_at().await.is_none());
}

#[tokio::test]
async fn test_default_expiry_is_inside_one_hour() {
    let manager = TokenManager::new(CountingAuthenticator::new());
    let before = Instant::now();
    manager.get_token().await.unwrap();
    let expires_at = manager.expires_at().await.unwrap();

    assert!(expires_at > before + Duration::from_secs(3000));
    assert!(expires_at < before + Duration::from_secs(3600));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_authentication() {
    let auth = CountingAuthenticator::with_delay(Duration::from_millis(50));
    let manager = Arc::new(TokenManager::new(auth.clone()));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.get_token().await })
        })
        .collect();

    let tokens: Vec<String> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert!(tokens.iter().all(|t| t == "tok-1"));
    assert_eq!(auth.calls(), 1);
    assert!(manager.expires_at().await.unwrap() > Instant::now());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_after_expiry_coalesce() {
    let auth = CountingAuthenticator::with_delay(Duration::from_millis(20));
    let manager = Arc::new(TokenManager::with_lifetime(auth.clone(), Duration::from_millis(30), Duration::ZERO));

    manager.get_token().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.get_token().await })
        })
        .collect();

    for joined in futures::future::join_all(handles).await {
        assert_eq!(joined.unwrap().unwrap(), "tok-2");
    }
    assert_eq!(auth.calls(), 2);
}
