use std::fmt;
use std::time::{Duration, Instant};

/// Connection settings for a Catalyst Center instance.
///
/// Built once at startup and shared read-only for the lifetime of the process.
#[derive(Clone)]
pub struct Credentials {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub verify_ssl: bool,
    pub timeout: Duration,
}

impl Credentials {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        verify_ssl: bool,
        timeout: Duration,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            username: username.into(),
            password: password.into(),
            verify_ssl,
            timeout,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Cached token information
#[derive(Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: Instant,
}

impl TokenInfo {
    /// Build a token issued at `issued_at`, expiring `lifetime - margin` later.
    ///
    /// A margin larger than the lifetime yields a token that is already expired.
    pub fn issued(access_token: String, issued_at: Instant, lifetime: Duration, margin: Duration) -> Self {
        Self {
            access_token,
            expires_at: issued_at + lifetime.saturating_sub(margin),
        }
    }

    /// Valid only while `now` is strictly before the expiry instant
    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        !self.is_valid_at(Instant::now())
    }
}

impl fmt::Debug for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenInfo")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
