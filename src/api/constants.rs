//! API constants for the Catalyst Center REST API

use std::time::Duration;

/// Token issuance endpoint (Basic Auth, returns `{"Token": "..."}`)
pub const AUTH_TOKEN_PATH: &str = "/dna/system/api/v1/auth/token";

/// Nominal lifetime of an issued token
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Tokens are treated as expired this long before the nominal boundary
pub const TOKEN_SAFETY_MARGIN: Duration = Duration::from_secs(60);

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Intent API endpoints exposed as tools
pub mod endpoints {
    pub const CLIENT_HEALTH: &str = "/dna/intent/api/v1/client-health";
    pub const CLIENT_DETAIL: &str = "/dna/intent/api/v1/client-detail";
    pub const NETWORK_DEVICE: &str = "/dna/intent/api/v1/network-device";
    pub const NETWORK_HEALTH: &str = "/dna/intent/api/v1/network-health";
    pub const SITE_HEALTH: &str = "/dna/intent/api/v1/site-health";
    pub const ISSUES: &str = "/dna/intent/api/v1/issues";
    pub const COMPLIANCE: &str = "/dna/intent/api/v1/compliance";
    pub const EOX_SUMMARY: &str = "/dna/intent/api/v1/eox-status/summary";
}

/// Standard headers for Catalyst Center requests
pub mod headers {
    /// Header carrying the session token on every intent API call
    pub const X_AUTH_TOKEN: &str = "X-Auth-Token";

    /// Content type for JSON requests
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// Build a full URL from the base URL and an API path
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url, path)
}

/// Build the token endpoint URL
pub fn auth_token_url(base_url: &str) -> String {
    endpoint_url(base_url, AUTH_TOKEN_PATH)
}
