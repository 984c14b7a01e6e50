use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::auth::BasicAuthenticator;
use super::constants::{self, headers};
use super::error::{ApiError, ApiResult};
use super::manager::TokenManager;
use super::models::Credentials;
use super::request::RequestDescriptor;

/// Build the pooled HTTP client shared by authentication and API calls
pub fn build_http_client(credentials: &Credentials) -> ApiResult<reqwest::Client> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(10)           // Max idle connections per host
        .pool_idle_timeout(Duration::from_secs(90))  // Keep connections alive for 90s
        .timeout(credentials.timeout)         // Whole-request timeout, body included
        .connect_timeout(credentials.timeout.min(Duration::from_secs(10)))
        .danger_accept_invalid_certs(!credentials.verify_ssl)
        .user_agent(concat!("catalyst-center-mcp/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {}", e)))
}

/// Catalyst Center API client.
///
/// Attaches the current session token to every call and, on a 401, forces one
/// token refresh and retries the call exactly once.
#[derive(Clone)]
pub struct CatalystClient {
    base_url: String,
    http_client: reqwest::Client,
    token_manager: Arc<TokenManager>,
}

impl CatalystClient {
    /// Create a client that authenticates with Basic Auth against the token endpoint
    pub fn new(credentials: &Credentials) -> ApiResult<Self> {
        if !credentials.verify_ssl {
            log::warn!("TLS certificate verification is disabled for {}", credentials.base_url);
        }

        let http_client = build_http_client(credentials)?;
        let authenticator = Arc::new(BasicAuthenticator::new(credentials, http_client.clone()));
        let token_manager = Arc::new(TokenManager::new(authenticator));

        Ok(Self::with_token_manager(credentials.base_url.clone(), http_client, token_manager))
    }

    /// Create a client around an existing token manager
    pub fn with_token_manager(base_url: impl Into<String>, http_client: reqwest::Client, token_manager: Arc<TokenManager>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            token_manager,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.token_manager
    }

    /// Execute a request, refreshing the token and retrying once on 401
    pub async fn request(&self, request: &RequestDescriptor) -> ApiResult<Value> {
        let token = self.token_manager.get_token().await?;
        let response = self.send(request, &token).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::parse_response(response).await;
        }

        log::warn!("{} {} returned 401, refreshing token and retrying once", request.method, request.path);
        let token = self.token_manager.force_refresh().await?;
        let response = self.send(request, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::Authentication(format!(
                "token rejected after refresh: {}",
                error_text
            )));
        }

        Self::parse_response(response).await
    }

    /// GET with query parameters
    pub async fn get(&self, path: &str, params: &[(&str, String)]) -> ApiResult<Value> {
        let mut request = RequestDescriptor::get(path);
        for (key, value) in params {
            request = request.param(*key, value);
        }
        self.request(&request).await
    }

    /// POST with an optional JSON body
    pub async fn post(&self, path: &str, body: Option<Value>) -> ApiResult<Value> {
        let mut request = RequestDescriptor::post(path);
        request.body = body;
        self.request(&request).await
    }

    async fn send(&self, request: &RequestDescriptor, token: &str) -> ApiResult<reqwest::Response> {
        let url = constants::endpoint_url(&self.base_url, &request.path);

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .header(headers::X_AUTH_TOKEN, token)
            .header("Content-Type", headers::CONTENT_TYPE_JSON)
            .header("Accept", headers::CONTENT_TYPE_JSON);

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            log::warn!("{} {} failed: {}", request.method, request.path, e);
            ApiError::from_transport(&e)
        })?;

        log::debug!("{} {} -> {}", request.method, request.path, response.status());
        Ok(response)
    }

    /// Turn a non-401 response into the decoded body or a categorized error
    async fn parse_response(response: reqwest::Response) -> ApiResult<Value> {
        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::from_transport(&e))?;

        if !status.is_success() {
            return Err(ApiError::Request {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_send_sync_clone() {
        fn assert_traits<T: Send + Sync + Clone>() {}
        assert_traits::<CatalystClient>();
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let credentials = Credentials::new("https://dnac.local/", "u", "p", true, Duration::from_secs(5));
        let client = CatalystClient::new(&credentials).unwrap();
        assert_eq!(client.base_url(), "https://dnac.local");
    }
}
