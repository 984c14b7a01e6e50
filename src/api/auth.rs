use async_trait::async_trait;
use serde_json::Value;

use super::constants::{self, headers};
use super::error::{ApiError, ApiResult};
use super::models::Credentials;

/// Performs the network half of token acquisition.
///
/// The [`TokenManager`](super::TokenManager) decides *when* to authenticate;
/// implementors decide *how*.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchange credentials for a fresh token string
    async fn authenticate(&self) -> ApiResult<String>;
}

/// Basic Auth against the Catalyst Center token endpoint
pub struct BasicAuthenticator {
    http_client: reqwest::Client,
    token_url: String,
    username: String,
    password: String,
}

impl BasicAuthenticator {
    pub fn new(credentials: &Credentials, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            token_url: constants::auth_token_url(&credentials.base_url),
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        }
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    async fn authenticate(&self) -> ApiResult<String> {
        log::info!("Authenticating to {} as {}", self.token_url, self.username);

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Content-Type", headers::CONTENT_TYPE_JSON)
            .send()
            .await
            .map_err(|e| ApiError::Authentication(format!("token request did not complete: {}", e)))?;

        let status = response.status();
        log::debug!("Token request status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::Authentication(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let token_data: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Authentication(format!("unreadable token response: {}", e)))?;

        match token_data.get("Token").and_then(|t| t.as_str()) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(ApiError::Authentication(
                "no token returned from authentication endpoint".to_string(),
            )),
        }
    }
}
