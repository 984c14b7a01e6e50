use thiserror::Error;

/// Failure categories surfaced by the Catalyst Center client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Credentials rejected, token endpoint unreachable, or a 401 that survived a forced refresh
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Any non-2xx response other than 401
    #[error("request failed with status {status}: {body}")]
    Request { status: u16, body: String },

    /// Timeout, connection refusal, DNS failure
    #[error("transport error: {0}")]
    Transport(String),

    /// A 2xx response whose body is not valid JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether retrying later (as opposed to fixing the input) may succeed
    pub fn is_retryable_later(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Authentication(_))
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify a reqwest error that happened while sending a request or reading its body
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Transport(format!("request timed out: {}", error))
        } else if error.is_connect() {
            ApiError::Transport(format!("connection failed: {}", error))
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
