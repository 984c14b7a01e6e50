//! Cisco Catalyst Center REST API client
//!
//! Token lifecycle and request execution: a [`TokenManager`] caches the session
//! token obtained through Basic Auth, and [`CatalystClient`] attaches it to every
//! call, refreshing and retrying once when the server answers 401.

pub mod auth;
pub mod client;
pub mod constants;
pub mod error;
pub mod manager;
pub mod models;
pub mod request;

pub use auth::{Authenticator, BasicAuthenticator};
pub use client::{CatalystClient, build_http_client};
pub use error::{ApiError, ApiResult};
pub use manager::TokenManager;
pub use models::{Credentials, TokenInfo};
pub use request::RequestDescriptor;
