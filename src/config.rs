use anyhow::{Context, Result};
use log::debug;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::api::Credentials;
use crate::api::constants::DEFAULT_TIMEOUT;

pub const ENV_URL: &str = "CATALYST_CENTER_URL";
pub const ENV_USERNAME: &str = "CATALYST_CENTER_USERNAME";
pub const ENV_PASSWORD: &str = "CATALYST_CENTER_PASSWORD";
pub const ENV_VERIFY_SSL: &str = "CATALYST_CENTER_VERIFY_SSL";
pub const ENV_TIMEOUT_SECS: &str = "CATALYST_CENTER_TIMEOUT_SECS";

/// Server configuration read from the environment
#[derive(Clone)]
pub struct Config {
    pub url: String,
    pub username: String,
    pub password: String,
    pub verify_ssl: bool,
    pub timeout: Duration,
}

impl Config {
    /// Load `.env` (or the given file) into the environment, then read and validate
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path)
                    .with_context(|| format!("Failed to load env file {}", path.display()))?;
                debug!("Loaded environment from {}", path.display());
            }
            None => {
                // A missing .env is fine, variables may come from the shell
                if let Ok(path) = dotenvy::dotenv() {
                    debug!("Loaded environment from {}", path.display());
                }
            }
        }

        Self::from_env()
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} environment variable is required", key))
        };

        let url = required(ENV_URL)?.trim_end_matches('/').to_string();
        let username = required(ENV_USERNAME)?;
        let password = required(ENV_PASSWORD)?;

        let verify_ssl = lookup(ENV_VERIFY_SSL)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a whole number of seconds, got '{}'", ENV_TIMEOUT_SECS, raw))?;
                if secs == 0 {
                    anyhow::bail!("{} must be greater than zero", ENV_TIMEOUT_SECS);
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            url,
            username,
            password,
            verify_ssl,
            timeout,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.url.clone(),
            self.username.clone(),
            self.password.clone(),
            self.verify_ssl,
            self.timeout,
        )
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout", &self.timeout)
            .finish()
    }
}
