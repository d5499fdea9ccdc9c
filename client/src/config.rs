//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `CAREER_SYNC_*` environment variables or a configuration
//! file; unset values fall back to the defaults below.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_ENDPOINT: &str = "http://localhost:4000/graphql";
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_CREDENTIALS_DIR: &str = ".career-sync";

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("career-sync/", env!("CARGO_PKG_VERSION"));

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configured endpoint is not an absolute URL.
    #[error("invalid GraphQL endpoint `{value}`: {source}")]
    InvalidEndpoint {
        /// Offending value.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The endpoint parsed but is not HTTP(S).
    #[error("GraphQL endpoint `{value}` must use http or https")]
    UnsupportedScheme {
        /// Offending value.
        value: String,
    },
    /// A request timeout of zero would fail every call.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Configuration values controlling the remote gateway and session storage.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAREER_SYNC")]
pub struct ClientSettings {
    /// GraphQL endpoint URL.
    pub endpoint: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(file_key = "timeout_seconds")]
    pub request_timeout_seconds: Option<u64>,
    /// Directory holding `credentials.json`.
    pub credentials_dir: Option<PathBuf>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
}

impl ClientSettings {
    /// Return the configured endpoint, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the value is not an HTTP(S) URL.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let value = self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let url = Url::parse(value).map_err(|source| ConfigError::InvalidEndpoint {
            value: value.to_owned(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::UnsupportedScheme {
                value: value.to_owned(),
            }),
        }
    }

    /// Return the request timeout, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] for a zero timeout.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        match self
            .request_timeout_seconds
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS)
        {
            0 => Err(ConfigError::ZeroTimeout),
            seconds => Ok(Duration::from_secs(seconds)),
        }
    }

    /// Return the credentials directory, falling back to the default.
    pub fn credentials_dir(&self) -> PathBuf {
        self.credentials_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_DIR))
    }

    /// Return the user agent, falling back to the crate default.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}
