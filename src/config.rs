use crate::credentials::{self, DEFAULT_SERVER_URL};
use crate::error::{Error, Result};
use std::env;

/// Runtime configuration for the Forgejo client.
/// Values are sourced from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
    pub access_token: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - FORGEJO_TOKEN (or FORGEJO_ACCESS_TOKEN) [required]
    /// - FORGEJO_SERVER_URL (default: https://code.squarecows.com)
    /// - FORGEJO_HTTP_TIMEOUT_SECS (default: 30)
    /// - FORGEJO_USER_AGENT (default: forgejo-node/<version>)
    pub fn from_env() -> Result<Self> {
        let access_token = env::var("FORGEJO_TOKEN")
            .or_else(|_| env::var("FORGEJO_ACCESS_TOKEN"))
            .map_err(|_| Error::Config("Missing FORGEJO_TOKEN or FORGEJO_ACCESS_TOKEN".into()))?;
        let server_url =
            env::var("FORGEJO_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let timeout_secs = env::var("FORGEJO_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);
        let user_agent = env::var("FORGEJO_USER_AGENT")
            .unwrap_or_else(|_| format!("forgejo-node/{}", env!("CARGO_PKG_VERSION")));

        Self::new(server_url, access_token).map(|cfg| Self {
            user_agent,
            timeout_secs,
            ..cfg
        })
    }

    /// Build a configuration from explicit credential values.
    pub fn new(server_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let server_url = server_url.into();
        let access_token = access_token.into();
        url::Url::parse(&server_url)
            .map_err(|e| Error::Config(format!("Invalid server URL '{}': {}", server_url, e)))?;
        if access_token.is_empty() {
            return Err(Error::Config("Access token must not be empty".into()));
        }
        Ok(Self {
            server_url,
            access_token,
            user_agent: format!("forgejo-node/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        })
    }

    pub fn api_base(&self) -> String {
        credentials::api_base(&self.server_url)
    }
}
