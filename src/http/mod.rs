use crate::config::Config;
use crate::credentials;
use crate::error::{Error, Result};
use crate::types::RequestDescriptor;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Authenticated HTTP capability the node sends its calls through.
///
/// Returns the decoded response body, or `None` when the server sent none.
#[allow(async_fn_in_trait)]
pub trait HttpHelper {
    async fn request(&self, req: &RequestDescriptor) -> Result<Option<Value>>;
}

pub fn build_client(cfg: &Config) -> Result<Client> {
    let mut default_headers = HeaderMap::new();
    let ua = HeaderValue::from_str(&cfg.user_agent)
        .map_err(|e| Error::Config(format!("Invalid user agent: {}", e)))?;
    default_headers.insert(USER_AGENT, ua);
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    // Authorization header is injected per request.
    Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .use_rustls_tls()
        .build()
        .map_err(Error::from)
}

fn auth_header(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&credentials::authorization_value(token))
        .map_err(|_| Error::Config("Access token contains invalid header characters".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Failure message for a non-success status.
pub fn map_status_to_error(status: StatusCode, body: String) -> Error {
    let detail = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("Unknown error").to_string()
    } else {
        body
    };
    Error::Request(format!("Forgejo API error ({}): {}", status.as_u16(), detail))
}

/// Empty bodies decode to `None`; non-JSON text is kept as a string value.
pub fn decode_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

/// reqwest-backed client for one Forgejo server and access token.
#[derive(Debug, Clone)]
pub struct ForgejoClient {
    client: Client,
    api_base: String,
    token: String,
}

impl ForgejoClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            client: build_client(cfg)?,
            api_base: cfg.api_base(),
            token: cfg.access_token.clone(),
        })
    }

    pub fn url_for(&self, req: &RequestDescriptor) -> String {
        format!("{}{}", self.api_base, req.path)
    }

    /// Run the credential test request (the authenticated user).
    pub async fn check_credentials(&self) -> Result<Value> {
        let user = self.request(&credentials::test_request()).await?;
        user.ok_or_else(|| Error::Request("Credential test returned an empty response".into()))
    }
}

impl HttpHelper for ForgejoClient {
    async fn request(&self, req: &RequestDescriptor) -> Result<Option<Value>> {
        let url = self.url_for(req);
        debug!("{} {}", req.method, url);
        let mut builder = self
            .client
            .request(req.method.into(), &url)
            .header(AUTHORIZATION, auth_header(&self.token)?);
        let pairs = req.query_pairs();
        if !pairs.is_empty() {
            builder = builder.query(&pairs);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let res = builder.send().await.map_err(|e| {
            warn!("{} {} failed to send: {}", req.method, url, e);
            Error::from(e)
        })?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            warn!("{} {} returned {}", req.method, url, status);
            return Err(map_status_to_error(status, text));
        }
        Ok(decode_body(&text))
    }
}
