//! HTTP transport backed by `reqwest`

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::error::{PortalError, Result};

use super::config::{ADMIN_TOKEN_HEADER, APPLICATION_JSON, MAX_ERROR_BODY_BYTES};
use super::{PortalRequest, Transport};

/// Transport that talks to the Portal over HTTP(S)
///
/// Each call runs under its own timeout. The timer is part of the request
/// future, so it is torn down with the call whether it succeeds, fails or is
/// dropped by the caller.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("gf-portal-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PortalError::invalid_config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, timeout))
    }

    /// Wrap an existing `reqwest::Client`
    #[must_use]
    pub const fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Per-request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn execute(&self, request: PortalRequest) -> Result<serde_json::Value> {
        let PortalRequest {
            method,
            url,
            query,
            headers,
            body,
        } = request;

        let has_header = |name: &str| headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name));

        log::debug!(
            "portal request: {} {} (admin={})",
            method,
            url,
            if has_header(ADMIN_TOKEN_HEADER) { "yes" } else { "no" }
        );

        let mut builder = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if !has_header(ACCEPT.as_str()) {
            builder = builder.header(ACCEPT, APPLICATION_JSON);
        }
        if body.is_some() && !has_header(CONTENT_TYPE.as_str()) {
            builder = builder.header(CONTENT_TYPE, APPLICATION_JSON);
        }
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(&url, &e))?;
        let status = response.status();

        if !status.is_success() {
            let body = read_error_body(response).await;
            log::warn!("portal request {method} {url} failed with {status}");
            return Err(PortalError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(&url, &e))?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn map_send_error(&self, url: &str, err: &reqwest::Error) -> PortalError {
        if err.is_timeout() {
            PortalError::RequestTimeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            PortalError::connection(format!("{url}: {err}"))
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: PortalRequest) -> Result<serde_json::Value> {
        let url = request.url.clone();
        match tokio::time::timeout(self.timeout, self.execute(request)).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("portal request to {url} timed out after {:?}", self.timeout);
                Err(PortalError::RequestTimeout {
                    url,
                    timeout: self.timeout,
                })
            }
        }
    }
}

/// Best-effort read of an error body; never fails
///
/// Reads chunk by chunk and stops once `MAX_ERROR_BODY_BYTES` are buffered,
/// so a large error page is never held in full.
async fn read_error_body(mut response: reqwest::Response) -> Option<String> {
    let mut buf: Vec<u8> = Vec::new();
    while buf.len() < MAX_ERROR_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(e) => {
                log::debug!("failed to read portal error body: {e}");
                break;
            }
        }
    }
    error_body_prefix(&buf)
}

/// Lossy UTF-8 text of at most `MAX_ERROR_BODY_BYTES`, `None` when empty
fn error_body_prefix(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let text = String::from_utf8_lossy(&bytes[..bytes.len().min(MAX_ERROR_BODY_BYTES)]);
    Some(truncate_utf8(&text, MAX_ERROR_BODY_BYTES).to_string())
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char
fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
