//! Transport layer for communicating with the Portal
//!
//! This module provides the transport abstraction and the HTTP implementation
//! used by [`PortalClient`](crate::PortalClient). A transport executes exactly
//! one request per call and never retries.

pub mod config;
pub mod http;
pub mod url;

use reqwest::Method;

use crate::error::Result;
use config::{ADMIN_TOKEN_HEADER, LEGACY_ADMIN_TOKEN_HEADER};

/// A single Portal request, fully composed by the client
#[derive(Debug, Clone, PartialEq)]
pub struct PortalRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL without query string
    pub url: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// Extra headers; defaults are added by the transport unless overridden here
    pub headers: Vec<(String, String)>,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
}

impl PortalRequest {
    /// Create a request with no query, headers or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach the admin credential under both the primary and legacy header
    #[must_use]
    pub fn admin_token(self, token: &str) -> Self {
        self.header(ADMIN_TOKEN_HEADER, token)
            .header(LEGACY_ADMIN_TOKEN_HEADER, token)
    }

    /// Set the JSON body
    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of a header, matched case-insensitively
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a header is present, matched case-insensitively
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.header_value(name).is_some()
    }
}

/// Transport trait for communicating with the Portal
///
/// Implementations send one request and decode the JSON response. Non-success
/// statuses must be reported as [`PortalError::Http`](crate::PortalError::Http)
/// and an elapsed timeout as
/// [`PortalError::RequestTimeout`](crate::PortalError::RequestTimeout).
pub trait Transport: Send + Sync {
    /// Send a request and return the decoded JSON body
    ///
    /// # Errors
    /// Returns error on network failure, timeout, non-success status or an
    /// undecodable body
    fn send(
        &self,
        request: PortalRequest,
    ) -> impl std::future::Future<Output = Result<serde_json::Value>> + Send;
}

pub use http::HttpTransport;
