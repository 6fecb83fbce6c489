//! Portal client configuration
//!
//! [`PortalConfig`] is built once through [`PortalConfigBuilder`] and never
//! changes afterwards. Values given to the builder win over environment
//! variables, which win over built-in defaults.

use std::time::Duration;

use crate::error::{PortalError, Result};
use crate::transport::config::{
    DEFAULT_API_PREFIX, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_V1_PREFIX, ENV_ADMIN_TOKEN,
    ENV_ADMIN_TOKEN_FALLBACK, ENV_API_PREFIX, ENV_BASE_URL, ENV_BASE_URL_FALLBACK, ENV_TIMEOUT_MS,
    ENV_V1_PREFIX,
};
use crate::transport::url::{join_url, normalize_base_url, normalize_prefix, validate_v1_prefix};

// ============================================================================
// Portal Config
// ============================================================================

/// Immutable connection settings shared by every Portal operation
#[derive(Clone, PartialEq, Eq)]
pub struct PortalConfig {
    base_url: String,
    api_prefix: String,
    v1_prefix: String,
    admin_token: Option<String>,
    timeout: Duration,
}

impl PortalConfig {
    /// Create a new builder for `PortalConfig`
    #[must_use]
    pub fn builder() -> PortalConfigBuilder {
        PortalConfigBuilder::default()
    }

    /// Build a configuration purely from environment variables and defaults
    ///
    /// # Errors
    /// Returns [`PortalError::InvalidConfig`] on a malformed value
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Normalized API prefix (`/portal`), or empty
    #[must_use]
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Normalized v1 prefix (`/v1`), or empty
    #[must_use]
    pub fn v1_prefix(&self) -> &str {
        &self.v1_prefix
    }

    /// Admin token, if one is configured
    #[must_use]
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }

    /// Per-request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// URL directly under the base, ignoring both prefixes
    #[must_use]
    pub fn root_url(&self, path: &str) -> String {
        join_url(&self.base_url, &[path])
    }

    /// URL under the API prefix
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.base_url, &[self.api_prefix.as_str(), path])
    }

    /// URL under the API prefix followed by the v1 prefix
    #[must_use]
    pub fn v1_url(&self, path: &str) -> String {
        join_url(
            &self.base_url,
            &[self.api_prefix.as_str(), self.v1_prefix.as_str(), path],
        )
    }
}

impl std::fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalConfig")
            .field("base_url", &self.base_url)
            .field("api_prefix", &self.api_prefix)
            .field("v1_prefix", &self.v1_prefix)
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// Builder for PortalConfig
// ============================================================================

/// Builder for `PortalConfig`
#[derive(Debug, Default)]
pub struct PortalConfigBuilder {
    base_url: Option<String>,
    api_prefix: Option<String>,
    v1_prefix: Option<String>,
    admin_token: Option<String>,
    timeout: Option<Duration>,
    ignore_env: bool,
}

impl PortalConfigBuilder {
    /// Set the Portal base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API prefix (default `/portal`, empty string for none)
    #[must_use]
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = Some(prefix.into());
        self
    }

    /// Set the v1 prefix, relative to the API prefix (default `/v1`)
    #[must_use]
    pub fn v1_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.v1_prefix = Some(prefix.into());
        self
    }

    /// Set the admin token; a blank token means "no token"
    #[must_use]
    pub fn admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Do not consult environment variables for unset values
    #[must_use]
    pub const fn ignore_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    /// Returns [`PortalError::InvalidConfig`] when the base URL is not an
    /// absolute http(s) URL, the timeout is zero or unparseable, or the v1
    /// prefix repeats the API prefix (e.g. `/portal/v1`).
    pub fn build(self) -> Result<PortalConfig> {
        let env = |keys: &[&str]| -> Option<String> {
            if self.ignore_env {
                return None;
            }
            keys.iter().find_map(|key| non_blank(std::env::var(key).ok()))
        };

        let base_url = self
            .base_url
            .clone()
            .or_else(|| env(&[ENV_BASE_URL, ENV_BASE_URL_FALLBACK]))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = normalize_base_url(&base_url);
        check_base_url(&base_url)?;

        let api_prefix = self
            .api_prefix
            .clone()
            .or_else(|| env(&[ENV_API_PREFIX]))
            .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
        let v1_prefix = self
            .v1_prefix
            .clone()
            .or_else(|| env(&[ENV_V1_PREFIX]))
            .unwrap_or_else(|| DEFAULT_V1_PREFIX.to_string());
        let api_prefix = normalize_prefix(&api_prefix);
        let v1_prefix = normalize_prefix(&v1_prefix);
        validate_v1_prefix(&api_prefix, &v1_prefix)?;

        // An explicit blank token disables the env lookup on purpose
        let admin_token = match self.admin_token.clone() {
            Some(token) => non_blank(Some(token)),
            None => env(&[ENV_ADMIN_TOKEN, ENV_ADMIN_TOKEN_FALLBACK]),
        };

        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => match env(&[ENV_TIMEOUT_MS]) {
                Some(raw) => parse_timeout_ms(&raw)?,
                None => DEFAULT_TIMEOUT,
            },
        };
        if timeout.is_zero() {
            return Err(PortalError::invalid_config(
                "Portal request timeout must be greater than zero.",
            ));
        }

        Ok(PortalConfig {
            base_url,
            api_prefix,
            v1_prefix,
            admin_token,
            timeout,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_base_url(base_url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(base_url).map_err(|e| {
        PortalError::invalid_config(format!("Invalid Portal base URL '{base_url}': {e}"))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(PortalError::invalid_config(format!(
            "Portal base URL must use http or https, got '{other}'."
        ))),
    }
}

fn parse_timeout_ms(raw: &str) -> Result<Duration> {
    raw.parse::<u64>().map(Duration::from_millis).map_err(|_| {
        PortalError::invalid_config(format!(
            "{ENV_TIMEOUT_MS} must be a positive number of milliseconds, got '{raw}'."
        ))
    })
}
