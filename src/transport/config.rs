//! Configuration constants for the Portal transport

use std::time::Duration;

/// Base URL used when neither the builder nor the environment provides one
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:18084";

/// Prefix every Portal route lives under
pub const DEFAULT_API_PREFIX: &str = "/portal";

/// Prefix of the versioned action routes, relative to the API prefix
pub const DEFAULT_V1_PREFIX: &str = "/v1";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Upper bound on how much of an error body is kept
pub const MAX_ERROR_BODY_BYTES: usize = 1000;

/// Primary admin credential header
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Legacy admin credential header still read by older Portal builds
pub const LEGACY_ADMIN_TOKEN_HEADER: &str = "X-Portal-Admin-Token";

/// JSON media type
pub const APPLICATION_JSON: &str = "application/json";

/// Base URL environment variable
pub const ENV_BASE_URL: &str = "GF_PORTAL_BASE_URL";

/// Base URL fallback environment variable
pub const ENV_BASE_URL_FALLBACK: &str = "PORTAL_BASE_URL";

/// API prefix environment variable
pub const ENV_API_PREFIX: &str = "GF_PORTAL_API_PREFIX";

/// v1 prefix environment variable
pub const ENV_V1_PREFIX: &str = "GF_PORTAL_V1_PREFIX";

/// Admin token environment variable
pub const ENV_ADMIN_TOKEN: &str = "PORTAL_ADMIN_TOKEN";

/// Admin token fallback environment variable
pub const ENV_ADMIN_TOKEN_FALLBACK: &str = "GF_PORTAL_ADMIN_TOKEN";

/// Request timeout environment variable, in milliseconds
pub const ENV_TIMEOUT_MS: &str = "GF_PORTAL_TIMEOUT_MS";
