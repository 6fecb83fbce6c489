//! URL composition
//!
//! Every Portal URL is `base` followed by zero or more prefix fragments and a
//! route path. Each fragment is trimmed of slashes on both ends and dropped
//! when empty, so `"/portal/"`, `"portal"` and `"/portal"` all compose the
//! same way.

use std::borrow::Cow;

use crate::error::{PortalError, Result};
use crate::transport::config::{ENV_API_PREFIX, ENV_V1_PREFIX};

/// Strip surrounding whitespace and any trailing slashes from a base URL
#[must_use]
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Normalize a prefix to `/segment[/segment...]`, or `""` when empty
#[must_use]
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Join `base` with the non-empty, slash-trimmed `parts`
#[must_use]
pub fn join_url(base: &str, parts: &[&str]) -> String {
    let base = base.trim_end_matches('/');
    let cleaned: Vec<&str> = parts
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect();

    if cleaned.is_empty() {
        return base.to_string();
    }
    format!("{base}/{}", cleaned.join("/"))
}

/// Reject a v1 prefix that already embeds the API prefix
///
/// The v1 prefix is appended after the API prefix, so `/portal/v1` under
/// `/portal` would produce `/portal/portal/v1/...`. Both arguments are
/// expected in normalized form.
///
/// # Errors
/// Returns [`PortalError::InvalidConfig`] when the first segment of
/// `v1_prefix` equals the first segment of `api_prefix`.
pub fn validate_v1_prefix(api_prefix: &str, v1_prefix: &str) -> Result<()> {
    let first_segment = |prefix: &str| {
        prefix
            .trim_matches('/')
            .split('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    if let (Some(api), Some(v1)) = (first_segment(api_prefix), first_segment(v1_prefix))
        && api == v1
    {
        return Err(PortalError::invalid_config(format!(
            "{ENV_V1_PREFIX} must be relative (e.g. '/v1'), not '{v1_prefix}'. It is appended to {ENV_API_PREFIX}."
        )));
    }
    Ok(())
}

/// Percent-encode a caller-supplied value for use as one path segment
#[must_use]
pub fn encode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::encode(segment)
}
