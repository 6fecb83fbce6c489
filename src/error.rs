//! Error types for the Portal client

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::types::receipt::ExecutionReceipt;
use crate::types::session::SessionReadyResponse;

/// Main error type for the Portal client
#[derive(Error, Debug)]
pub enum PortalError {
    /// A required argument was missing or empty
    #[error("{0}")]
    Validation(String),

    /// Invalid client configuration, detected at construction time
    #[error("{0}")]
    InvalidConfig(String),

    /// Admin-gated operation invoked without an admin token
    #[error(
        "Admin token is required for {0}. This method is admin-only. Invoice creation does not require an admin token."
    )]
    AdminTokenRequired(String),

    /// The Portal answered with a non-success status
    #[error("Portal request failed: {status} {status_text}{}", body_suffix(.body))]
    Http {
        /// Numeric HTTP status
        status: u16,
        /// Canonical reason phrase for the status code (e.g. `Not Found`),
        /// not the reason phrase the server sent on the status line
        status_text: String,
        /// First bytes of the response body, when readable and non-empty
        body: Option<String>,
    },

    /// Network failure before a response was received
    #[error("Portal connection error: {0}")]
    Connection(String),

    /// A single request exceeded its timeout and was cancelled
    #[error("Portal request to {url} timed out after {}ms", .timeout.as_millis())]
    RequestTimeout {
        /// Target URL
        url: String,
        /// Timeout that elapsed
        timeout: Duration,
    },

    /// An execution did not reach the requested state before the deadline
    #[error("Timed out waiting for execution {execution_id}.{}", snapshot_suffix("receipt", .last_receipt))]
    WaitTimeout {
        /// Execution being awaited
        execution_id: String,
        /// Last receipt fetched before the deadline, if any
        last_receipt: Option<Box<ExecutionReceipt>>,
    },

    /// A session did not become ready before the deadline
    #[error("Timed out waiting for session {session_id} to become ready.{}", snapshot_suffix("status", .last_status))]
    ReadyTimeout {
        /// Session being awaited
        session_id: String,
        /// Last readiness response, if any
        last_status: Option<Box<SessionReadyResponse>>,
    },

    /// A wait was cancelled by the caller
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// JSON decode error when parsing a Portal response
    #[error("JSON decode error: {0}")]
    JsonDecode(#[from] serde_json::Error),
}

/// Result type alias for Portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(": {b}"))
        .unwrap_or_default()
}

fn snapshot_suffix<T: Serialize>(label: &str, value: &Option<Box<T>>) -> String {
    match value {
        Some(v) => match serde_json::to_string(v) {
            Ok(json) => format!(" Last {label}: {json}"),
            Err(_) => String::new(),
        },
        None => String::new(),
    }
}

impl PortalError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an admin token error naming the gated operation
    pub fn admin_token_required(method: impl Into<String>) -> Self {
        Self::AdminTokenRequired(method.into())
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a cancellation error
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// HTTP status carried by the error, if it came from a Portal response
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is any kind of timeout (single request or overall wait)
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::RequestTimeout { .. } | Self::WaitTimeout { .. } | Self::ReadyTimeout { .. }
        )
    }
}
