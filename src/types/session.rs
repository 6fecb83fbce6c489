//! Session and action request/response types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::identifiers::{ExecutionId, ExecutorId, SessionId};
use super::receipt::ExecutionStatus;

/// Session kind used for natively billed SCRAP sessions
pub const SESSION_KIND_SCRAP_NATIVE: &str = "scrap_native";

// ============================================================================
// Session Start
// ============================================================================

/// Parameters for starting a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStartOptions {
    /// Billing kind of the session
    pub session_kind: String,
    /// Number of billable units to reserve
    pub units: u64,
}

impl SessionStartOptions {
    /// Options for a `scrap_native` session
    #[must_use]
    pub fn scrap_native(units: u64) -> Self {
        Self {
            session_kind: SESSION_KIND_SCRAP_NATIVE.to_string(),
            units,
        }
    }
}

/// Response from starting a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStartResponse {
    /// Newly created session
    pub session_id: SessionId,
    /// Remaining fields (invoice, pricing, checkout URL, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Session Readiness
// ============================================================================

/// Readiness and settlement state of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReadyResponse {
    /// Whether the session can accept actions
    #[serde(default)]
    pub ready: bool,
    /// Payment settlement state as reported by the Portal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_state: Option<String>,
    /// Whether settlement completed successfully
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_ok: Option<bool>,
    /// Echoed session id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionReadyResponse {
    /// Ready and, when `require_settlement` is set, explicitly settled
    #[must_use]
    pub fn is_usable(&self, require_settlement: bool) -> bool {
        self.ready && (!require_settlement || self.settlement_ok == Some(true))
    }
}

// ============================================================================
// Action Request / Run
// ============================================================================

/// Body of an action request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequestOptions {
    /// Action identifier, e.g. `demo:hello`
    pub action: String,
    /// Executor that should perform the action
    pub executor_id: ExecutorId,
    /// Free-form action parameters
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ActionRequestOptions {
    /// Request `action` on `executor_id` with no parameters
    pub fn new(action: impl Into<String>, executor_id: impl Into<ExecutorId>) -> Self {
        Self {
            action: action.into(),
            executor_id: executor_id.into(),
            params: Map::new(),
        }
    }

    /// Add one parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Response from requesting an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequestResponse {
    /// Identifier of the queued execution
    pub execution_id: ExecutionId,
    /// Initial status, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExecutionStatus>,
    /// Echoed session id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response from dispatching a requested action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRunResponse {
    /// Dispatched execution
    pub execution_id: ExecutionId,
    /// Status after dispatch, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExecutionStatus>,
    /// Echoed session id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Whether the Portal handed the action to the executor bridge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered: Option<bool>,
    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response from the legacy `/exec` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyActionResult {
    /// Session the action ran in
    pub session_id: SessionId,
    /// Execution state, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Action output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
