//! Execution receipt types
//!
//! The receipt is the server-owned record of one action's progress. Known
//! fields are typed; anything else the Portal sends is kept in `extra` so a
//! newer server does not break older clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::identifiers::{ExecutionId, ExecutorId, SessionId};

// ============================================================================
// Execution Status
// ============================================================================

/// Lifecycle status reported by the Portal for one execution
///
/// Values outside the known vocabulary deserialize into [`ExecutionStatus::Unknown`]
/// instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    /// Execution token minted, nothing dispatched yet
    TokenIssued,
    /// Dispatch started
    Dispatched,
    /// Handed to the executor
    DeliveredToExecutor,
    /// Waiting in the delivery queue
    Queued,
    /// Delivery failed and will be retried
    Retrying,
    /// Executor finished, proof not yet settled
    ProofPending,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed,
    /// Gave up before completion
    Expired,
    /// Any status this client does not know about
    Unknown(String),
}

impl ExecutionStatus {
    /// Wire representation of the status
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::TokenIssued => "TOKEN_ISSUED",
            Self::Dispatched => "DISPATCHED",
            Self::DeliveredToExecutor => "DELIVERED_TO_EXECUTOR",
            Self::Queued => "QUEUED",
            Self::Retrying => "RETRYING",
            Self::ProofPending => "PROOF_PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Expired => "EXPIRED",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    /// Whether no further transitions are expected
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Expired)
    }
}

impl From<String> for ExecutionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "TOKEN_ISSUED" => Self::TokenIssued,
            "DISPATCHED" => Self::Dispatched,
            "DELIVERED_TO_EXECUTOR" => Self::DeliveredToExecutor,
            "QUEUED" => Self::Queued,
            "RETRYING" => Self::Retrying,
            "PROOF_PENDING" => Self::ProofPending,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            "EXPIRED" => Self::Expired,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<&str> for ExecutionStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        match status {
            ExecutionStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Execution Phase
// ============================================================================

/// Coarse five-way grouping of [`ExecutionStatus`] used to drive polling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionPhase {
    /// Accepted, not yet delivered
    Pending,
    /// Sitting in the delivery queue (including retries)
    Queued,
    /// Delivered to the executor
    Delivered,
    /// Completed
    Done,
    /// Failed or expired
    Error,
}

impl ExecutionPhase {
    /// Whether the phase is terminal for classification purposes
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl std::fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Queued => "QUEUED",
            Self::Delivered => "DELIVERED",
            Self::Done => "DONE",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Queue Sub-record
// ============================================================================

/// Queue state of an execution awaiting delivery
///
/// Open like [`ExecutionStatus`]: unrecognized states land in
/// [`QueueState::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QueueState {
    /// First attempt pending
    Queued,
    /// A previous attempt failed
    Retrying,
    /// Any queue state this client does not know about
    Unknown(String),
}

impl QueueState {
    /// Wire representation of the queue state
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "QUEUED",
            Self::Retrying => "RETRYING",
            Self::Unknown(raw) => raw.as_str(),
        }
    }
}

impl From<String> for QueueState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "QUEUED" => Self::Queued,
            "RETRYING" => Self::Retrying,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<QueueState> for String {
    fn from(state: QueueState) -> Self {
        match state {
            QueueState::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Delivery queue details attached to a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueInfo {
    /// Current queue state
    pub state: QueueState,
    /// Number of delivery attempts so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
    /// When the next attempt is scheduled (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_attempt_at: Option<String>,
    /// Error from the last failed attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueueInfo {
    /// Parse `next_attempt_at`, if present and well-formed
    #[must_use]
    pub fn next_attempt_time(&self) -> Option<DateTime<Utc>> {
        self.next_attempt_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// ============================================================================
// Execution Receipt
// ============================================================================

/// Authoritative record of one action's progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    /// Owning session
    pub session_id: SessionId,
    /// This execution
    pub execution_id: ExecutionId,
    /// Target executor
    #[serde(default)]
    pub executor_id: ExecutorId,
    /// Requested action
    #[serde(default)]
    pub action: String,
    /// Current lifecycle status
    pub status: ExecutionStatus,
    /// Creation timestamp
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Execution token details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Value>,
    /// Delivery details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Value>,
    /// Executor-defined result payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_result: Option<Value>,
    /// Queue details while queued or retrying
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueInfo>,
    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExecutionReceipt {
    /// Executor's own success verdict, when it reported one
    ///
    /// Looks at `executor_result.reply.reply.ok` (bridge-wrapped replies)
    /// and falls back to `executor_result.ok`. Anything that is not a JSON
    /// boolean counts as absent.
    #[must_use]
    pub fn executor_ok(&self) -> Option<bool> {
        let result = self.executor_result.as_ref()?;
        result
            .pointer("/reply/reply/ok")
            .and_then(Value::as_bool)
            .or_else(|| result.get("ok").and_then(Value::as_bool))
    }
}
