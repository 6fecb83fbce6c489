//! Type definitions for the Portal client
//!
//! - [`identifiers`] - Type-safe ID wrappers (`SessionId`, `ExecutionId`, `ExecutorId`)
//! - [`options`] - Client configuration and its builder
//! - [`session`] - Session and action request/response types
//! - [`receipt`] - Execution receipts, statuses and phases
//! - [`invoice`] - Invoice-backed session start
//! - [`health`] - Health endpoint payload

pub mod health;
pub mod identifiers;
pub mod invoice;
pub mod options;
pub mod receipt;
pub mod session;

// Re-export commonly used types
pub use identifiers::{ExecutionId, ExecutorId, SessionId};
pub use options::{PortalConfig, PortalConfigBuilder};
pub use receipt::{ExecutionPhase, ExecutionReceipt, ExecutionStatus, QueueInfo, QueueState};
pub use session::{
    ActionRequestOptions, ActionRequestResponse, ActionRunResponse, SessionReadyResponse,
    SessionStartOptions, SessionStartResponse,
};
