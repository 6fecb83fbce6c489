//! # Portal Client for Rust
//!
//! An async client for the SCRAP Portal: start a billing session, wait for it
//! to settle, request an action from a named executor, dispatch it, and poll
//! the execution receipt until it is delivered or final.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gf_portal_client::{
//!     ActionRequestOptions, PortalClient, SessionStartOptions, WaitOptions, WaitUntil,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // GF_PORTAL_BASE_URL, GF_PORTAL_API_PREFIX, GF_PORTAL_V1_PREFIX,
//!     // PORTAL_ADMIN_TOKEN are read here, once
//!     let client = PortalClient::from_env()?;
//!
//!     let session = client.session_start(&SessionStartOptions::scrap_native(1)).await?;
//!     client.wait_until_ready(&session.session_id, Default::default()).await?;
//!
//!     let options = ActionRequestOptions::new("demo:hello", "EXECUTOR_DEMO");
//!     let requested = client.action_request(&session.session_id, &options).await?;
//!     client.action_run(&session.session_id, &requested.execution_id).await?;
//!
//!     let receipt = client
//!         .execution(session.session_id, requested.execution_id)
//!         .wait_for(
//!             WaitOptions::default()
//!                 .until(WaitUntil::Completed)
//!                 .on_update(|r| log::info!("status: {}", r.status)),
//!         )
//!         .await?;
//!     log::info!("executor ok: {:?}", receipt.executor_ok());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`transport`]: URL composition and the single-request HTTP executor
//! - [`client`]: session lifecycle, action request/dispatch, receipt reads
//! - [`execution`]: status classification and the receipt waiter
//! - [`types`]: configuration, identifiers, request and response types
//! - [`error`]: error types and handling
//!
//! ## Admin-gated Operations
//!
//! Creating sessions and requesting actions are open to any session holder.
//! Dispatching a requested action ([`PortalClient::action_run`]) requires an
//! admin token; without one the call fails before any request is sent.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, PortalError>`](Result):
//!
//! ```no_run
//! # use gf_portal_client::{PortalClient, PortalError};
//! # async fn example(client: PortalClient) {
//! match client.action_run("sess_1", "exec_1").await {
//!     Ok(run) => log::info!("dispatched {}", run.execution_id),
//!     Err(PortalError::AdminTokenRequired(method)) => {
//!         log::error!("{method} needs PORTAL_ADMIN_TOKEN");
//!     }
//!     Err(e) => log::error!("Error: {e}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod execution;
pub mod transport;
pub mod types;

// Re-export commonly used types for external API
pub use client::{PortalClient, ReadyWaitOptions};
pub use error::{PortalError, Result};
pub use execution::{ExecutionHandle, UpdateCallback, WaitOptions, WaitUntil, classify};
pub use transport::{HttpTransport, PortalRequest, Transport};

pub use types::health::PortalHealth;
pub use types::identifiers::{ExecutionId, ExecutorId, SessionId};
pub use types::invoice::{InvoiceAmount, InvoiceSessionOptions, InvoiceSessionResponse};
pub use types::options::{PortalConfig, PortalConfigBuilder};
pub use types::receipt::{ExecutionPhase, ExecutionReceipt, ExecutionStatus, QueueInfo, QueueState};
pub use types::session::{
    ActionRequestOptions, ActionRequestResponse, ActionRunResponse, LegacyActionResult,
    SESSION_KIND_SCRAP_NATIVE, SessionReadyResponse, SessionStartOptions, SessionStartResponse,
};

/// Version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
