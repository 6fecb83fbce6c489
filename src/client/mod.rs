//! `PortalClient` for session and execution workflows
//!
//! This module provides the client for driving Portal sessions:
//! - Starting a session and waiting for it to settle
//! - Requesting an action and dispatching it (admin only)
//! - Reading execution receipts
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     PortalClient                      │
//! │                                                       │
//! │  ┌───────────────────┐       ┌────────────────────┐   │
//! │  │ Arc<PortalConfig> │       │   Arc<Transport>   │   │
//! │  │                   │       │                    │   │
//! │  │ • base URL        │       │ • one request per  │   │
//! │  │ • api/v1 prefixes │──URL─→│   call, no retries │   │
//! │  │ • admin token     │       │ • per-call timeout │   │
//! │  └───────────────────┘       └────────────────────┘   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration is fixed at construction. Cloning a client is cheap and all
//! clones share the same connection pool.
//!
//! # Example: Full Flow
//!
//! ```no_run
//! use gf_portal_client::{
//!     ActionRequestOptions, PortalClient, PortalConfig, SessionStartOptions, WaitOptions,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PortalConfig::builder()
//!     .base_url("https://portal.example")
//!     .admin_token("secret")
//!     .build()?;
//! let client = PortalClient::new(config)?;
//!
//! let session = client.session_start(&SessionStartOptions::scrap_native(1)).await?;
//! client.wait_until_ready(&session.session_id, Default::default()).await?;
//!
//! let requested = client
//!     .action_request(&session.session_id, &ActionRequestOptions::new("demo:hello", "EXECUTOR_DEMO"))
//!     .await?;
//! client.action_run(&session.session_id, &requested.execution_id).await?;
//!
//! let receipt = client
//!     .execution(session.session_id.clone(), requested.execution_id)
//!     .wait_for(WaitOptions::default())
//!     .await?;
//! log::info!("final status: {}", receipt.status);
//! # Ok(())
//! # }
//! ```

mod client_impl;
mod legacy;
mod readiness;

use std::sync::Arc;

use crate::transport::{HttpTransport, Transport};
use crate::types::options::PortalConfig;

pub use readiness::ReadyWaitOptions;

/// Client for the Portal session and execution API
///
/// Generic over its [`Transport`] so tests can substitute an in-memory one;
/// production code uses the default [`HttpTransport`].
pub struct PortalClient<T: Transport = HttpTransport> {
    /// Immutable connection settings
    config: Arc<PortalConfig>,
    /// Request executor
    transport: Arc<T>,
}

impl<T: Transport> Clone for PortalClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> std::fmt::Debug for PortalClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
