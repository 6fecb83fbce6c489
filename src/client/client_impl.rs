//! `PortalClient` implementation
//!
//! This module contains the constructors and the session/action operations.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{PortalError, Result};
use crate::execution::ExecutionHandle;
use crate::transport::url::encode_segment;
use crate::transport::{HttpTransport, PortalRequest, Transport};
use crate::types::identifiers::{ExecutionId, SessionId};
use crate::types::options::PortalConfig;
use crate::types::receipt::ExecutionReceipt;
use crate::types::session::{
    ActionRequestOptions, ActionRequestResponse, ActionRunResponse, SessionReadyResponse,
    SessionStartOptions, SessionStartResponse,
};

impl super::PortalClient<HttpTransport> {
    /// Create a client that talks HTTP
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: PortalConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client from environment variables and defaults
    ///
    /// # Errors
    /// Returns error on invalid configuration (including the v1 prefix
    /// guardrail) or if the HTTP client cannot be built
    pub fn from_env() -> Result<Self> {
        Self::new(PortalConfig::from_env()?)
    }
}

impl<T: Transport> super::PortalClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(config: PortalConfig, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    /// Configuration this client was built with
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Handle for polling one execution
    pub fn execution(
        &self,
        session_id: impl Into<SessionId>,
        execution_id: impl Into<ExecutionId>,
    ) -> ExecutionHandle<T> {
        ExecutionHandle::new(self.clone(), session_id.into(), execution_id.into())
    }

    /// Start a session
    ///
    /// Parameters travel in the query string of an empty-bodied POST. Session
    /// creation is public: no admin header is ever attached here.
    ///
    /// # Errors
    /// Returns [`PortalError::Validation`] for an empty session kind or zero
    /// units, otherwise any transport error
    pub async fn session_start(
        &self,
        options: &SessionStartOptions,
    ) -> Result<SessionStartResponse> {
        if options.session_kind.trim().is_empty() {
            return Err(PortalError::validation("session_kind is required."));
        }
        if options.units == 0 {
            return Err(PortalError::validation("units must be a positive integer."));
        }

        let request = PortalRequest::post(self.config.api_url("/session/start"))
            .query("session_kind", options.session_kind.as_str())
            .query("units", options.units.to_string());
        self.send(request).await
    }

    /// Check whether a session is ready (paid and settled)
    ///
    /// # Errors
    /// Returns [`PortalError::Validation`] for an empty session id, otherwise
    /// any transport error
    pub async fn session_ready(&self, session_id: impl AsRef<str>) -> Result<SessionReadyResponse> {
        let session_id = require("sessionId", session_id.as_ref())?;
        let url = self
            .config
            .api_url(&format!("/session/{}/ready", encode_segment(session_id)));
        self.send(PortalRequest::get(url)).await
    }

    /// Request that an executor perform an action
    ///
    /// Any session holder may queue work; dispatch is a separate, admin-only
    /// step ([`action_run`](Self::action_run)).
    ///
    /// # Errors
    /// Returns [`PortalError::Validation`] if the session id, action or
    /// executor id is empty, otherwise any transport error
    pub async fn action_request(
        &self,
        session_id: impl AsRef<str>,
        options: &ActionRequestOptions,
    ) -> Result<ActionRequestResponse> {
        let session_id = require("sessionId", session_id.as_ref())?;
        require("action", &options.action)?;
        require("executor_id", options.executor_id.as_str())?;

        let url = self.config.v1_url(&format!(
            "/session/{}/actions/request",
            encode_segment(session_id)
        ));
        let body = serde_json::json!({
            "action": options.action,
            "executor_id": options.executor_id,
            "params": options.params,
        });
        self.send(PortalRequest::post(url).json(body)).await
    }

    /// Dispatch a previously requested action (admin only)
    ///
    /// # Errors
    /// Returns [`PortalError::AdminTokenRequired`] without touching the network
    /// when no admin token is configured, [`PortalError::Validation`] for empty
    /// ids, otherwise any transport error
    pub async fn action_run(
        &self,
        session_id: impl AsRef<str>,
        execution_id: impl AsRef<str>,
    ) -> Result<ActionRunResponse> {
        let token = self.require_admin("actionRun")?;
        let session_id = require("sessionId", session_id.as_ref())?;
        let execution_id = require("executionId", execution_id.as_ref())?;

        let url = self.config.v1_url(&format!(
            "/session/{}/actions/{}/run",
            encode_segment(session_id),
            encode_segment(execution_id)
        ));
        self.send(PortalRequest::post(url).admin_token(token)).await
    }

    /// Fetch the current receipt of an execution
    ///
    /// # Errors
    /// Returns [`PortalError::Validation`] for empty ids, otherwise any
    /// transport error
    pub async fn execution_get(
        &self,
        session_id: impl AsRef<str>,
        execution_id: impl AsRef<str>,
    ) -> Result<ExecutionReceipt> {
        let session_id = require("sessionId", session_id.as_ref())?;
        let execution_id = require("executionId", execution_id.as_ref())?;

        let url = self.config.v1_url(&format!(
            "/session/{}/actions/{}",
            encode_segment(session_id),
            encode_segment(execution_id)
        ));
        self.send(PortalRequest::get(url)).await
    }

    /// Admin token, or the error naming the gated operation
    pub(super) fn require_admin(&self, method: &str) -> Result<&str> {
        self.config
            .admin_token()
            .ok_or_else(|| PortalError::admin_token_required(method))
    }

    /// Send through the transport and decode the response
    pub(super) async fn send<R: DeserializeOwned>(&self, request: PortalRequest) -> Result<R> {
        let value = self.transport.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Reject empty identifiers before any request is built
pub(super) fn require<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(PortalError::validation(format!("{name} is required.")))
    } else {
        Ok(value)
    }
}
