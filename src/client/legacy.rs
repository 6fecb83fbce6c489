//! Health check and the pre-v1 session/exec routes

use super::client_impl::require;
use crate::error::{PortalError, Result};
use crate::transport::url::encode_segment;
use crate::transport::{PortalRequest, Transport};
use crate::types::health::PortalHealth;
use crate::types::invoice::{DEFAULT_INVOICE_CURRENCY, InvoiceSessionOptions, InvoiceSessionResponse};
use crate::types::session::LegacyActionResult;

impl<T: Transport> super::PortalClient<T> {
    /// Query the Portal health endpoint
    ///
    /// Tries `/health` at the root first. Deployments that only expose it
    /// under the API prefix are reached by a single retry at
    /// `{api_prefix}/health`; with no API prefix the first error is returned.
    ///
    /// # Errors
    /// Returns the transport error of the last attempt
    pub async fn health(&self) -> Result<PortalHealth> {
        match self.send(PortalRequest::get(self.config.root_url("/health"))).await {
            Ok(health) => Ok(health),
            Err(err) if self.config.api_prefix().is_empty() => Err(err),
            Err(err) => {
                log::debug!("root health check failed ({err}), retrying under API prefix");
                self.send(PortalRequest::get(self.config.api_url("/health")))
                    .await
            }
        }
    }

    /// Start a session backed by an invoice for `amount`
    ///
    /// # Errors
    /// Returns [`PortalError::Validation`] if the amount is not a finite number
    /// or non-empty string, otherwise any transport error
    pub async fn start_invoice_session(
        &self,
        options: &InvoiceSessionOptions,
    ) -> Result<InvoiceSessionResponse> {
        let amount = options.amount.to_query_value().ok_or_else(|| {
            PortalError::validation(
                "Portal session start amount must be a finite number or non-empty string.",
            )
        })?;

        let mut request = PortalRequest::post(self.config.api_url("/session/start"))
            .query("amount", amount)
            .query(
                "currency",
                options
                    .currency
                    .as_deref()
                    .unwrap_or(DEFAULT_INVOICE_CURRENCY),
            );
        if let Some(memo) = options.memo.as_deref().filter(|m| !m.is_empty()) {
            request = request.query("memo", memo);
        }
        if let Some(session_id) = options.session_id.as_ref().filter(|id| !id.is_blank()) {
            request = request.query("session_id", session_id.as_str());
        }
        self.send(request).await
    }

    /// Run an action through the pre-v1 `/exec` route (admin only)
    ///
    /// # Errors
    /// Returns [`PortalError::Validation`] for an empty session id or action,
    /// [`PortalError::AdminTokenRequired`] without a configured token,
    /// otherwise any transport error
    pub async fn execute_action(
        &self,
        session_id: impl AsRef<str>,
        action: &str,
    ) -> Result<LegacyActionResult> {
        let session_id = require("sessionId", session_id.as_ref())?;
        require("action", action)?;
        let token = self.require_admin("executeAction")?;

        let url = self
            .config
            .api_url(&format!("/session/{}/exec", encode_segment(session_id)));
        let request = PortalRequest::post(url)
            .admin_token(token)
            .json(serde_json::json!({ "action": action }));
        self.send(request).await
    }
}
