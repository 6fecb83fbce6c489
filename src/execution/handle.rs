//! Execution handle and the receipt polling loop

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::classifier::classify;
use crate::client::PortalClient;
use crate::error::{PortalError, Result};
use crate::transport::{HttpTransport, Transport};
use crate::types::identifiers::{ExecutionId, SessionId};
use crate::types::receipt::{ExecutionPhase, ExecutionReceipt, ExecutionStatus};

/// Default overall deadline for [`ExecutionHandle::wait_for`]
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default pause between receipt polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(750);

/// Observer invoked with every fetched receipt
pub type UpdateCallback = Arc<dyn Fn(&ExecutionReceipt) + Send + Sync>;

// ============================================================================
// Stop Condition
// ============================================================================

/// When [`ExecutionHandle::wait_for`] should stop polling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaitUntil {
    /// Delivered to the executor, or already final
    #[default]
    Delivered,
    /// Completed, failed or expired
    Completed,
    /// Currently the same stop set as `Completed`
    Final,
}

impl WaitUntil {
    /// Whether `status` satisfies this stop condition
    #[must_use]
    pub const fn is_satisfied_by(self, status: &ExecutionStatus) -> bool {
        match self {
            Self::Delivered => {
                matches!(status, ExecutionStatus::DeliveredToExecutor) || status.is_final()
            }
            // TODO: make Final also wait for settlement proof once receipts report it
            Self::Completed | Self::Final => status.is_final(),
        }
    }
}

impl FromStr for WaitUntil {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DELIVERED" => Ok(Self::Delivered),
            "COMPLETED" => Ok(Self::Completed),
            "FINAL" => Ok(Self::Final),
            other => Err(PortalError::validation(format!(
                "until must be one of DELIVERED, COMPLETED, FINAL (got '{other}')."
            ))),
        }
    }
}

// ============================================================================
// Wait Options
// ============================================================================

/// Options for [`ExecutionHandle::wait_for`]
#[derive(Clone)]
pub struct WaitOptions {
    /// Stop condition
    pub until: WaitUntil,
    /// Overall deadline, fixed when the wait starts; `Duration::MAX` waits forever
    pub timeout: Duration,
    /// Constant pause between polls
    pub poll_interval: Duration,
    /// Return as soon as the receipt is in the QUEUED phase
    pub return_on_queued: bool,
    /// Observer called with every fetched receipt
    pub on_update: Option<UpdateCallback>,
    /// Caller-side cancellation
    pub cancel: Option<CancellationToken>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            until: WaitUntil::default(),
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            return_on_queued: false,
            on_update: None,
            cancel: None,
        }
    }
}

impl WaitOptions {
    /// Set the stop condition
    #[must_use]
    pub const fn until(mut self, until: WaitUntil) -> Self {
        self.until = until;
        self
    }

    /// Set the overall deadline
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Return once the execution is queued
    #[must_use]
    pub const fn return_on_queued(mut self, yes: bool) -> Self {
        self.return_on_queued = yes;
        self
    }

    /// Observe every fetched receipt
    #[must_use]
    pub fn on_update(mut self, callback: impl Fn(&ExecutionReceipt) + Send + Sync + 'static) -> Self {
        self.on_update = Some(Arc::new(callback));
        self
    }

    /// Abort the wait when `token` is cancelled
    #[must_use]
    pub fn cancel_with(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl std::fmt::Debug for WaitOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitOptions")
            .field("until", &self.until)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("return_on_queued", &self.return_on_queued)
            .field("on_update", &self.on_update.as_ref().map(|_| "<callback>"))
            .field("cancel", &self.cancel.is_some())
            .finish()
    }
}

// ============================================================================
// Execution Handle
// ============================================================================

/// Client-side view of one execution
///
/// Holds no receipt between calls; every `get` or poll reads the Portal.
/// Handles for different executions poll independently.
#[derive(Debug, Clone)]
pub struct ExecutionHandle<T: Transport = HttpTransport> {
    client: PortalClient<T>,
    session_id: SessionId,
    execution_id: ExecutionId,
}

impl<T: Transport> ExecutionHandle<T> {
    /// Pair a client with a session and execution id
    pub const fn new(client: PortalClient<T>, session_id: SessionId, execution_id: ExecutionId) -> Self {
        Self {
            client,
            session_id,
            execution_id,
        }
    }

    /// Session the execution belongs to
    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// The execution being tracked
    #[must_use]
    pub const fn execution_id(&self) -> &ExecutionId {
        &self.execution_id
    }

    /// Fetch the current receipt once
    ///
    /// # Errors
    /// Returns any error from [`PortalClient::execution_get`]
    pub async fn get(&self) -> Result<ExecutionReceipt> {
        self.client
            .execution_get(&self.session_id, &self.execution_id)
            .await
    }

    /// Poll until the stop condition holds or the deadline passes
    ///
    /// Always fetches at least once. Each iteration fetches the receipt,
    /// notifies `on_update`, then checks `return_on_queued` and `until`. The
    /// interval is fixed: no backoff, no jitter. A failed fetch ends the wait
    /// with that error; only a not-yet-final receipt leads to another poll.
    ///
    /// # Errors
    /// - [`PortalError::WaitTimeout`] with the last receipt when the deadline passes
    /// - [`PortalError::Cancelled`] when `options.cancel` fires
    /// - any error from fetching the receipt
    pub async fn wait_for(&self, options: WaitOptions) -> Result<ExecutionReceipt> {
        // A timeout past the clock's range means no deadline
        let deadline = Instant::now().checked_add(options.timeout);
        let mut polls: u32 = 0;

        loop {
            let receipt = self.cancellable(options.cancel.as_ref(), self.get()).await?;
            polls += 1;

            if let Some(on_update) = &options.on_update {
                on_update(&receipt);
            }

            let phase = classify(&receipt.status);
            log::debug!(
                "execution {} poll #{polls}: status={} phase={phase}",
                self.execution_id,
                receipt.status
            );

            if options.return_on_queued && phase == ExecutionPhase::Queued {
                log::info!("execution {} queued after {polls} poll(s)", self.execution_id);
                return Ok(receipt);
            }
            if options.until.is_satisfied_by(&receipt.status) {
                log::info!(
                    "execution {} reached {} after {polls} poll(s)",
                    self.execution_id,
                    receipt.status
                );
                return Ok(receipt);
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(PortalError::WaitTimeout {
                    execution_id: self.execution_id.to_string(),
                    last_receipt: Some(Box::new(receipt)),
                });
            }

            self.cancellable(options.cancel.as_ref(), async {
                tokio::time::sleep(options.poll_interval).await;
                Ok(())
            })
            .await?;
        }
    }

    async fn cancellable<R>(
        &self,
        cancel: Option<&CancellationToken>,
        fut: impl std::future::Future<Output = Result<R>>,
    ) -> Result<R> {
        let Some(token) = cancel else {
            return fut.await;
        };
        tokio::select! {
            biased;
            () = token.cancelled() => Err(PortalError::cancelled(format!(
                "wait for execution {} was cancelled",
                self.execution_id
            ))),
            result = fut => result,
        }
    }
}
