//! Polling a session until it is ready

use std::time::Duration;

use tokio::time::Instant;

use crate::error::{PortalError, Result};
use crate::transport::Transport;
use crate::types::session::SessionReadyResponse;

/// Options for [`PortalClient::wait_until_ready`](super::PortalClient::wait_until_ready)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyWaitOptions {
    /// Overall deadline, measured from the first poll; `Duration::MAX` waits forever
    pub timeout: Duration,
    /// Pause between polls
    pub poll_interval: Duration,
    /// Also require `settlement_ok == true`
    pub require_settlement: bool,
}

impl Default for ReadyWaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            poll_interval: Duration::from_millis(1500),
            require_settlement: true,
        }
    }
}

impl<T: Transport> super::PortalClient<T> {
    /// Poll [`session_ready`](Self::session_ready) until the session is usable
    ///
    /// Payment is settled out of band, so this can take minutes. The interval
    /// is constant; a failed poll aborts the wait.
    ///
    /// # Errors
    /// Returns [`PortalError::ReadyTimeout`] carrying the last status when the
    /// deadline passes, or the first request error
    pub async fn wait_until_ready(
        &self,
        session_id: impl AsRef<str>,
        options: ReadyWaitOptions,
    ) -> Result<SessionReadyResponse> {
        let session_id = session_id.as_ref();
        let deadline = Instant::now().checked_add(options.timeout);

        loop {
            let status = self.session_ready(session_id).await?;
            log::debug!(
                "session {session_id}: ready={} settlement={:?}",
                status.ready,
                status.settlement_state
            );

            if status.is_usable(options.require_settlement) {
                return Ok(status);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(PortalError::ReadyTimeout {
                    session_id: session_id.to_string(),
                    last_status: Some(Box::new(status)),
                });
            }
            tokio::time::sleep(options.poll_interval).await;
        }
    }
}
