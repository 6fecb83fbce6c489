//! Receipt waiter and session readiness polling
//!
//! Runs on paused tokio time, so poll intervals and deadlines elapse
//! instantly and poll counts are exact.

#[path = "../common/mod.rs"]
mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{init_logging, receipt, scripted_client};
use gf_portal_client::{
    ExecutionPhase, ExecutionStatus, PortalError, QueueState, ReadyWaitOptions, WaitOptions,
    WaitUntil, classify,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

fn fast(options: WaitOptions) -> WaitOptions {
    options
        .poll_interval(Duration::from_millis(750))
        .timeout(Duration::from_secs(10))
}

#[tokio::test(start_paused = true)]
async fn delivered_returns_on_first_terminal_receipt() {
    init_logging();
    let (client, transport) = scripted_client(
        "",
        [
            Ok(receipt("TOKEN_ISSUED")),
            Ok(receipt("DISPATCHED")),
            Ok(receipt("DELIVERED_TO_EXECUTOR")),
            Ok(receipt("COMPLETED")),
        ],
    );

    let handle = client.execution("sess_123", "exec_123");
    let got = assert_ok!(handle.wait_for(fast(WaitOptions::default())).await);

    assert_eq!(got.status, ExecutionStatus::DeliveredToExecutor);
    assert_eq!(transport.request_count(), 3);
    assert!(
        transport
            .requests()
            .iter()
            .all(|r| r.url == "https://example.test/portal/v1/session/sess_123/actions/exec_123")
    );
}

#[tokio::test(start_paused = true)]
async fn completed_polls_past_delivery() {
    let (client, transport) = scripted_client(
        "",
        [
            Ok(receipt("DELIVERED_TO_EXECUTOR")),
            Ok(receipt("PROOF_PENDING")),
            Ok(receipt("FAILED")),
        ],
    );

    let got = assert_ok!(
        client
            .execution("sess_123", "exec_123")
            .wait_for(fast(WaitOptions::default().until(WaitUntil::Completed)))
            .await
    );
    assert_eq!(got.status, ExecutionStatus::Failed);
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn already_final_receipt_returns_after_one_fetch() {
    let (client, transport) = scripted_client("", [Ok(receipt("EXPIRED"))]);

    let got = assert_ok!(
        client
            .execution("sess_123", "exec_123")
            .wait_for(WaitOptions::default().until(WaitUntil::Final))
            .await
    );
    assert_eq!(got.status, ExecutionStatus::Expired);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn return_on_queued_stops_at_queue() {
    let (client, transport) = scripted_client(
        "",
        [
            Ok(receipt("DISPATCHED")),
            Ok(receipt("RETRYING")),
            Ok(receipt("DELIVERED_TO_EXECUTOR")),
        ],
    );

    let got = assert_ok!(
        client
            .execution("sess_123", "exec_123")
            .wait_for(fast(
                WaitOptions::default()
                    .until(WaitUntil::Completed)
                    .return_on_queued(true)
            ))
            .await
    );
    assert_eq!(got.status, ExecutionStatus::Retrying);
    assert_eq!(classify(&got.status), ExecutionPhase::Queued);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn timeout_embeds_last_receipt() {
    let (client, transport) = scripted_client("", [Ok(receipt("DISPATCHED"))]);

    let err = assert_err!(
        client
            .execution("sess_123", "exec_123")
            .wait_for(
                WaitOptions::default()
                    .timeout(Duration::from_secs(2))
                    .poll_interval(Duration::from_millis(750))
            )
            .await
    );

    // Fetches at 0, 0.75, 1.5 and 2.25 seconds; the last one is past the deadline
    assert_eq!(transport.request_count(), 4);
    assert!(err.is_timeout());
    let message = err.to_string();
    assert!(
        message.starts_with("Timed out waiting for execution exec_123. Last receipt: {"),
        "{message}"
    );
    assert!(message.contains(r#""status":"DISPATCHED""#), "{message}");
    match err {
        PortalError::WaitTimeout {
            execution_id,
            last_receipt,
        } => {
            assert_eq!(execution_id, "exec_123");
            assert_eq!(
                last_receipt.map(|r| r.status),
                Some(ExecutionStatus::Dispatched)
            );
        }
        other => panic!("expected WaitTimeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn fetch_error_aborts_the_wait() {
    let (client, transport) = scripted_client(
        "",
        [
            Ok(receipt("DISPATCHED")),
            Err(PortalError::Http {
                status: 503,
                status_text: "Service Unavailable".into(),
                body: None,
            }),
            Ok(receipt("COMPLETED")),
        ],
    );

    let err = assert_err!(
        client
            .execution("sess_123", "exec_123")
            .wait_for(fast(WaitOptions::default()))
            .await
    );
    assert_eq!(err.status(), Some(503));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn on_update_sees_every_receipt_in_order() {
    let (client, _transport) = scripted_client(
        "",
        [
            Ok(receipt("TOKEN_ISSUED")),
            Ok(receipt("QUEUED")),
            Ok(receipt("COMPLETED")),
        ],
    );

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    assert_ok!(
        client
            .execution("sess_123", "exec_123")
            .wait_for(fast(
                WaitOptions::default().on_update(move |r| sink.lock().unwrap().push(r.status.clone()))
            ))
            .await
    );

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ExecutionStatus::TokenIssued,
            ExecutionStatus::Queued,
            ExecutionStatus::Completed,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_status_keeps_polling() {
    let (client, transport) = scripted_client(
        "",
        [
            Ok(receipt("WARMING_UP")),
            Ok(receipt("DELIVERED_TO_EXECUTOR")),
        ],
    );

    let got = assert_ok!(
        client
            .execution("sess_123", "exec_123")
            .wait_for(fast(WaitOptions::default()))
            .await
    );
    assert_eq!(got.status, ExecutionStatus::DeliveredToExecutor);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancellation_ends_the_wait() {
    let (client, transport) = scripted_client("", [Ok(receipt("DISPATCHED"))]);

    let token = CancellationToken::new();
    let trigger = token.clone();
    let err = assert_err!(
        client
            .execution("sess_123", "exec_123")
            .wait_for(
                fast(WaitOptions::default())
                    .cancel_with(token)
                    .on_update(move |_| trigger.cancel())
            )
            .await
    );
    assert!(matches!(err, PortalError::Cancelled(_)), "{err:?}");
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn handles_poll_independently() {
    let (client, transport) = scripted_client("", [Ok(receipt("COMPLETED"))]);

    let first = client.execution("sess_123", "exec_a");
    let second = client.execution("sess_123", "exec_b");
    let (a, b) = tokio::join!(
        first.wait_for(WaitOptions::default()),
        second.wait_for(WaitOptions::default())
    );
    assert_ok!(a);
    assert_ok!(b);

    let mut urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            "https://example.test/portal/v1/session/sess_123/actions/exec_a",
            "https://example.test/portal/v1/session/sess_123/actions/exec_b",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn unbounded_timeout_waits_without_deadline() {
    let (client, transport) = scripted_client(
        "",
        [Ok(receipt("DISPATCHED")), Ok(receipt("COMPLETED"))],
    );

    let got = assert_ok!(
        client
            .execution("sess_123", "exec_123")
            .wait_for(WaitOptions::default().until(WaitUntil::Completed).timeout(Duration::MAX))
            .await
    );
    assert_eq!(got.status, ExecutionStatus::Completed);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn unrecognized_queue_state_does_not_break_polling() {
    let mut queued = receipt("QUEUED");
    queued["queue"] = json!({ "state": "PAUSED", "attempt": 1 });
    let (client, _transport) = scripted_client("", [Ok(queued)]);

    let got = assert_ok!(
        client
            .execution("sess_123", "exec_123")
            .wait_for(fast(WaitOptions::default().return_on_queued(true)))
            .await
    );
    assert_eq!(got.status, ExecutionStatus::Queued);
    assert_eq!(
        got.queue.map(|q| q.state),
        Some(QueueState::Unknown("PAUSED".into()))
    );
}

// ============================================================================
// Session readiness
// ============================================================================

#[tokio::test(start_paused = true)]
async fn wait_until_ready_requires_settlement() {
    let (client, transport) = scripted_client(
        "",
        [
            Ok(json!({ "ready": false, "settlement_state": "PENDING" })),
            Ok(json!({ "ready": true, "settlement_state": "PENDING" })),
            Ok(json!({ "ready": true, "settlement_state": "SETTLED", "settlement_ok": true })),
        ],
    );

    let ready = assert_ok!(client.wait_until_ready("sess_123", ReadyWaitOptions::default()).await);
    assert_eq!(ready.settlement_state.as_deref(), Some("SETTLED"));
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn wait_until_ready_can_skip_settlement() {
    let (client, transport) = scripted_client(
        "",
        [
            Ok(json!({ "ready": false })),
            Ok(json!({ "ready": true })),
        ],
    );

    let options = ReadyWaitOptions {
        require_settlement: false,
        ..ReadyWaitOptions::default()
    };
    assert_ok!(client.wait_until_ready("sess_123", options).await);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn wait_until_ready_accepts_unbounded_timeout() {
    let (client, transport) = scripted_client(
        "",
        [
            Ok(json!({ "ready": false })),
            Ok(json!({ "ready": true, "settlement_ok": true })),
        ],
    );

    let options = ReadyWaitOptions {
        timeout: Duration::MAX,
        ..ReadyWaitOptions::default()
    };
    let ready = assert_ok!(client.wait_until_ready("sess_123", options).await);
    assert!(ready.ready);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn wait_until_ready_times_out_with_last_status() {
    let (client, _transport) = scripted_client("", [Ok(json!({ "ready": false }))]);

    let options = ReadyWaitOptions {
        timeout: Duration::from_secs(5),
        poll_interval: Duration::from_secs(1),
        require_settlement: true,
    };
    let err = assert_err!(client.wait_until_ready("sess_123", options).await);
    match err {
        PortalError::ReadyTimeout {
            session_id,
            last_status,
        } => {
            assert_eq!(session_id, "sess_123");
            assert_eq!(last_status.map(|s| s.ready), Some(false));
        }
        other => panic!("expected ReadyTimeout, got {other:?}"),
    }
}
