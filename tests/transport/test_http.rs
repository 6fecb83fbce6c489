//! HTTP transport behavior against a mock server and raw sockets

use std::time::Duration;

use gf_portal_client::{HttpTransport, PortalError, PortalRequest, Transport};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn transport(timeout_ms: u64) -> HttpTransport {
    HttpTransport::new(Duration::from_millis(timeout_ms)).unwrap()
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    init_logging();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/portal/v1/session/s/actions/e")
        .with_status(409)
        .with_body(r#"{"error":"not_ready"}"#)
        .create_async()
        .await;

    let url = format!("{}/portal/v1/session/s/actions/e", server.url());
    let err = assert_err!(transport(5_000).send(PortalRequest::get(url)).await);

    match &err {
        PortalError::Http {
            status,
            status_text,
            body,
        } => {
            assert_eq!(*status, 409);
            assert_eq!(status_text, "Conflict");
            assert_eq!(body.as_deref(), Some(r#"{"error":"not_ready"}"#));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        r#"Portal request failed: 409 Conflict: {"error":"not_ready"}"#
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn large_error_body_is_truncated() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/boom")
        .with_status(500)
        .with_body("x".repeat(256 * 1024))
        .create_async()
        .await;

    let url = format!("{}/boom", server.url());
    let err = assert_err!(transport(5_000).send(PortalRequest::post(url)).await);
    match err {
        PortalError::Http { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body.map(|b| b.len()), Some(1_000));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_body_is_omitted_from_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;

    let url = format!("{}/missing", server.url());
    let err = assert_err!(transport(5_000).send(PortalRequest::get(url)).await);
    assert_eq!(err.to_string(), "Portal request failed: 404 Not Found");
}

#[tokio::test]
async fn success_body_must_be_json() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/text")
        .with_status(200)
        .with_body("definitely not json")
        .create_async()
        .await;

    let url = format!("{}/text", server.url());
    let err = assert_err!(transport(5_000).send(PortalRequest::get(url)).await);
    assert!(matches!(err, PortalError::JsonDecode(_)));
}

#[tokio::test]
async fn empty_success_body_decodes_to_null() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/empty")
        .with_status(204)
        .create_async()
        .await;

    let url = format!("{}/empty", server.url());
    let value = assert_ok!(transport(5_000).send(PortalRequest::post(url)).await);
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn caller_headers_override_defaults() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/echo")
        .match_header("accept", "application/vnd.portal+json")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let url = format!("{}/echo", server.url());
    let request = PortalRequest::post(url)
        .header("Accept", "application/vnd.portal+json")
        .json(json!({ "ping": 1 }));
    let value = assert_ok!(transport(5_000).send(request).await);
    assert_eq!(value, json!({ "ok": true }));
    mock.assert_async().await;
}

#[tokio::test]
async fn stalled_server_hits_request_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let stall = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let url = format!("http://{addr}/portal/health");
    let err = assert_err!(transport(200).send(PortalRequest::get(url.clone())).await);
    match &err {
        PortalError::RequestTimeout { url: timed_out, timeout } => {
            assert_eq!(timed_out, &url);
            assert_eq!(*timeout, Duration::from_millis(200));
        }
        other => panic!("expected RequestTimeout, got {other:?}"),
    }
    assert!(err.is_timeout());
    stall.abort();
}

#[tokio::test]
async fn refused_connection_is_a_connection_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let url = format!("http://{addr}/health");
    let err = assert_err!(transport(2_000).send(PortalRequest::get(url)).await);
    assert!(matches!(err, PortalError::Connection(_)), "{err:?}");
}
