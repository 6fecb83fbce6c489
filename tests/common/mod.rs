//! Shared test helpers
//!
//! `ScriptedTransport` replays canned replies in order and records every
//! request it receives. Once a single successful reply is left it repeats,
//! which keeps "poll until the deadline" tests short to write.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use gf_portal_client::{PortalClient, PortalConfig, PortalError, PortalRequest, Result, Transport};
use serde_json::{Value, json};

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<Value>>,
    requests: Vec<PortalRequest>,
}

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Result<Value>>) -> Self {
        let transport = Self::default();
        transport.script.lock().unwrap().replies = replies.into_iter().collect();
        transport
    }

    pub fn replying(values: impl IntoIterator<Item = Value>) -> Self {
        Self::new(values.into_iter().map(Ok))
    }

    pub fn requests(&self) -> Vec<PortalRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.script.lock().unwrap().requests.len()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: PortalRequest) -> Result<Value> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(request);
        match script.replies.len() {
            0 => Err(PortalError::connection("script exhausted")),
            1 => match script.replies.front() {
                Some(Ok(value)) => Ok(value.clone()),
                _ => script.replies.pop_front().unwrap(),
            },
            _ => script.replies.pop_front().unwrap(),
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn config(admin_token: &str) -> PortalConfig {
    PortalConfig::builder()
        .ignore_env()
        .base_url("https://example.test")
        .api_prefix("/portal")
        .v1_prefix("/v1")
        .admin_token(admin_token)
        .build()
        .unwrap()
}

pub fn scripted_client(
    admin_token: &str,
    replies: impl IntoIterator<Item = Result<Value>>,
) -> (PortalClient<ScriptedTransport>, ScriptedTransport) {
    let transport = ScriptedTransport::new(replies);
    let client = PortalClient::with_transport(config(admin_token), transport.clone());
    (client, transport)
}

pub fn receipt(status: &str) -> Value {
    json!({
        "session_id": "sess_123",
        "execution_id": "exec_123",
        "executor_id": "EXECUTOR_DEMO",
        "action": "demo:hello",
        "status": status,
    })
}

pub fn http_client(server_url: &str, admin_token: &str) -> PortalClient {
    let config = PortalConfig::builder()
        .ignore_env()
        .base_url(server_url)
        .admin_token(admin_token)
        .build()
        .unwrap();
    PortalClient::new(config).unwrap()
}
