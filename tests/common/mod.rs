//! Common test utilities for integration tests.
//!
//! Upstream SSE builders, a wiremock-backed upstream, and a relay server
//! bound to a random local port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use chat_relay::adapters::ReqwestHttpClient;
use chat_relay::config::RelayConfig;
use chat_relay::server::{start_server_on, AppState};
use chat_relay::upstream::UpstreamClient;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-access-token-12345";

pub const FINISH_LINE: &str =
    "d:{\"finishReason\":\"stop\",\"usage\":{\"promptTokens\":0,\"completionTokens\":0}}";

/// One upstream SSE record, newline-terminated.
pub fn record(event_type: &str, data: Value) -> String {
    format!("data: {}\n", json!({"type": event_type, "data": data}))
}

pub fn text_delta(delta: &str) -> String {
    record("raw_response_event", json!({ "delta": delta }))
}

pub fn completed() -> String {
    record("status_event", json!({"status": "completed"}))
}

/// A turn with a conversation id, an agent, a full tool cycle and two deltas.
pub fn tool_turn() -> String {
    [
        record("conversation_id", json!({"conversation_id": "conv-42"})),
        record("agent_updated_stream_event", json!({"agent_name": "SalesAgent"})),
        record(
            "status_event",
            json!({
                "status": "tool_started",
                "tool_name": "catalog_search",
                "message": "Searching catalog \"widgets\"",
                "arguments": {"q": "widgets"}
            }),
        ),
        record(
            "run_item_stream_event",
            json!({"item_type": "tool_call_item", "tool_name": "catalog_search", "arguments": "{\"q\":\"widgets\"}"}),
        ),
        record(
            "run_item_stream_event",
            json!({"item_type": "tool_call_output_item", "tool_name": "catalog_search", "output": "3 results"}),
        ),
        record("status_event", json!({"status": "tool_completed", "tool_name": "catalog_search"})),
        text_delta("Found "),
        text_delta("3 widgets."),
        completed(),
    ]
    .concat()
}

/// A running relay wired to a wiremock upstream.
pub struct TestRelay {
    pub upstream: MockServer,
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestRelay {
    pub async fn start() -> Self {
        let upstream = MockServer::start().await;
        let client = UpstreamClient::new(upstream.uri(), Arc::new(ReqwestHttpClient::new()));
        let config = RelayConfig::new()
            .with_upstream_url(upstream.uri())
            .with_channel_capacity(4);

        let (handle, addr) = start_server_on("127.0.0.1:0".parse().unwrap(), AppState::new(client, config))
            .await
            .expect("Failed to start relay");

        Self {
            upstream,
            addr,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn cookie(&self) -> String {
        format!("access_token={}", TEST_TOKEN)
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Client that never follows redirects, so `Location` headers stay visible.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build client")
}
