//! HTTP + SSE transport against a real listener

use httpmock::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use catalyst_center_mcp::api::{CatalystClient, Credentials};
use catalyst_center_mcp::mcp::{self, McpServer};

async fn start(upstream: &MockServer) -> String {
    let creds = Credentials::new(upstream.base_url(), "admin", "secret", true, Duration::from_secs(5));
    let server = Arc::new(McpServer::new(Arc::new(CatalystClient::new(&creds).unwrap())));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(mcp::serve_sse_on(server, listener));
    base
}

/// Incremental reader for `text/event-stream` bodies
struct EventReader {
    response: reqwest::Response,
    buffer: String,
}

impl EventReader {
    /// Next (event, data) pair, skipping keep-alive comments
    async fn next_event(&mut self) -> (String, String) {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let block: String = self.buffer.drain(..end + 2).collect();
                let mut event = String::from("message");
                let mut data = Vec::new();
                for line in block.lines() {
                    if let Some(value) = line.strip_prefix("event:") {
                        event = value.trim().to_string();
                    } else if let Some(value) = line.strip_prefix("data:") {
                        data.push(value.trim_start().to_string());
                    }
                }
                if data.is_empty() {
                    continue;
                }
                return (event, data.join("\n"));
            }

            let chunk = tokio::time::timeout(Duration::from_secs(5), self.response.chunk())
                .await
                .expect("timed out waiting for an event")
                .unwrap()
                .expect("event stream ended");
            self.buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    }
}

async fn open_session(base: &str) -> (EventReader, String) {
    let response = reqwest::get(format!("{}/sse", base)).await.unwrap();
    assert!(response.status().is_success());
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );

    let mut reader = EventReader {
        response,
        buffer: String::new(),
    };
    let (event, endpoint) = reader.next_event().await;
    assert_eq!(event, "endpoint");
    assert!(endpoint.starts_with("/messages/?session_id="), "unexpected endpoint {}", endpoint);
    (reader, format!("{}{}", base, endpoint))
}

#[tokio::test]
async fn test_sse_session_answers_on_stream() {
    let upstream = MockServer::start();
    let base = start(&upstream).await;
    let (mut events, endpoint) = open_session(&base).await;
    let http = reqwest::Client::new();

    let accepted = http
        .post(&endpoint)
        .header("content-type", "application/json")
        .body(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}).to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status().as_u16(), 202);

    let (event, data) = events.next_event().await;
    assert_eq!(event, "message");
    let response: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn test_sse_tool_call_streams_progress_then_result() {
    let upstream = MockServer::start();
    let _token = upstream.mock(|when, then| {
        when.method(POST).path("/dna/system/api/v1/auth/token");
        then.status(200).json_body(json!({"Token": "session-1"}));
    });
    let _health = upstream.mock(|when, then| {
        when.method(GET).path("/dna/intent/api/v1/site-health");
        then.status(200)
            .json_body(json!({"response": [{"siteName": "HQ"}, {"siteName": "Branch"}]}));
    });
    let base = start(&upstream).await;
    let (mut events, endpoint) = open_session(&base).await;

    let accepted = reqwest::Client::new()
        .post(&endpoint)
        .body(
            json!({
                "jsonrpc": "2.0",
                "id": "sites",
                "method": "tools/call",
                "params": {"name": "get_site_health", "arguments": {}}
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status().as_u16(), 202);

    let mut progress = Vec::new();
    let result = loop {
        let (_, data) = events.next_event().await;
        let message: Value = serde_json::from_str(&data).unwrap();
        if message["id"] == "sites" {
            break message;
        }
        assert_eq!(message["method"], "notifications/message");
        progress.push(message["params"]["data"].as_str().unwrap().to_string());
    };

    assert_eq!(result["result"]["isError"], false);
    assert_eq!(progress, vec!["Fetching site health data", "Retrieved health data for 2 sites"]);
}

#[tokio::test]
async fn test_sse_unknown_session_is_not_found() {
    let upstream = MockServer::start();
    let base = start(&upstream).await;
    let http = reqwest::Client::new();
    let ping = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}).to_string();

    let missing = http
        .post(format!("{}/messages/?session_id={}", base, "0".repeat(32)))
        .body(ping.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    let garbled = http
        .post(format!("{}/messages/?session_id=nope", base))
        .body(ping)
        .send()
        .await
        .unwrap();
    assert_eq!(garbled.status().as_u16(), 400);
}
