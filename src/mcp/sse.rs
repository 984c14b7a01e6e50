//! HTTP + SSE transport
//!
//! `GET /sse` opens a session: the first event (`endpoint`) carries the URL the
//! client must POST its JSON-RPC messages to. Each POST is acknowledged with
//! 202 and its response arrives on the session's stream as a `message` event.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use super::notify::Outbound;
use super::server::McpServer;

pub const SSE_PATH: &str = "/sse";
pub const MESSAGES_PATH: &str = "/messages/";
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000);

type Sessions = Arc<Mutex<HashMap<Uuid, Outbound>>>;

#[derive(Clone)]
struct SseState {
    server: Arc<McpServer>,
    sessions: Sessions,
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    session_id: String,
}

/// Removes the session once its event stream is dropped
struct SessionGuard {
    id: Uuid,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        lock(&self.sessions).remove(&self.id);
        log::info!("SSE session {} closed", self.id.simple());
    }
}

// A panic while holding the lock cannot leave the map half-updated
fn lock(sessions: &Sessions) -> MutexGuard<'_, HashMap<Uuid, Outbound>> {
    sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Routes for the SSE transport
pub fn router(server: Arc<McpServer>) -> Router {
    let state = SseState {
        server,
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };

    Router::new()
        .route(SSE_PATH, get(open_stream))
        .route(MESSAGES_PATH, post(post_message))
        .with_state(state)
}

/// Bind `addr` and serve MCP over HTTP + SSE until the process is stopped
pub async fn serve_sse(server: Arc<McpServer>, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_sse_on(server, listener).await
}

/// Serve MCP over HTTP + SSE on an already bound listener
pub async fn serve_sse_on(server: Arc<McpServer>, listener: TcpListener) -> anyhow::Result<()> {
    log::info!("Serving MCP over SSE at http://{}{}", listener.local_addr()?, SSE_PATH);
    Ok(axum::serve(listener, router(server)).await?)
}

async fn open_stream(State(state): State<SseState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    lock(&state.sessions).insert(id, tx);
    log::info!("SSE session {} opened", id.simple());

    let guard = SessionGuard {
        id,
        sessions: state.sessions.clone(),
    };
    let endpoint = format!("{}?session_id={}", MESSAGES_PATH, id.simple());

    let first = stream::once(async move { Ok(Event::default().event("endpoint").data(endpoint)) });
    let messages = UnboundedReceiverStream::new(rx).map(move |line| {
        let _ = &guard;
        Ok(Event::default().event("message").data(line))
    });

    Sse::new(first.chain(messages)).keep_alive(KeepAlive::default())
}

async fn post_message(
    State(state): State<SseState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let Ok(id) = Uuid::parse_str(&query.session_id) else {
        return (StatusCode::BAD_REQUEST, "Invalid session ID").into_response();
    };

    let Some(outbound) = lock(&state.sessions).get(&id).cloned() else {
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };

    // The reply travels over the event stream, so a slow tool never holds the POST open
    tokio::spawn(async move {
        if let Some(response) = state.server.handle_message(&body, Some(&outbound)).await {
            let _ = outbound.send(response);
        }
    });

    (StatusCode::ACCEPTED, "Accepted").into_response()
}
