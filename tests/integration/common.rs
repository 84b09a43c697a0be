//! Scripted search endpoint shared by the integration tests.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use sparql_batch::endpoint::Endpoint;

/// One canned reply from the test endpoint.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json; charset=UTF-8",
            body: body.into(),
        }
    }

    pub fn items(n: u64) -> Self {
        Self::json(format!(r#"{{"schema:numberOfItems":{n},"@graph":[]}}"#))
    }

    pub fn new(status: StatusCode, content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }
}

#[derive(Default)]
struct ServerState {
    replies: Mutex<VecDeque<Reply>>,
    received: Mutex<Vec<String>>,
}

/// A running test endpoint.
pub struct TestServer {
    pub addr: SocketAddr,
    state: Arc<ServerState>,
}

impl TestServer {
    /// Starts a server that answers with `replies` in order.
    pub async fn start(replies: impl IntoIterator<Item = Reply>) -> Self {
        let state = Arc::new(ServerState {
            replies: Mutex::new(replies.into_iter().collect()),
            received: Mutex::default(),
        });

        let app = Router::new()
            .route("/v2/searchextended/:query", get(search))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Endpoint pointing at this server.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(
            self.addr.ip().to_string(),
            self.addr.port(),
            "v2/searchextended",
        )
        .unwrap()
    }

    /// Decoded query payloads received so far, in arrival order.
    pub fn received(&self) -> Vec<String> {
        self.state.received.lock().unwrap().clone()
    }
}

async fn search(
    State(state): State<Arc<ServerState>>,
    Path(query): Path<String>,
) -> impl IntoResponse {
    state.received.lock().unwrap().push(query);
    let reply = state
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| {
            Reply::new(StatusCode::SERVICE_UNAVAILABLE, "text/plain", "exhausted")
        });
    (
        reply.status,
        [(header::CONTENT_TYPE, reply.content_type)],
        reply.body,
    )
}
