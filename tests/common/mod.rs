//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use tokio::sync::Mutex;

/// One registration call as seen by the mock discovery service.
pub struct ReceivedRegistration {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

pub type Received = Arc<Mutex<Vec<ReceivedRegistration>>>;

async fn register(
    State((received, reply_err)): State<(Received, &'static str)>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(String::from)
    };

    received.lock().await.push(ReceivedRegistration {
        authorization: header("authorization"),
        content_type: header("content-type"),
        body,
    });

    Json(serde_json::json!({ "err": reply_err }))
}

/// Start a mock discovery endpoint that records incoming registrations
/// and replies with the given `err` value.
pub async fn start_mock_registry(reply_err: &'static str) -> (SocketAddr, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/api/endpoints", post(register))
        .with_state((received.clone(), reply_err));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, received)
}
