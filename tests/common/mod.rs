//! In-process stub of the remote shortening service.
//!
//! Implements the documented HTTP contract: `POST /api/v1/shorten`,
//! `GET /api/v1/url/{code}`, the public redirect endpoint `GET /{code}`,
//! and `GET /health`. Tests drive the stub through `StubState` and assert
//! on what the controller sent.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

#[derive(Default)]
pub struct StubState {
    /// Raw `url` values received by the shorten endpoint, in order
    pub shorten_urls: Mutex<Vec<String>>,
    pub shorten_calls: AtomicUsize,
    /// Hits on the redirect target; stays zero unless something followed a 3xx
    pub followed: AtomicUsize,
    pub healthy: AtomicBool,
}

pub struct Stub {
    pub addr: SocketAddr,
    pub state: Arc<StubState>,
}

impl Stub {
    pub fn api_base(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn public_base(&self) -> String {
        format!("http://{}", self.addr)
    }
}

pub async fn start_stub() -> Stub {
    let state = Arc::new(StubState {
        healthy: AtomicBool::new(true),
        ..StubState::default()
    });

    let router = Router::new()
        .route("/api/v1/shorten", post(shorten))
        .route("/api/v1/url/{code}", get(lookup))
        .route("/health", get(health))
        .route("/destination", get(destination))
        .route("/{code}", get(redirect))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Stub { addr, state }
}

async fn shorten(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    state.shorten_calls.fetch_add(1, Ordering::SeqCst);

    let url = body
        .get("url")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    state.shorten_urls.lock().unwrap().push(url.clone());

    if url.contains("reject") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    // A deliberately slow request, for out-of-order completion tests.
    let code = if url.contains("slow") {
        tokio::time::sleep(Duration::from_millis(300)).await;
        "slow42"
    } else {
        "ab12Cd"
    };

    (StatusCode::CREATED, Json(json!({ "short_url": code }))).into_response()
}

async fn lookup(Path(code): Path<String>) -> Response {
    match code.as_str() {
        "zzz999" => StatusCode::NOT_FOUND.into_response(),
        "boom" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        // A link that was never followed: the service omits `clicks`.
        "fresh" => Json(json!({
            "short_url": code,
            "original_url": "https://example.com/very/long/path",
            "created_at": "2026-08-01T12:30:00Z"
        }))
        .into_response(),
        _ => Json(json!({
            "short_url": code,
            "original_url": "https://example.com/very/long/path",
            "clicks": 7,
            "created_at": "2026-08-01T12:30:00Z"
        }))
        .into_response(),
    }
}

async fn redirect(Path(code): Path<String>) -> Response {
    if code == "plain" {
        // Misconfigured link: answers directly instead of redirecting.
        return (StatusCode::OK, "no redirect here").into_response();
    }
    (
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, "/destination")],
    )
        .into_response()
}

async fn destination(State(state): State<Arc<StubState>>) -> &'static str {
    state.followed.fetch_add(1, Ordering::SeqCst);
    "followed"
}

async fn health(State(state): State<Arc<StubState>>) -> StatusCode {
    if state.healthy.load(Ordering::SeqCst) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
