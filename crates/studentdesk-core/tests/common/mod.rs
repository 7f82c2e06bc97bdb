//! Mock student store server for end-to-end tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A captured request for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Inner {
    records: Vec<Value>,
    next_id: i64,
    requests: Vec<CapturedRequest>,
    failures: VecDeque<u16>,
}

#[derive(Clone, Default)]
struct MockState {
    inner: Arc<Mutex<Inner>>,
}

impl MockState {
    /// Record the request and pop an injected failure, if any.
    async fn capture(
        &self,
        method: &str,
        path: String,
        headers: &HeaderMap,
        body: &Bytes,
    ) -> Option<StatusCode> {
        let mut inner = self.inner.lock().await;
        inner.requests.push(CapturedRequest {
            method: method.to_string(),
            path,
            content_type: headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
            body: serde_json::from_slice(body).ok(),
        });
        inner
            .failures
            .pop_front()
            .and_then(|code| StatusCode::from_u16(code).ok())
    }
}

/// In-process student store speaking the collection protocol.
pub struct MockStudentServer {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockStudentServer {
    pub async fn start() -> Self {
        let state = MockState::default();
        state.inner.lock().await.next_id = 1;

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/students", get(list_students).post(create_student))
            .route("/students/{id}", put(update_student).delete(delete_student))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    /// Collection URL to hand to the client.
    pub fn base_url(&self) -> String {
        format!("http://{}/students", self.addr)
    }

    /// Seed records exactly as given, including their ids and order.
    pub async fn seed(&self, records: Vec<Value>) {
        let mut inner = self.state.inner.lock().await;
        let max_id = records
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0);
        inner.next_id = inner.next_id.max(max_id + 1);
        inner.records.extend(records);
    }

    /// Make the next request answer with `status` and change nothing.
    pub async fn fail_next(&self, status: u16) {
        self.state.inner.lock().await.failures.push_back(status);
    }

    pub async fn records(&self) -> Vec<Value> {
        self.state.inner.lock().await.records.clone()
    }

    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.state.inner.lock().await.requests.clone()
    }

    pub async fn count(&self, method: &str) -> usize {
        self.state
            .inner
            .lock()
            .await
            .requests
            .iter()
            .filter(|r| r.method == method)
            .count()
    }
}

impl Drop for MockStudentServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn position_of(records: &[Value], id: i64) -> Option<usize> {
    records
        .iter()
        .position(|r| r.get("id").and_then(Value::as_i64) == Some(id))
}

async fn list_students(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Some(status) = state
        .capture("GET", "/students".into(), &headers, &Bytes::new())
        .await
    {
        return (status, Json(json!({ "error": "injected" }))).into_response();
    }
    Json(Value::Array(state.inner.lock().await.records.clone())).into_response()
}

async fn create_student(State(state): State<MockState>, headers: HeaderMap, body: Bytes) -> Response {
    if let Some(status) = state
        .capture("POST", "/students".into(), &headers, &body)
        .await
    {
        return (status, Json(json!({ "error": "injected" }))).into_response();
    }
    let Ok(mut record) = serde_json::from_slice::<Value>(&body) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut inner = state.inner.lock().await;
    let id = inner.next_id;
    inner.next_id += 1;
    record["id"] = json!(id);
    inner.records.push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_student(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(status) = state
        .capture("PUT", format!("/students/{}", id), &headers, &body)
        .await
    {
        return (status, Json(json!({ "error": "injected" }))).into_response();
    }
    let Ok(mut record) = serde_json::from_slice::<Value>(&body) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut inner = state.inner.lock().await;
    match position_of(&inner.records, id) {
        Some(index) => {
            record["id"] = json!(id);
            inner.records[index] = record.clone();
            Json(record).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_student(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Some(status) = state
        .capture("DELETE", format!("/students/{}", id), &headers, &Bytes::new())
        .await
    {
        return (status, Json(json!({ "error": "injected" }))).into_response();
    }

    let mut inner = state.inner.lock().await;
    match position_of(&inner.records, id) {
        Some(index) => {
            inner.records.remove(index);
            StatusCode::OK.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
