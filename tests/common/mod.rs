#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use gratitude_board::board::presenter::Presenter;
use gratitude_board::config::BackendConfig;
use gratitude_board::dto::{RenderedBoard, Status};

pub const KEY: &str = "anon-key";
pub const COLLECTION_PATH: &str = "/rest/v1/gratitude_notes";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// A stand-in for the hosted notes table.
#[derive(Debug, Default)]
pub struct MockRemote {
    pub rows: Mutex<Vec<Value>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub stall_writes: AtomicBool,
    pub reply_as_list: AtomicBool,
    pub read_body: Mutex<Option<Value>>,
    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl MockRemote {
    pub fn with_rows(rows: Vec<Value>) -> Arc<Self> {
        let remote = Self::default();
        *remote.rows.lock().unwrap() = rows;
        Arc::new(remote)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn list_rows(
    State(remote): State<Arc<MockRemote>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    remote.requests.lock().unwrap().push(RecordedRequest {
        method: "GET",
        query,
        headers,
        body: None,
    });

    if remote.fail_reads.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "down").into_response();
    }

    if let Some(body) = remote.read_body.lock().unwrap().clone() {
        return Json(body).into_response();
    }

    Json(Value::Array(remote.rows.lock().unwrap().clone())).into_response()
}

async fn insert_row(
    State(remote): State<Arc<MockRemote>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    remote.requests.lock().unwrap().push(RecordedRequest {
        method: "POST",
        query: HashMap::new(),
        headers,
        body: Some(body.clone()),
    });

    if remote.stall_writes.load(Ordering::SeqCst) {
        std::future::pending::<()>().await;
    }

    if remote.fail_writes.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "write failed").into_response();
    }

    let mut row = body;
    row["id"] = json!(remote.rows.lock().unwrap().len() + 1);
    remote.rows.lock().unwrap().insert(0, row.clone());

    let reply = if remote.reply_as_list.load(Ordering::SeqCst) {
        json!([row])
    } else {
        row
    };
    (StatusCode::CREATED, Json(reply)).into_response()
}

/// Serves `remote` on an ephemeral port and returns its base url.
pub async fn serve(remote: Arc<MockRemote>) -> String {
    let app = Router::new()
        .route(COLLECTION_PATH, get(list_rows).post(insert_row))
        .with_state(remote);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// Base url of a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn backend_config(url: &str) -> BackendConfig {
    BackendConfig {
        url: url.to_string(),
        key: KEY.to_string(),
        ..BackendConfig::default()
    }
}

pub fn row(name: &str, message: &str, created: &str) -> Value {
    json!({ "id": 99, "name": name, "message": message, "created": created })
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub boards: Mutex<Vec<RenderedBoard>>,
    pub statuses: Mutex<Vec<Status>>,
    pub countdowns: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn statuses(&self) -> Vec<Status> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn last_board(&self) -> Option<RenderedBoard> {
        self.boards.lock().unwrap().last().cloned()
    }
}

impl Presenter for Recorder {
    fn render(&self, board: &RenderedBoard) {
        self.boards.lock().unwrap().push(board.clone());
    }

    fn announce(&self, status: &Status) {
        self.statuses.lock().unwrap().push(status.clone());
    }

    fn show_countdown(&self, text: &str) {
        self.countdowns.lock().unwrap().push(text.to_string());
    }
}
