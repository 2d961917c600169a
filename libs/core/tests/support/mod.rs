use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub access_token: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: Value,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockPlatform {
    pub base: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    server: tokio::task::JoinHandle<()>,
}

impl MockPlatform {
    /// Starts a fake remote API answering every request with `status` and
    /// `reply`. Returns `None` when binding localhost is not permitted.
    pub async fn start(status: StatusCode, reply: Value) -> Option<Self> {
        let listener = match TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => listener,
            Err(err) => {
                eprintln!("skipping: cannot bind mock platform: {err}");
                return None;
            }
        };
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            reply,
            requests: requests.clone(),
        };
        let app = Router::new().fallback(record).with_state(state);
        let server = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app.into_make_service()).await {
                eprintln!("mock platform error: {err}");
            }
        });
        Some(Self {
            base: format!("http://{addr}"),
            requests,
            server,
        })
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockPlatform {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record(
    State(state): State<MockState>,
    method: axum::http::Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        access_token: header("access-token"),
        content_type: header("content-type"),
        body: serde_json::from_slice(&body).ok(),
    });
    (state.status, Json(state.reply.clone()))
}
