#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::{Request, StatusCode, Uri};
use axum::response::Response;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use tbm_core::Config;
use tbm_relay::{AppState, build_router};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const VERIFY_TOKEN: &str = "verify-me";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: Value,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// Local stand-in for the remote TikTok APIs.
pub struct MockPlatform {
    pub base: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    server: tokio::task::JoinHandle<()>,
}

impl MockPlatform {
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
        let app = Router::new().fallback(record).with_state(MockState {
            status,
            reply,
            requests: requests.clone(),
        });
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

    pub fn router(&self) -> Router {
        relay_router(&self.base)
    }
}

impl Drop for MockPlatform {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record(
    State(state): State<MockState>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        query,
        body: serde_json::from_slice(&body).ok(),
    });
    (state.status, Json(state.reply.clone()))
}

/// Relay router whose remote APIs point at `base`.
pub fn relay_router(base: &str) -> Router {
    let config = Config {
        access_token: "token-123".into(),
        verify_token: VERIFY_TOKEN.into(),
        messaging_api_base: format!("{base}/business_messages"),
        marketing_api_base: format!("{base}/v1.3"),
        ..Config::default()
    };
    build_router(AppState::new(Arc::new(config)))
}

/// Relay router pointed at an address nothing listens on; used where no
/// outbound call is expected.
pub fn offline_router() -> Router {
    relay_router("http://127.0.0.1:9")
}

pub async fn call(app: Router, req: Request<Body>) -> Response {
    app.oneshot(req).await.unwrap()
}

pub async fn body_string(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
