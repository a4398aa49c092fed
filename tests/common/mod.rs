//! Shared helpers for integration tests: a mock user directory served by axum.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use rollbook::rollbook_config::DirectoryConfig;
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// What the mock directory answers on both endpoints.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum MockReply {
    /// `{"userId": ...}` on next-id
    NextId(String),
    /// `{"userIds": [...]}` on ids
    Ids(Vec<String>),
    /// Bare status code with an empty body
    Status(u16),
    /// 200 with a raw body
    Raw(String),
    /// Wait before answering with an empty id list
    Delay(Duration),
}

#[allow(dead_code)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedQuery {
    pub school_code: Option<String>,
    pub role: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: &'static str,
    pub query: RecordedQuery,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockDirectory {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl MockDirectory {
    pub fn config(&self) -> DirectoryConfig {
        DirectoryConfig::with_base_url(&self.base_url)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `reply` on a random local port under `/api`.
pub async fn spawn_directory(reply: MockReply) -> MockDirectory {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply,
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/api/users/next-id", get(next_id))
        .route("/api/users/ids", get(user_ids))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockDirectory {
        base_url: format!("http://{}/api", addr),
        requests,
    }
}

/// A base URL nothing listens on.
#[allow(dead_code)]
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

fn record(state: &MockState, path: &'static str, query: RecordedQuery, headers: &HeaderMap) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(RecordedRequest {
        path,
        query,
        authorization,
    });
}

async fn answer(reply: &MockReply, ok: impl FnOnce() -> Response) -> Response {
    match reply {
        MockReply::Status(code) => StatusCode::from_u16(*code).unwrap().into_response(),
        MockReply::Raw(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        MockReply::Delay(delay) => {
            tokio::time::sleep(*delay).await;
            ok()
        }
        MockReply::NextId(_) | MockReply::Ids(_) => ok(),
    }
}

async fn next_id(
    State(state): State<MockState>,
    Query(query): Query<RecordedQuery>,
    headers: HeaderMap,
) -> Response {
    record(&state, "/users/next-id", query, &headers);
    let body = match &state.reply {
        MockReply::NextId(id) => json!({ "userId": id }),
        _ => json!({}),
    };
    answer(&state.reply, || axum::Json(body).into_response()).await
}

async fn user_ids(
    State(state): State<MockState>,
    Query(query): Query<RecordedQuery>,
    headers: HeaderMap,
) -> Response {
    record(&state, "/users/ids", query, &headers);
    let ids = match &state.reply {
        MockReply::Ids(ids) => ids.clone(),
        _ => Vec::new(),
    };
    answer(&state.reply, || {
        axum::Json(json!({ "userIds": ids })).into_response()
    })
    .await
}
