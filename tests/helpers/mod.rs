//! In-process mock of the Sikjipsa backend
//!
//! Binds an axum router to an ephemeral port and records what the client
//! sent so tests can assert on request counts, headers and form fields.

#![allow(dead_code)]

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use sikjipsa_client::app_state::AppState;
use sikjipsa_client::config::ClientConfig;
use sikjipsa_client::services::client::ApiClient;
use sikjipsa_client::services::polling::PollPolicy;

/// One scripted answer to `GET /diagnosis/result/{id}`.
#[derive(Debug, Clone)]
pub enum StatusReply {
    Body(Value),
    ServerError,
    /// Answer after a delay, to keep a request in flight.
    Slow(Duration, Value),
}

/// Multipart field as received by the analyze endpoint.
#[derive(Debug, Clone)]
pub struct ReceivedField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub text: Option<String>,
    pub len: usize,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub status_script: VecDeque<StatusReply>,
    pub analyze_calls: usize,
    pub analyze_fields: Vec<ReceivedField>,
    /// Body returned by the analyze endpoint; defaults to job 42.
    pub analyze_response: Option<Value>,
    pub result_calls: usize,
    pub result_paths: Vec<String>,
    pub auth_headers: Vec<Option<String>>,
    pub posts: Vec<Value>,
    pub post_queries: Vec<HashMap<String, String>>,
    pub liked: HashSet<u64>,
    pub deleted_posts: Vec<u64>,
    pub diary_bodies: Vec<Value>,
    pub entry_forms: Vec<Vec<ReceivedField>>,
    /// `(post_id, fields)` for each multipart post update.
    pub post_updates: Vec<(u64, Vec<ReceivedField>)>,
    /// `(method, post_id, comment_id, body)` for each comment edit or delete.
    pub comment_calls: Vec<(String, u64, u64, Option<Value>)>,
    /// `(diary_id, entry_id, fields)` for each multipart entry update.
    pub entry_updates: Vec<(u64, u64, Vec<ReceivedField>)>,
    pub deleted_entries: Vec<(u64, u64)>,
    pub refresh_bodies: Vec<Value>,
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub url: String,
    pub state: Shared,
    server: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));

        let api = Router::new()
            .route("/diagnosis/analyze", post(analyze))
            .route("/diagnosis/result/{id}", get(diagnosis_result))
            .route("/diagnosis/history", get(diagnosis_history))
            .route("/plants", get(plants))
            .route("/plants/categories", get(plant_categories))
            .route("/community/posts", get(list_posts))
            .route("/community/posts/{id}", delete(delete_post).put(update_post))
            .route(
                "/community/posts/{id}/comments/{comment_id}",
                put(update_comment).delete(delete_comment),
            )
            .route("/community/posts/{id}/like", post(toggle_like))
            .route("/announcements", get(announcements))
            .route("/diary", get(list_diaries).post(create_diary))
            .route("/diary/{id}/entries", post(add_entry))
            .route(
                "/diary/{id}/entries/{entry_id}",
                put(update_entry).delete(delete_entry),
            )
            .route("/auth/refresh", post(refresh))
            .route("/auth/{provider}", post(social_login))
            .route("/auth/me", get(me));

        let app = Router::new()
            .nest("/api/v1", api)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("No local address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock backend crashed");
        });

        Self {
            url: format!("http://{}", addr),
            state,
            server,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.url.clone())
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("Failed to build client")
    }

    /// Clients with a fast polling policy so tests finish quickly.
    pub fn app(&self, max_attempts: u32) -> AppState {
        let mut app = AppState::new(self.client());
        app.poll_policy = fast_policy(max_attempts);
        app
    }

    pub fn script(&self, replies: impl IntoIterator<Item = StatusReply>) {
        self.state.lock().unwrap().status_script.extend(replies);
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub fn fast_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy::new(max_attempts, Duration::from_millis(10))
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": { "code": "UNAUTHORIZED", "message": "Unauthorized access", "details": "" }
        })),
    )
        .into_response()
}

async fn analyze(
    State(state): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let fields = read_fields(multipart).await;

    let mut state = state.lock().unwrap();
    state.analyze_calls += 1;
    state.auth_headers.push(bearer(&headers));
    state.analyze_fields = fields;

    let body = state.analyze_response.clone().unwrap_or_else(|| {
        json!({
            "diagnosis_id": 42,
            "status": "processing",
            "message": "Diagnosis started. Check status with /diagnosis/result/42"
        })
    });
    Json(body).into_response()
}

async fn read_fields(mut multipart: Multipart) -> Vec<ReceivedField> {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap_or_default();
        let text = if file_name.is_none() {
            String::from_utf8(bytes.to_vec()).ok()
        } else {
            None
        };
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            text,
            len: bytes.len(),
        });
    }
    fields
}

async fn diagnosis_result(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let reply = {
        let mut state = state.lock().unwrap();
        state.result_calls += 1;
        state.result_paths.push(id);
        state.auth_headers.push(bearer(&headers));
        state
            .status_script
            .pop_front()
            .unwrap_or_else(|| StatusReply::Body(json!({ "id": 42, "status": "processing" })))
    };

    match reply {
        StatusReply::Body(body) => Json(body).into_response(),
        StatusReply::ServerError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch diagnosis" })),
        )
            .into_response(),
        StatusReply::Slow(delay, body) => {
            tokio::time::sleep(delay).await;
            Json(body).into_response()
        }
    }
}

async fn diagnosis_history(headers: HeaderMap) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    Json(json!([
        { "id": 41, "status": "completed", "plant_name": "Pothos", "confidence": 90.0, "is_healthy": true },
        { "id": 40, "status": "failed" }
    ]))
    .into_response()
}

async fn plants() -> Json<Value> {
    Json(json!({
        "plants": [
            { "id": 1, "category_id": 1, "name": "몬스테라", "scientific_name": "Monstera deliciosa", "images": "[\"https://cdn.example/m.jpg\"]" },
            { "id": 2, "category_id": 2, "name": "금전수", "scientific_name": "Zamioculcas zamiifolia", "images": [] },
            { "id": 3, "category_id": 1, "name": "스킨답서스", "scientific_name": "Epipremnum aureum" }
        ]
    }))
}

async fn plant_categories() -> Json<Value> {
    Json(json!([
        { "id": 1, "name": "관엽식물" },
        { "id": 2, "name": "다육식물" }
    ]))
}

async fn list_posts(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.post_queries.push(params.clone());

    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);

    let matching: Vec<Value> = state
        .posts
        .iter()
        .filter(|post| match params.get("type") {
            Some(t) => post["post_type"] == *t,
            None => true,
        })
        .filter(|post| match params.get("search") {
            Some(s) => post["title"].as_str().is_some_and(|title| title.contains(s.as_str())),
            None => true,
        })
        .cloned()
        .collect();

    let total = matching.len();
    let total_pages = total.div_ceil(limit).max(1);
    let posts: Vec<Value> = matching
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    Json(json!({
        "posts": posts,
        "currentPage": page,
        "totalPages": total_pages,
        "totalCount": total,
        "hasMore": page < total_pages
    }))
}

async fn delete_post(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    state.lock().unwrap().deleted_posts.push(id);
    Json(json!({ "message": "Post deleted successfully" })).into_response()
}

async fn toggle_like(State(state): State<Shared>, Path(id): Path<u64>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    let liked = if state.liked.remove(&id) {
        false
    } else {
        state.liked.insert(id);
        true
    };
    Json(json!({
        "liked": liked,
        "message": if liked { "Post liked" } else { "Post unliked" }
    }))
}

async fn announcements() -> Json<Value> {
    Json(json!({
        "announcements": [
            { "id": 1, "title": "Old", "content": "", "is_pinned": false, "created_at": "2026-01-01T00:00:00Z" },
            { "id": 2, "title": "Pinned", "content": "", "is_pinned": true, "created_at": "2025-12-01T00:00:00Z" },
            { "id": 3, "title": "New", "content": "", "is_pinned": false, "created_at": "2026-02-01T00:00:00Z" }
        ]
    }))
}

async fn social_login(Path(provider): Path<String>, Json(body): Json<Value>) -> Response {
    if body["code"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid request body" })),
        )
            .into_response();
    }
    Json(json!({
        "user": { "id": 7, "email": "fern@example.com", "username": "fern_lover", "role": "user", "social_provider": provider },
        "access_token": "access-1",
        "refresh_token": "refresh-1",
        "token_type": "Bearer",
        "expires_in": 3600,
        "message": "Naver 로그인 성공"
    }))
    .into_response()
}

async fn me(headers: HeaderMap) -> Response {
    match bearer(&headers).as_deref() {
        Some("Bearer access-1") => {
            Json(json!({ "id": 7, "username": "fern_lover", "role": "user" })).into_response()
        }
        _ => unauthorized(),
    }
}

async fn list_diaries() -> Json<Value> {
    Json(json!([
        {
            "id": 3,
            "user_id": 7,
            "plant_id": 1,
            "plant": { "id": 1, "name": "몬스테라" },
            "plant_nickname": "",
            "start_date": "2026-02-01T00:00:00Z",
            "entries": [
                { "id": 11, "diary_id": 3, "entry_date": "2026-02-10T00:00:00Z", "content": "New leaf", "images": "[\"https://cdn.example/e.jpg\"]", "growth_stage": "growing" }
            ]
        }
    ]))
}

async fn create_diary(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let created = json!({
        "id": 4,
        "user_id": 7,
        "plant_id": body["plant_id"],
        "plant_nickname": body["plant_nickname"],
        "start_date": body["start_date"]
    });
    state.lock().unwrap().diary_bodies.push(body);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn add_entry(
    State(state): State<Shared>,
    Path(diary_id): Path<u64>,
    multipart: Multipart,
) -> Response {
    let fields = read_fields(multipart).await;
    let text = |name: &str| {
        fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.text.clone())
            .unwrap_or_default()
    };
    let created = json!({
        "id": 12,
        "diary_id": diary_id,
        "entry_date": format!("{}T00:00:00Z", text("entry_date")),
        "title": text("title"),
        "content": text("content"),
        "growth_stage": text("growth_stage"),
        "images": []
    });
    state.lock().unwrap().entry_forms.push(fields);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_post(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Json<Value> {
    let fields = read_fields(multipart).await;
    let text = |name: &str| {
        fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.text.clone())
            .unwrap_or_default()
    };
    let updated = json!({
        "id": id,
        "user_id": 7,
        "title": text("title"),
        "content": text("content"),
        "post_type": text("post_type"),
        "images": text("existing_images")
    });
    state.lock().unwrap().post_updates.push((id, fields));
    Json(updated)
}

async fn update_comment(
    State(state): State<Shared>,
    Path((post_id, comment_id)): Path<(u64, u64)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let updated = json!({
        "id": comment_id,
        "post_id": post_id,
        "user_id": 7,
        "content": body["content"]
    });
    state
        .lock()
        .unwrap()
        .comment_calls
        .push(("PUT".to_string(), post_id, comment_id, Some(body)));
    Json(updated)
}

async fn delete_comment(
    State(state): State<Shared>,
    Path((post_id, comment_id)): Path<(u64, u64)>,
) -> Json<Value> {
    state
        .lock()
        .unwrap()
        .comment_calls
        .push(("DELETE".to_string(), post_id, comment_id, None));
    Json(json!({ "message": "Comment deleted successfully" }))
}

async fn update_entry(
    State(state): State<Shared>,
    Path((diary_id, entry_id)): Path<(u64, u64)>,
    multipart: Multipart,
) -> Json<Value> {
    let fields = read_fields(multipart).await;
    let text = |name: &str| {
        fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.text.clone())
            .unwrap_or_default()
    };
    let updated = json!({
        "id": entry_id,
        "diary_id": diary_id,
        "entry_date": format!("{}T00:00:00Z", text("entry_date")),
        "title": text("title"),
        "content": text("content"),
        "growth_stage": text("growth_stage"),
        "images": text("existing_images")
    });
    state
        .lock()
        .unwrap()
        .entry_updates
        .push((diary_id, entry_id, fields));
    Json(updated)
}

async fn delete_entry(
    State(state): State<Shared>,
    Path((diary_id, entry_id)): Path<(u64, u64)>,
) -> Json<Value> {
    state.lock().unwrap().deleted_entries.push((diary_id, entry_id));
    Json(json!({ "message": "Entry deleted successfully" }))
}

async fn refresh(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["refresh_token"] != "refresh-1" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid refresh token" })),
        )
            .into_response();
    }
    state.lock().unwrap().refresh_bodies.push(body);
    Json(json!({
        "access_token": "access-2",
        "refresh_token": "refresh-2",
        "token_type": "Bearer",
        "expires_in": 3600
    }))
    .into_response()
}
