//! In-process stand-in for the article backend.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use blog_admin::{ArticleClient, Config};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Map, Value};

pub const TIMESTAMP: &str = "2024-03-01T12:00:00.000000";

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

/// Base url of a port nothing is listening on.
pub fn dead_backend_url() -> String {
    let (_, addr) = get_random_free_port();
    format!("http://{}", addr)
}

#[derive(Default)]
struct Store {
    next_id: i64,
    articles: Vec<Map<String, Value>>,
    canned: VecDeque<(u16, String)>,
}

#[derive(Clone, Default)]
struct MockState {
    store: Arc<Mutex<Store>>,
    hits: Arc<AtomicUsize>,
}

pub struct MockBackend {
    pub addr: SocketAddr,
    state: MockState,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/article", post(create_article))
            .route(
                "/article/:id",
                get(get_article).patch(patch_article).delete(delete_article),
            )
            .route("/article/:limit/:offset", get(list_articles))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service());
        tokio::spawn(async move {
            let _ = server.await;
        });
        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ArticleClient {
        ArticleClient::new(&Config::new(&self.url()).unwrap())
    }

    /// Number of requests that reached the backend.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// The next request gets this status and raw body instead of normal handling.
    pub fn respond_next(&self, status: u16, body: &str) {
        self.state
            .store
            .lock()
            .canned
            .push_back((status, body.to_string()));
    }

    /// Inserts an article directly, bypassing validation.
    pub fn seed(&self, title: &str, status: &str) -> i64 {
        let mut store = self.state.store.lock();
        insert(
            &mut store,
            json!({
                "title": title,
                "content": "c".repeat(200),
                "category": "general",
                "status": status,
            }),
        )
    }
}

// ----------------- Handlers -----------------

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    published_only: bool,
}

fn enter(state: &MockState) -> Option<Response> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let (status, body) = state.store.lock().canned.pop_front()?;
    let status = StatusCode::from_u16(status).unwrap();
    Some((status, [("content-type", "application/json")], body).into_response())
}

async fn list_articles(
    State(state): State<MockState>,
    Path((limit, offset)): Path<(i64, i64)>,
    Query(ListQuery { published_only }): Query<ListQuery>,
) -> Response {
    if let Some(canned) = enter(&state) {
        return canned;
    }
    if limit <= 0 || offset < 0 {
        return unprocessable(vec![("path", "limit", "Input should be greater than 0")]);
    }
    let store = state.store.lock();
    let visible = store
        .articles
        .iter()
        .rev()
        .filter(|article| article["status"] != "trash")
        .filter(|article| !published_only || article["status"] == "publish")
        .collect::<Vec<_>>();
    let items = visible
        .iter()
        .skip(offset as usize)
        .take(limit as usize)
        .map(|article| Value::Object((*article).clone()))
        .collect::<Vec<_>>();
    Json(json!({
        "items": items,
        "offset": offset,
        "limit": limit,
        "total_count": visible.len(),
    }))
    .into_response()
}

async fn get_article(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    if let Some(canned) = enter(&state) {
        return canned;
    }
    let store = state.store.lock();
    match find(&store, id) {
        Some(index) => Json(Value::Object(store.articles[index].clone())).into_response(),
        None => not_found(),
    }
}

async fn create_article(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    if let Some(canned) = enter(&state) {
        return canned;
    }
    let errors = check_fields(&body, false);
    if !errors.is_empty() {
        return unprocessable(errors);
    }
    insert(&mut state.store.lock(), body);
    Json(json!({})).into_response()
}

async fn patch_article(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(canned) = enter(&state) {
        return canned;
    }
    let errors = check_fields(&body, true);
    if !errors.is_empty() {
        return unprocessable(errors);
    }
    let mut store = state.store.lock();
    let Some(index) = find(&store, id) else {
        return not_found();
    };
    if let Value::Object(fields) = body {
        for (key, value) in fields {
            store.articles[index].insert(key, value);
        }
    }
    Json(json!({})).into_response()
}

async fn delete_article(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    if let Some(canned) = enter(&state) {
        return canned;
    }
    let mut store = state.store.lock();
    let Some(index) = find(&store, id) else {
        return not_found();
    };
    store.articles[index].insert("status".to_string(), json!("trash"));
    StatusCode::NO_CONTENT.into_response()
}

// ----------------- Helper Functions -----------------

fn insert(store: &mut Store, body: Value) -> i64 {
    store.next_id += 1;
    let id = store.next_id;
    let mut article = match body {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    article.insert("id".to_string(), json!(id));
    article.insert("created_date".to_string(), json!(TIMESTAMP));
    article.insert("updated_date".to_string(), json!(TIMESTAMP));
    store.articles.push(article);
    id
}

fn find(store: &Store, id: i64) -> Option<usize> {
    store
        .articles
        .iter()
        .position(|article| article["id"] == id && article["status"] != "trash")
}

fn check_fields(body: &Value, partial: bool) -> Vec<(&'static str, &'static str, &'static str)> {
    let rules: [(&str, usize, usize, &str); 3] = [
        ("title", 20, 200, "String should have between 20 and 200 characters"),
        ("content", 200, usize::MAX, "String should have at least 200 characters"),
        ("category", 3, usize::MAX, "String should have at least 3 characters"),
    ];
    let mut errors = Vec::new();
    for (field, min, max, message) in rules {
        match body.get(field) {
            Some(Value::String(value)) => {
                let len = value.chars().count();
                if len < min || len > max {
                    errors.push(("body", field, message));
                }
            }
            None if partial => (),
            _ => errors.push(("body", field, "Field required")),
        }
    }
    match body.get("status").and_then(Value::as_str) {
        Some("publish" | "draft" | "trash") => (),
        None if partial && body.get("status").is_none() => (),
        _ => errors.push(("body", "status", "Input should be 'publish', 'draft' or 'trash'")),
    }
    errors
}

fn unprocessable(errors: Vec<(&str, &str, &str)>) -> Response {
    let detail = errors
        .into_iter()
        .map(|(scope, field, msg)| json!({"loc": [scope, field], "msg": msg}))
        .collect::<Vec<_>>();
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": detail })),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Article not found"})),
    )
        .into_response()
}
