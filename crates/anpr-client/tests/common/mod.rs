//! In-process stub of the ANPR backend.
//!
//! Serves the endpoints the console uses on an ephemeral port and records
//! every request so tests can assert on what was (or was not) sent.

#![allow(dead_code)]

use anpr_client::{AppContext, LocalStore, MemoryStore};
use anpr_core::AnprConfig;
use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const USERNAME: &str = "supervisor";
pub const PASSWORD: &str = "s3cret";
pub const TOKEN: &str = "tok-123";

type Reply = (StatusCode, Json<Value>);

/// A request seen by the stub.
#[derive(Debug, Clone)]
pub struct Hit {
    pub path: String,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub body: Value,
}

pub struct StubState {
    hits: Mutex<Vec<Hit>>,
    /// When false every authenticated endpoint answers 401.
    pub token_valid: AtomicBool,
}

impl StubState {
    fn record(&self, path: &str, headers: &HeaderMap, body: Value) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.hits.lock().unwrap().push(Hit {
            path: path.to_string(),
            authorization: header(AUTHORIZATION.as_str()),
            request_id: header("x-request-id"),
            body,
        });
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("bearer {TOKEN}");
        self.token_valid.load(Ordering::SeqCst)
            && headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(expected.as_str())
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_for(&self, path: &str) -> Vec<Hit> {
        self.hits().into_iter().filter(|h| h.path == path).collect()
    }
}

pub struct Backend {
    pub url: String,
    pub state: Arc<StubState>,
}

impl Backend {
    pub async fn spawn() -> Self {
        let state = Arc::new(StubState {
            hits: Mutex::new(Vec::new()),
            token_valid: AtomicBool::new(true),
        });

        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/me/access-control", get(access_control))
            .route("/dashboard/vehicle-logs", post(vehicle_logs))
            .route("/dashboard/fix-vehicle-number", post(fix_vehicle_number))
            .route("/configuration/assigned-resources", post(assigned_resources))
            .route("/watchlist/", get(list_watchlist).post(add_watchlist))
            .route("/watchlist/{id}", put(update_watchlist))
            .route("/notifications/my-notifications", post(notifications))
            .route("/reports/vehicle-logs", post(report))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn config(&self) -> AnprConfig {
        let mut config = AnprConfig::default();
        config.api.base_url = self.url.clone();
        config
    }

    /// A context over fresh in-memory storage.
    pub fn context(&self) -> (Arc<MemoryStore>, AppContext) {
        let store = Arc::new(MemoryStore::new());
        let ctx = self.context_with(store.clone());
        (store, ctx)
    }

    pub fn context_with(&self, store: Arc<dyn LocalStore>) -> AppContext {
        AppContext::with_store(self.config(), store).unwrap()
    }

    /// A logged-in context.
    pub async fn logged_in(&self) -> (Arc<MemoryStore>, AppContext) {
        let (store, ctx) = self.context();
        ctx.login(USERNAME, PASSWORD).await.unwrap();
        (store, ctx)
    }
}

/// A base URL nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn unauthorized() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
}

fn ok(value: Value) -> Reply {
    (StatusCode::OK, Json(value))
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<Arc<StubState>>, headers: HeaderMap, Form(form): Form<LoginForm>) -> Reply {
    state.record("/auth/login", &headers, json!({"username": form.username}));
    match (form.username.as_str(), form.password.as_str()) {
        (USERNAME, PASSWORD) => ok(json!({"access_token": TOKEN, "token_type": "bearer"})),
        ("crash", _) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "database unavailable"})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect username or password"})),
        ),
    }
}

async fn access_control(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Reply {
    state.record("/auth/me/access-control", &headers, Value::Null);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    ok(json!({
        "user": {"id": 12, "username": USERNAME, "name": "Shift Supervisor", "role": "supervisor"},
        "access_control": {"tabs": [
            {"tab_id": 2, "tab_name": "Watchlist", "display_order": 3, "components": [
                {"component_id": 200, "component_code": "watchlist_table", "component_name": "Watchlist",
                 "permissions": {"can_view": true, "can_add": false, "can_update": false, "can_export": false}},
                {"component_id": 201, "component_code": "watchlist_form", "component_name": "Watchlist Form",
                 "permissions": {"can_view": true, "can_add": true, "can_update": false, "can_export": false}}
            ]},
            {"tab_id": 1, "tab_name": "Dashboard", "display_order": 1, "components": [
                {"component_id": 100, "component_code": "vehicle_logs", "component_name": "Vehicle Logs",
                 "permissions": {"can_view": true, "can_add": false, "can_update": false, "can_export": false}},
                {"component_id": 101, "component_code": "fix_vehicle_number", "component_name": "Fix Plate",
                 "permissions": {"can_view": true, "can_add": false, "can_update": false, "can_export": false}}
            ]},
            {"tab_id": 3, "tab_name": "Reports", "display_order": 2, "components": []},
            {"tab_id": 4, "tab_name": "Camera Health", "display_order": 4, "components": [
                {"component_id": 400, "component_code": "uptime_chart", "component_name": "Uptime",
                 "permissions": {"can_view": true}}
            ]}
        ]}
    }))
}

fn log_row(id: i64, plate: &str) -> Value {
    json!({
        "id": id,
        "vehicle_number": plate,
        "camera_id": 3,
        "camera_name": "Gate 1",
        "captured_at": "2024-03-02T08:15:00Z",
        "watchlist_status": null
    })
}

async fn vehicle_logs(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    state.record("/dashboard/vehicle-logs", &headers, body.clone());
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let plate = body["vehicle_number"].as_str().unwrap_or("KA01AB1234").to_string();
    if plate == "SLOW" {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    ok(json!({
        "items": [log_row(1, &plate)],
        "total": 1,
        "page": body["page"],
        "page_size": body["page_size"]
    }))
}

async fn fix_vehicle_number(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    state.record("/dashboard/fix-vehicle-number", &headers, body);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    ok(json!({"message": "Vehicle number updated"}))
}

async fn assigned_resources(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    state.record("/configuration/assigned-resources", &headers, body);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    ok(json!({"cameras": [
        {"camera_id": 3, "camera_name": "Gate 1", "location": "North", "status": "online"},
        {"camera_id": 4, "camera_name": "Gate 2", "location": "South", "status": "offline"}
    ]}))
}

async fn list_watchlist(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Reply {
    state.record("/watchlist/", &headers, Value::Null);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    ok(json!([
        {"id": 1, "vehicle_number": "KA01AB1234", "list_type": "blacklisted", "reason": "Stolen"},
        {"id": 2, "vehicle_number": "MH12XY9", "list_type": "whitelisted", "reason": "Staff"}
    ]))
}

async fn add_watchlist(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    state.record("/watchlist/", &headers, body.clone());
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if body["vehicle_number"] == "KA01AB1234" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"detail": "Vehicle already on watchlist"})),
        );
    }
    ok(json!({
        "id": 3,
        "vehicle_number": body["vehicle_number"],
        "list_type": body["list_type"],
        "reason": body["reason"]
    }))
}

async fn update_watchlist(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    state.record(&format!("/watchlist/{id}"), &headers, body.clone());
    if !state.authorized(&headers) {
        return unauthorized();
    }
    ok(json!({"id": id, "vehicle_number": body["vehicle_number"], "list_type": body["list_type"]}))
}

async fn notifications(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    state.record("/notifications/my-notifications", &headers, body);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    ok(json!({
        "notifications": [
            {"id": 9, "title": "Watchlist hit", "message": "KA01AB1234 seen at Gate 1",
             "vehicle_number": "KA01AB1234", "is_read": false}
        ],
        "unread_count": 1,
        "total": 1
    }))
}

/// Three rows served two per page. Plate `BULK` claims 1000 rows, one per page.
async fn report(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    state.record("/reports/vehicle-logs", &headers, body.clone());
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let page = body["page"].as_u64().unwrap_or(1);
    if body["vehicle_number"] == "BULK" {
        let items = vec![log_row(page as i64, "BULK")];
        return ok(json!({"items": items, "total": 1000, "page": page, "page_size": 1}));
    }
    let items = match page {
        1 => vec![log_row(1, "KA01AB1234"), log_row(2, "KA02CD5678")],
        2 => vec![log_row(3, "KA03EF9012")],
        _ => Vec::new(),
    };
    ok(json!({"items": items, "total": 3, "page": page, "page_size": 2}))
}
