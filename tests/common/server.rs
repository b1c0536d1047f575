//! Mock Share Trips backend
//!
//! Each test gets an isolated in-process axum server seeded with the fixture
//! profiles. Tests can inspect what the client sent and override responses.

use super::constants::*;
use super::fixtures::{other_profile, owner_profile};
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use share_trips_client::profile::{Choice, Language, SocialLinks, TravelStatus, UserProfile};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// What the mock backend saw and how it should answer
#[derive(Default)]
pub struct BackendState {
    pub profiles: HashMap<String, UserProfile>,
    /// `is_active` reported by `GET /api/user/data`
    pub is_active: bool,
    /// Refresh endpoint answers `{"access": null}` instead of a token
    pub refresh_without_access: bool,
    /// Replaces the profile update logic when set
    pub update_override: Option<(StatusCode, String)>,
    /// Artificial latency of profile fetches, per user id
    pub profile_delays: HashMap<String, Duration>,

    pub update_fields: Vec<(String, String)>,
    pub update_count: usize,
    pub refresh_requests: Vec<Value>,
    pub authorization_headers: Vec<Option<String>>,
}

pub type SharedState = Arc<Mutex<BackendState>>;

/// Test server instance
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Backend state for assertions and response overrides
    pub state: SharedState,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new mock backend on a random port and waits until it answers.
    pub async fn spawn() -> Self {
        let mut state = BackendState {
            is_active: true,
            ..Default::default()
        };
        for profile in [owner_profile(), other_profile()] {
            state.profiles.insert(profile.id.clone(), profile);
        }
        let state: SharedState = Arc::new(Mutex::new(state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let app = make_app(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            state,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut BackendState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.with_state(|s| s.profiles.get(user_id).cloned())
    }

    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn make_app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/api/user/data", get(current_user))
        .route("/api/user/data/get/{id}/", get(get_profile))
        .route("/api/user/data/update/", put(update_profile))
        .route("/api/auth/token/refresh/", post(refresh_token))
        .with_state(state)
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn is_owner(headers: &HeaderMap) -> bool {
    match bearer(headers) {
        Some(header) => {
            header == format!("Bearer {}", TEST_ACCESS_TOKEN)
                || header == format!("Bearer {}", REFRESHED_ACCESS_TOKEN)
        }
        None => false,
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Authentication credentials were not provided."})),
    )
        .into_response()
}

async fn current_user(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let is_active = {
        let mut state = state.lock().unwrap();
        state.authorization_headers.push(bearer(&headers));
        state.is_active
    };
    if !is_owner(&headers) {
        return unauthorized();
    }
    Json(json!({"id": OWNER_ID, "email": "dmitry@example.com", "is_active": is_active}))
        .into_response()
}

async fn get_profile(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let delay = {
        let mut state = state.lock().unwrap();
        state.authorization_headers.push(bearer(&headers));
        state.profile_delays.get(&id).copied()
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let profile = state.lock().unwrap().profiles.get(&id).cloned();
    match profile {
        Some(profile) => Json(profile).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn update_profile(
    State(state): State<SharedState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap();
        fields.push((name, value));
    }

    let mut state = state.lock().unwrap();
    state.authorization_headers.push(bearer(&headers));
    state.update_fields = fields.clone();
    state.update_count += 1;

    if let Some((status, body)) = state.update_override.clone() {
        return (status, body).into_response();
    }
    if !is_owner(&headers) {
        return unauthorized();
    }

    let form: HashMap<String, String> = fields.into_iter().collect();
    if form.get("username").map(|u| u.trim().is_empty()).unwrap_or(true) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["This field may not be blank."]})),
        )
            .into_response();
    }

    let Some(profile) = state.profiles.get_mut(OWNER_ID) else {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    };
    let text = |key: &str| form.get(key).cloned().unwrap_or_default();
    profile.name = text("name");
    profile.about = text("about");
    profile.coliver_preferences = text("coliver_preferences");
    profile.username = text("username").trim().to_string();
    profile.language = Language::from_label(&text("language"));
    profile.travel_status = TravelStatus::from_label(&text("travel_status"));
    profile.social_media_links =
        serde_json::from_str::<SocialLinks>(&text("social_media_links")).unwrap_or_default();

    Json(profile.clone()).into_response()
}

async fn refresh_token(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.refresh_requests.push(body.clone());

    if body["refresh"] != TEST_REFRESH_TOKEN {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired", "code": "token_not_valid"})),
        )
            .into_response();
    }
    if state.refresh_without_access {
        return Json(json!({"access": null})).into_response();
    }
    Json(json!({"access": REFRESHED_ACCESS_TOKEN})).into_response()
}
