//! Integration tests for the HTTP API over in-memory storage.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use slots_server::api::{
    AppState, create_router, request_id::REQUEST_ID_HEADER, with_static_files,
};
use async_trait::async_trait;
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method
use vegas_slots::{
    GameSettings, GameStore, PlayerKey, Symbol,
    auth::AuthManager,
    db::{MemoryRepository, SpinRepository},
    history::{HistoryError, HistoryResult, LeaderboardEntry, NewSpin, SpinRecord},
};

const PASSWORD: &str = "lucky-sevens";

fn create_test_server_with(settings: GameSettings) -> Router {
    let repo = Arc::new(MemoryRepository::new());
    create_test_server_over(repo.clone(), repo, settings)
}

fn create_test_server_over(
    users: Arc<MemoryRepository>,
    spins: Arc<dyn SpinRepository>,
    settings: GameSettings,
) -> Router {
    let state = AppState {
        auth_manager: Arc::new(AuthManager::new(
            users,
            "test_pepper_for_testing_only".to_string(),
        )),
        games: Arc::new(GameStore::new(settings)),
        spins,
        database: None,
        default_bet: 5,
    };
    create_router(state)
}

/// Spin history that records normally but can never be cleared
struct UnclearableHistory(MemoryRepository);

#[async_trait]
impl SpinRepository for UnclearableHistory {
    async fn record_spin(&self, spin: &NewSpin) -> HistoryResult<i64> {
        self.0.record_spin(spin).await
    }

    async fn spins_for(&self, player: PlayerKey) -> HistoryResult<Vec<SpinRecord>> {
        self.0.spins_for(player).await
    }

    async fn recent_spins(&self, player: PlayerKey, limit: usize) -> HistoryResult<Vec<SpinRecord>> {
        self.0.recent_spins(player, limit).await
    }

    async fn clear(&self, _player: PlayerKey) -> HistoryResult<u64> {
        Err(HistoryError::CorruptRecord {
            id: 0,
            reason: "storage unavailable".to_string(),
        })
    }

    async fn leaderboard(&self, limit: usize) -> HistoryResult<Vec<LeaderboardEntry>> {
        self.0.leaderboard(limit).await
    }
}

fn create_test_server() -> Router {
    create_test_server_with(GameSettings::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn register(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        post(
            "/auth/register",
            None,
            json!({"username": username, "password": PASSWORD}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    assert_eq!(body["username"], username);
    body["token"].as_str().unwrap().to_string()
}

async fn spin(app: &Router, token: Option<&str>) -> Value {
    let (status, body) = send(app, post("/spin", token, json!({"bet_amount": 5}))).await;
    assert_eq!(status, StatusCode::OK, "spin failed: {body}");
    body
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_server();

    let (status, body) = send(&app, get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_server();
    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "trace-me-42")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "trace-me-42"
    );
}

#[tokio::test]
async fn test_nonexistent_endpoint_returns_404() {
    let app = create_test_server();
    let (status, _) = send(&app, get("/jackpot", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Guest Game Tests
// ============================================================================

#[tokio::test]
async fn test_guest_spin_updates_state() {
    let app = create_test_server();

    let body = spin(&app, None).await;
    assert_eq!(body["bet_amount"], 5);

    let labels: Vec<&str> = Symbol::ALL.iter().map(|s| s.label()).collect();
    for reel in ["reel1", "reel2", "reel3"] {
        assert!(labels.contains(&body[reel].as_str().unwrap()));
    }

    let winnings = body["winnings"].as_i64().unwrap();
    let new_balance = body["new_balance"].as_i64().unwrap();
    assert_eq!(new_balance, 95 + winnings);
    assert_eq!(body["is_winner"], winnings > 0);

    let (status, state) = send(&app, get("/state", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["balance"], new_balance);
    assert_eq!(state["starting_balance"], 100);
    assert!(state["last_spin"].is_array());
}

#[tokio::test]
async fn test_spin_uses_default_bet() {
    let app = create_test_server();
    let (status, body) = send(&app, post("/spin", None, json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bet_amount"], 5);
}

#[tokio::test]
async fn test_spin_rejects_non_positive_bet() {
    let app = create_test_server();

    let (status, body) = send(&app, post("/spin", None, json!({"bet_amount": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid bet amount: 0");

    let (_, state) = send(&app, get("/state", None)).await;
    assert_eq!(state["balance"], 100);
}

#[tokio::test]
async fn test_spin_insufficient_balance() {
    let app = create_test_server_with(GameSettings {
        starting_balance: 3,
        ..GameSettings::default()
    });

    let (status, body) = send(&app, post("/spin", None, json!({"bet_amount": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient balance");

    let (_, state) = send(&app, get("/state", None)).await;
    assert_eq!(state["balance"], 3);
}

#[tokio::test]
async fn test_spin_after_game_over() {
    let app = create_test_server_with(GameSettings {
        starting_balance: 0,
        ..GameSettings::default()
    });

    let (status, body) = send(&app, post("/spin", None, json!({"bet_amount": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Game Over - Reset Required");
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = create_test_server();
    let request = Request::builder()
        .method("POST")
        .uri("/spin")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reset_restores_balance_and_clears_history() {
    let app = create_test_server();
    spin(&app, None).await;
    spin(&app, None).await;

    let (status, body) = send(&app, post("/reset", None, json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Game fully reset");
    assert_eq!(body["balance"], 100);

    let (_, state) = send(&app, get("/state", None)).await;
    assert_eq!(state["balance"], 100);
    assert!(state["last_spin"].is_null());

    let (_, stats) = send(&app, get("/stats", None)).await;
    assert_eq!(stats["total_spins"], 0);
}

#[tokio::test]
async fn test_failed_reset_leaves_game_untouched() {
    let app = create_test_server_over(
        Arc::new(MemoryRepository::new()),
        Arc::new(UnclearableHistory(MemoryRepository::new())),
        GameSettings::default(),
    );

    let (status, _) = send(&app, post("/spin", None, json!({"bet_amount": 50}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, before) = send(&app, get("/state", None)).await;

    let (status, body) = send(&app, post("/reset", None, json!({}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");

    let (_, after) = send(&app, get("/state", None)).await;
    assert_eq!(after, before);
    assert!(after["last_spin"].is_array());

    let (_, stats) = send(&app, get("/stats", None)).await;
    assert_eq!(stats["total_spins"], 1);
}

// ============================================================================
// Stats and History Tests
// ============================================================================

#[tokio::test]
async fn test_stats_reflect_spins() {
    let app = create_test_server();

    let (_, empty) = send(&app, get("/stats", None)).await;
    assert_eq!(empty["total_spins"], 0);
    assert_eq!(empty["win_rate"], 0.0);

    let mut total_won = 0;
    for _ in 0..3 {
        total_won += spin(&app, None).await["winnings"].as_i64().unwrap();
    }

    let (status, stats) = send(&app, get("/stats", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_spins"], 3);
    assert_eq!(stats["total_amount_won"], total_won);
    assert_eq!(stats["last_5_spins"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_history_is_newest_first_and_limited() {
    let app = create_test_server();
    for _ in 0..3 {
        spin(&app, None).await;
    }

    let (status, history) = send(&app, get("/history?limit=2", None)).await;
    assert_eq!(status, StatusCode::OK);

    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0]["id"].as_i64() > entries[1]["id"].as_i64());
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_registered_player_has_own_game() {
    let app = create_test_server();
    let token = register(&app, "high_roller").await;

    let body = spin(&app, Some(&token)).await;
    let user_balance = body["new_balance"].as_i64().unwrap();

    let (_, user_state) = send(&app, get("/state", Some(&token))).await;
    assert_eq!(user_state["balance"], user_balance);

    // Guest game untouched
    let (_, guest_state) = send(&app, get("/state", None)).await;
    assert_eq!(guest_state["balance"], 100);

    let (_, user_stats) = send(&app, get("/stats", Some(&token))).await;
    assert_eq!(user_stats["total_spins"], 1);
    let (_, guest_stats) = send(&app, get("/stats", None)).await;
    assert_eq!(guest_stats["total_spins"], 0);
}

#[tokio::test]
async fn test_login_returns_working_token() {
    let app = create_test_server();
    register(&app, "returning").await;

    let (status, body) = send(
        &app,
        post(
            "/auth/login",
            None,
            json!({"username": "returning", "password": PASSWORD}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    let (status, _) = send(&app, get("/state", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = create_test_server();
    register(&app, "careful").await;

    let (status, body) = send(
        &app,
        post(
            "/auth/login",
            None,
            json!({"username": "careful", "password": "not-the-password"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_duplicate_registration() {
    let app = create_test_server();
    register(&app, "only_one").await;

    let (status, _) = send(
        &app,
        post(
            "/auth/register",
            None,
            json!({"username": "only_one", "password": PASSWORD}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_weak_password_rejected() {
    let app = create_test_server();
    let (status, _) = send(
        &app,
        post(
            "/auth/register",
            None,
            json!({"username": "weakling", "password": "short"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let app = create_test_server();
    let (status, body) = send(&app, get("/state", Some("not-a-real-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let app = create_test_server();
    let token = register(&app, "leaving").await;

    let (status, _) = send(&app, post("/auth/logout", Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get("/state", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        post(
            "/auth/login",
            None,
            json!({"username": username, "password": PASSWORD}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_last_logout_releases_game() {
    let app = create_test_server();
    let token = register(&app, "cashing_out").await;

    let (status, _) = send(&app, post("/spin", Some(&token), json!({"bet_amount": 40}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, post("/auth/logout", Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // A fresh login starts a fresh game, while the history stays
    let token = login(&app, "cashing_out").await;
    let (_, state) = send(&app, get("/state", Some(&token))).await;
    assert_eq!(state["balance"], 100);
    assert!(state["last_spin"].is_null());

    let (_, stats) = send(&app, get("/stats", Some(&token))).await;
    assert_eq!(stats["total_spins"], 1);
}

#[tokio::test]
async fn test_logout_keeps_game_of_other_sessions() {
    let app = create_test_server();
    let first = register(&app, "two_devices").await;
    let second = login(&app, "two_devices").await;

    let body = spin(&app, Some(&first)).await;
    let balance = body["new_balance"].as_i64().unwrap();

    let (status, _) = send(&app, post("/auth/logout", Some(&first), json!({}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, state) = send(&app, get("/state", Some(&second))).await;
    assert_eq!(state["balance"], balance);
    assert!(state["last_spin"].is_array());
}

#[tokio::test]
async fn test_logout_requires_token() {
    let app = create_test_server();
    let (status, _) = send(&app, post("/auth/logout", None, json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Leaderboard Tests
// ============================================================================

#[tokio::test]
async fn test_leaderboard_ranks_registered_players() {
    let app = create_test_server();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    spin(&app, Some(&alice)).await;
    spin(&app, Some(&bob)).await;
    spin(&app, None).await;

    let (status, board) = send(&app, get("/leaderboard", None)).await;
    assert_eq!(status, StatusCode::OK);

    let entries = board.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[1]["rank"], 2);
    assert!(entries[0]["best_balance"].as_i64() >= entries[1]["best_balance"].as_i64());
    for entry in entries {
        assert!(entry["username"] == "alice" || entry["username"] == "bob");
    }

    let (_, limited) = send(&app, get("/leaderboard?limit=1", None)).await;
    assert_eq!(limited.as_array().unwrap().len(), 1);
}

// ============================================================================
// Static File Tests
// ============================================================================

#[tokio::test]
async fn test_index_served_from_static_dir() {
    let dir = std::env::temp_dir().join(format!("slots_static_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>VEGAS</h1>").unwrap();

    let app = with_static_files(create_test_server(), &dir);

    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"<h1>VEGAS</h1>");

    let response = app.oneshot(get("/static/index.html", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_missing_static_dir_serves_api_only() {
    let dir = std::env::temp_dir().join(format!("slots_missing_{}", uuid::Uuid::new_v4()));
    let app = with_static_files(create_test_server(), &dir);

    let (status, _) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    let response = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
