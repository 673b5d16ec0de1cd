//! HTTP API for the slot machine server.
//!
//! # Modules
//!
//! - [`auth`]: Registration, login and logout
//! - [`game`]: Spin, state and reset for the calling player
//! - [`stats`]: Per-player statistics, spin history and the leaderboard
//! - [`middleware`]: Player identification and authentication
//! - [`request_id`]: Request correlation
//!
//! # Player Identity
//!
//! Game endpoints act on the game selected by the `Authorization` header:
//! a valid `Bearer <token>` selects the registered user's game, no header
//! selects the shared guest game, and an unknown or expired token is
//! rejected with `401 Unauthorized`.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use slots_server::api::{AppState, create_router};
//! use std::sync::Arc;
//! use vegas_slots::{GameStore, auth::AuthManager, db::MemoryRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Arc::new(MemoryRepository::new());
//! let state = AppState {
//!     auth_manager: Arc::new(AuthManager::new(repo.clone(), "pepper_of_16_chars".to_string())),
//!     games: Arc::new(GameStore::default()),
//!     spins: repo,
//!     database: None,
//!     default_bet: 5,
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod game;
pub mod middleware;
pub mod request_id;
pub mod stats;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::{path::Path, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};
use vegas_slots::{
    GameStore,
    auth::AuthManager,
    db::{Database, SpinRepository},
};

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    pub games: Arc<GameStore>,
    pub spins: Arc<dyn SpinRepository>,
    /// PostgreSQL handle, `None` when running in memory
    pub database: Option<Database>,
    /// Bet used when a spin request names none
    pub default_bet: i64,
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Create the API router with all endpoints and middleware.
///
/// # Endpoint Summary
///
/// ```text
/// GET  /health              - Health check
/// POST /auth/register       - Register and log in
/// POST /auth/login          - Log in
/// POST /auth/logout         - End the session (auth required)
/// POST /spin                - Bet and spin
/// GET  /state               - Current game state
/// POST /reset               - Restart the game and clear its history
/// GET  /stats               - Statistics for the calling player
/// GET  /history?limit=N     - Recent spins for the calling player
/// GET  /leaderboard?limit=N - Registered players by best balance
/// ```
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/leaderboard", get(stats::get_leaderboard));

    // Guest or registered player, chosen by the Authorization header
    let player_routes = Router::new()
        .route("/spin", post(game::spin))
        .route("/state", get(game::get_state))
        .route("/reset", post(game::reset))
        .route("/stats", get(stats::get_stats))
        .route("/history", get(stats::get_history))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::identify_player,
        ));

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(player_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve `index.html` at `/` and the directory under `/static`.
///
/// Returns the router unchanged when `dir` does not exist.
pub fn with_static_files(router: Router, dir: &Path) -> Router {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "Static directory not found, serving API only");
        return router;
    }

    router
        .route_service("/", ServeFile::new(dir.join("index.html")))
        .nest_service("/static", ServeDir::new(dir))
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when storage is reachable, `503 Service Unavailable`
/// when the database check fails.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"healthy","version":"2.0.0","storage":"postgres","active_games":1,"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (storage, storage_healthy) = match &state.database {
        Some(db) => ("postgres", db.health_check().await.is_ok()),
        None => ("memory", true),
    };

    let active_games = state.games.active_games().await;
    crate::metrics::active_games(active_games);

    let status_code = if storage_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if storage_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage,
        "active_games": active_games,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
