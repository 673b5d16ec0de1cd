//! Authentication API handlers.
//!
//! # Examples
//!
//! Register a new user:
//! ```bash
//! curl -X POST http://localhost:8000/auth/register \
//!   -H "Content-Type: application/json" \
//!   -d '{"username": "player1", "password": "lucky-sevens"}'
//! ```
//!
//! Spin as that user:
//! ```bash
//! curl -X POST http://localhost:8000/spin \
//!   -H "Authorization: Bearer TOKEN" \
//!   -H "Content-Type: application/json" \
//!   -d '{"bet_amount": 5}'
//! ```

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use vegas_slots::{
    GameStore, PlayerKey,
    auth::{AuthError, AuthManager, LoginRequest, RegisterRequest, Session},
};

use super::{ApiError, AppState, api_error};
use crate::{logging::log_security_event, metrics};

#[derive(Debug, Deserialize)]
pub struct CredentialsPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub username: String,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            user_id: session.user_id,
            username: session.username,
        }
    }
}

fn status_for(error: &AuthError) -> StatusCode {
    match error {
        AuthError::Database(_) | AuthError::HashingFailed => StatusCode::INTERNAL_SERVER_ERROR,
        AuthError::InvalidCredentials | AuthError::SessionNotFound | AuthError::SessionExpired => {
            StatusCode::UNAUTHORIZED
        }
        AuthError::UsernameTaken => StatusCode::CONFLICT,
        AuthError::InvalidUsername(_) | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
    }
}

fn auth_error(error: AuthError) -> ApiError {
    if matches!(error, AuthError::Database(_) | AuthError::HashingFailed) {
        tracing::error!(error = %error, "Authentication backend failure");
    }
    api_error(status_for(&error), error.client_message())
}

/// Register a new user account and log them in.
///
/// # Request Body
///
/// ```json
/// { "username": "player123", "password": "lucky-sevens" }
/// ```
///
/// # Response
///
/// `200 OK` with `{"token", "user_id", "username"}`.
///
/// # Errors
///
/// - `400 Bad Request`: Invalid username or weak password
/// - `409 Conflict`: Username already taken
/// - `500 Internal Server Error`: Storage failure
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .auth_manager
        .register(RegisterRequest {
            username: payload.username.clone(),
            password: payload.password.clone(),
        })
        .await
        .map_err(auth_error)?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let (_, session) = state
        .auth_manager
        .login(LoginRequest {
            username: payload.username,
            password: payload.password,
        })
        .await
        .map_err(auth_error)?;

    metrics::active_sessions(state.auth_manager.active_sessions().await);
    Ok(Json(session.into()))
}

/// Authenticate a user and open a session.
///
/// # Response
///
/// `200 OK` with `{"token", "user_id", "username"}`.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let username = payload.username.clone();
    let request = LoginRequest {
        username: payload.username,
        password: payload.password,
    };

    match state.auth_manager.login(request).await {
        Ok((_, session)) => {
            metrics::login_attempts_total(true);
            metrics::active_sessions(state.auth_manager.active_sessions().await);
            Ok(Json(session.into()))
        }
        Err(e) => {
            metrics::login_attempts_total(false);
            if matches!(e, AuthError::InvalidCredentials) {
                log_security_event("failed_login", None, Some(&username), "Invalid credentials");
            }
            Err(auth_error(e))
        }
    }
}

/// End the caller's session.
///
/// # Response
///
/// `204 No Content`. The token is rejected by every later request. When
/// this was the user's last session their game is dropped from memory, so the
/// next login starts at the starting balance.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<StatusCode, ApiError> {
    state
        .auth_manager
        .logout(&session.token)
        .await
        .map_err(auth_error)?;

    tracing::info!(user_id = session.user_id, "User logged out");

    if !state.auth_manager.has_session(session.user_id).await
        && state.games.evict(PlayerKey::User(session.user_id)).await
    {
        tracing::debug!(user_id = session.user_id, "Evicted game after last logout");
    }

    metrics::active_sessions(state.auth_manager.active_sessions().await);
    metrics::active_games(state.games.active_games().await);
    Ok(StatusCode::NO_CONTENT)
}

/// Purge expired sessions and evict the games of users left without one.
///
/// Returns how many games were evicted.
pub async fn release_expired_sessions(auth_manager: &AuthManager, games: &GameStore) -> usize {
    let mut released = 0;
    for user_id in auth_manager.purge_expired().await {
        if games.evict(PlayerKey::User(user_id)).await {
            released += 1;
        }
    }
    released
}
