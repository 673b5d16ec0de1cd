//! Player identification and authentication middleware.
//!
//! Both middlewares read an opaque session token from the
//! `Authorization: Bearer <token>` header and resolve it through the
//! `AuthManager`. Handlers extract the result from request extensions:
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use vegas_slots::PlayerKey;
//!
//! async fn handler(Extension(player): Extension<PlayerKey>) -> String {
//!     format!("Playing as {player}")
//! }
//! # let _ = handler;
//! ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use vegas_slots::{PlayerKey, auth::Session};

use super::{ApiError, AppState, api_error};

/// Token carried by the Authorization header.
///
/// `Ok(None)` when the header is absent, an error when it is present but not
/// a bearer token.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| Some(token.trim()))
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Invalid authorization header"))
}

async fn resolve_session(state: &AppState, token: &str) -> Result<Session, ApiError> {
    state
        .auth_manager
        .resolve(token)
        .await
        .map_err(|e| api_error(StatusCode::UNAUTHORIZED, e.client_message()))
}

/// Select the game a request acts on.
///
/// # Behavior
///
/// - **No header**: Injects `PlayerKey::Guest`
/// - **Valid token**: Injects `PlayerKey::User(id)` and the `Session`
/// - **Malformed header, unknown or expired token**: Returns `401 Unauthorized`
pub async fn identify_player(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?.map(str::to_owned);

    let player = match token {
        Some(token) => {
            let session = resolve_session(&state, &token).await?;
            let player = PlayerKey::User(session.user_id);
            request.extensions_mut().insert(session);
            player
        }
        None => PlayerKey::Guest,
    };

    request.extensions_mut().insert(player);
    Ok(next.run(request).await)
}

/// Require a valid session and inject it.
///
/// # Behavior
///
/// - **Valid token**: Injects the `Session` and `PlayerKey::User(id)`
/// - **Missing header, unknown or expired token**: Returns `401 Unauthorized`
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?
        .map(str::to_owned)
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;

    let session = resolve_session(&state, &token).await?;
    request
        .extensions_mut()
        .insert(PlayerKey::User(session.user_id));
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
