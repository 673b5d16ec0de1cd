//! Game API handlers.
//!
//! Every handler acts on the calling player's game, see
//! [`identify_player`](super::middleware::identify_player).

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use vegas_slots::{EngineState, PlayerKey, Symbol, history::NewSpin};

use super::{ApiError, AppState, api_error, request_id::RequestId};
use crate::{logging::log_spin, metrics};

#[derive(Debug, Default, Deserialize)]
pub struct SpinRequest {
    /// Falls back to the server's default bet
    #[serde(default)]
    pub bet_amount: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SpinResponse {
    pub reel1: Symbol,
    pub reel2: Symbol,
    pub reel3: Symbol,
    pub bet_amount: i64,
    pub winnings: i64,
    pub new_balance: i64,
    pub is_winner: bool,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
    pub balance: i64,
}

/// Place a bet and spin the reels.
///
/// # Request Body
///
/// ```json
/// { "bet_amount": 5 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Game over, insufficient balance, or a bet outside
///   the configured limits
pub async fn spin(
    State(state): State<AppState>,
    Extension(player): Extension<PlayerKey>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<SpinRequest>,
) -> Result<Json<SpinResponse>, ApiError> {
    let bet = payload.bet_amount.unwrap_or(state.default_bet);

    let outcome = state
        .games
        .play_round(player, bet)
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.client_message()))?;

    metrics::spins_total(outcome.is_winner);
    if outcome.is_winner {
        metrics::payout_amount(outcome.winnings);
    }
    log_spin(
        &player.to_string(),
        outcome.bet,
        outcome.winnings,
        outcome.balance,
    );

    // The round has already been played, so a storage failure only loses history.
    // The store lock is released by now: a reset for the same player landing
    // here keeps this record in the fresh game's history.
    if let Err(e) = state
        .spins
        .record_spin(&NewSpin::from_outcome(player, &outcome))
        .await
    {
        tracing::error!(
            request_id = %request_id.as_str(),
            player = %player,
            error = %e,
            "Failed to record spin"
        );
    }

    let [reel1, reel2, reel3] = outcome.reels;
    Ok(Json(SpinResponse {
        reel1,
        reel2,
        reel3,
        bet_amount: outcome.bet,
        winnings: outcome.winnings,
        new_balance: outcome.balance,
        is_winner: outcome.is_winner,
    }))
}

/// Current state of the caller's game.
pub async fn get_state(
    State(state): State<AppState>,
    Extension(player): Extension<PlayerKey>,
) -> Json<EngineState> {
    Json(state.games.state(player).await)
}

/// Restart the caller's game and delete its spin history.
///
/// # Errors
///
/// - `500 Internal Server Error`: History could not be cleared. The game is
///   left as it was.
pub async fn reset(
    State(state): State<AppState>,
    Extension(player): Extension<PlayerKey>,
) -> Result<Json<ResetResponse>, ApiError> {
    // History goes first so a failed clear leaves the game untouched
    let removed = state.spins.clear(player).await.map_err(|e| {
        tracing::error!(player = %player, error = %e, "Failed to clear spin history");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.client_message())
    })?;

    let fresh = state.games.reset(player).await;

    tracing::info!(player = %player, removed_spins = removed, "Game reset");
    metrics::active_games(state.games.active_games().await);

    Ok(Json(ResetResponse {
        message: "Game fully reset".to_string(),
        balance: fresh.balance,
    }))
}
