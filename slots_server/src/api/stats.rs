//! Statistics, history and leaderboard handlers.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use vegas_slots::{
    PlayerKey,
    history::{GameStats, HistoryError, LeaderboardEntry, SpinRecord, compute_stats},
};

use super::{ApiError, AppState, api_error};

const DEFAULT_HISTORY_LIMIT: usize = 20;
const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

impl LimitQuery {
    /// Requested limit, defaulted and clamped to `1..=MAX_LIMIT`
    fn resolve(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).clamp(1, MAX_LIMIT)
    }
}

fn history_error(error: HistoryError) -> ApiError {
    tracing::error!(error = %error, "History query failed");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, error.client_message())
}

/// Aggregate statistics for the caller's spins.
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(player): Extension<PlayerKey>,
) -> Result<Json<GameStats>, ApiError> {
    let spins = state.spins.spins_for(player).await.map_err(history_error)?;
    Ok(Json(compute_stats(&spins)))
}

/// The caller's most recent spins, newest first.
///
/// `limit` defaults to 20 and is capped at 100.
pub async fn get_history(
    State(state): State<AppState>,
    Extension(player): Extension<PlayerKey>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<SpinRecord>>, ApiError> {
    let limit = query.resolve(DEFAULT_HISTORY_LIMIT);
    let spins = state
        .spins
        .recent_spins(player, limit)
        .await
        .map_err(history_error)?;
    Ok(Json(spins))
}

/// Registered players ranked by best balance, then total won.
///
/// `limit` defaults to 10 and is capped at 100.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let limit = query.resolve(DEFAULT_LEADERBOARD_LIMIT);
    let board = state.spins.leaderboard(limit).await.map_err(history_error)?;
    Ok(Json(board))
}
