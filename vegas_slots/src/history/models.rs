//! Spin history data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    auth::UserId,
    game::{PlayerKey, Reels, RoundOutcome},
};

/// Spin waiting to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpin {
    pub player: PlayerKey,
    pub timestamp: DateTime<Utc>,
    pub reels: Reels,
    pub bet: i64,
    pub winnings: i64,
    pub balance_after: i64,
    pub is_winner: bool,
}

impl NewSpin {
    pub fn from_outcome(player: PlayerKey, outcome: &RoundOutcome) -> Self {
        Self {
            player,
            timestamp: Utc::now(),
            reels: outcome.reels,
            bet: outcome.bet,
            winnings: outcome.winnings,
            balance_after: outcome.balance,
            is_winner: outcome.is_winner,
        }
    }
}

/// Persisted spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinRecord {
    pub id: i64,
    pub user_id: Option<UserId>,
    pub timestamp: DateTime<Utc>,
    pub reels: Reels,
    pub bet: i64,
    pub winnings: i64,
    pub balance_after: i64,
    pub is_winner: bool,
}

/// One of the most recent spins in a stats summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSpin {
    pub reels: Reels,
    pub winnings: i64,
}

/// Aggregate statistics over a player's spins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub total_spins: u64,
    pub total_wins: u64,
    pub total_amount_won: i64,
    /// Percentage, rounded to two decimals
    pub win_rate: f64,
    pub highest_win: i64,
    pub max_win_streak: u64,
    pub last_5_spins: Vec<RecentSpin>,
}

/// Leaderboard row for a registered player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub username: String,
    pub best_balance: i64,
    pub total_won: i64,
    pub total_spins: i64,
}
