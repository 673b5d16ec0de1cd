//! Aggregate statistics and leaderboard ranking.

use std::cmp::Reverse;

use super::models::{GameStats, LeaderboardEntry, RecentSpin, SpinRecord};

/// How many recent spins a stats summary carries.
pub const RECENT_SPINS: usize = 5;

/// Summarizes `spins`, which must be in chronological order.
pub fn compute_stats(spins: &[SpinRecord]) -> GameStats {
    let total_spins = spins.len() as u64;
    let total_wins = spins.iter().filter(|s| s.is_winner).count() as u64;
    let total_amount_won = spins.iter().map(|s| s.winnings).sum();
    let highest_win = spins.iter().map(|s| s.winnings).max().unwrap_or(0).max(0);

    let mut current_streak = 0;
    let mut max_win_streak = 0;
    for spin in spins {
        if spin.is_winner {
            current_streak += 1;
            max_win_streak = max_win_streak.max(current_streak);
        } else {
            current_streak = 0;
        }
    }

    let win_rate = if total_spins > 0 {
        round2(total_wins as f64 / total_spins as f64 * 100.0)
    } else {
        0.0
    };

    let last_5_spins = spins
        .iter()
        .rev()
        .take(RECENT_SPINS)
        .map(|s| RecentSpin {
            reels: s.reels,
            winnings: s.winnings,
        })
        .collect();

    GameStats {
        total_spins,
        total_wins,
        total_amount_won,
        win_rate,
        highest_win,
        max_win_streak,
        last_5_spins,
    }
}

/// Orders by best balance, then total won, then username, and assigns ranks.
pub fn rank_leaderboard(mut entries: Vec<LeaderboardEntry>, limit: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by_key(|e| (Reverse(e.best_balance), Reverse(e.total_won), e.username.clone()));
    entries.truncate(limit);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }
    entries
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
