//! Spin history, per-player statistics, and the leaderboard.

pub mod errors;
pub mod models;
pub mod stats;

pub use errors::{HistoryError, HistoryResult};
pub use models::{GameStats, LeaderboardEntry, NewSpin, RecentSpin, SpinRecord};
pub use stats::{RECENT_SPINS, compute_stats, rank_leaderboard};
