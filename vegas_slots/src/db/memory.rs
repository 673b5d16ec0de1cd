//! In-memory repositories, used with `--in-memory` and in tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::repository::{SpinRepository, UserRepository};
use crate::{
    auth::{AuthError, AuthResult, User, UserCredentials, UserId},
    game::PlayerKey,
    history::{HistoryResult, LeaderboardEntry, NewSpin, SpinRecord, rank_leaderboard},
};

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    spins: Vec<SpinRecord>,
    next_spin_id: i64,
}

/// Users and spins kept in process memory
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn belongs_to(spin: &SpinRecord, player: PlayerKey) -> bool {
    spin.user_id == player.user_id()
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn create_user(&self, username: &str, password_hash: &str) -> AuthResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|c| c.user.username == username) {
            return Err(AuthError::UsernameTaken);
        }

        let user = User {
            id: tables.users.len() as UserId + 1,
            username: username.to_string(),
            created_at: Utc::now(),
            last_login: None,
        };
        tables.users.push(UserCredentials {
            user: user.clone(),
            password_hash: password_hash.to_string(),
        });
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<UserCredentials>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn update_last_login(&self, user_id: UserId) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(credentials) = tables.users.iter_mut().find(|c| c.user.id == user_id) {
            credentials.user.last_login = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl SpinRepository for MemoryRepository {
    async fn record_spin(&self, spin: &NewSpin) -> HistoryResult<i64> {
        let mut tables = self.tables.write().await;
        tables.next_spin_id += 1;
        let id = tables.next_spin_id;
        tables.spins.push(SpinRecord {
            id,
            user_id: spin.player.user_id(),
            timestamp: spin.timestamp,
            reels: spin.reels,
            bet: spin.bet,
            winnings: spin.winnings,
            balance_after: spin.balance_after,
            is_winner: spin.is_winner,
        });
        Ok(id)
    }

    async fn spins_for(&self, player: PlayerKey) -> HistoryResult<Vec<SpinRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .spins
            .iter()
            .filter(|s| belongs_to(s, player))
            .cloned()
            .collect())
    }

    async fn recent_spins(&self, player: PlayerKey, limit: usize) -> HistoryResult<Vec<SpinRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .spins
            .iter()
            .rev()
            .filter(|s| belongs_to(s, player))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn clear(&self, player: PlayerKey) -> HistoryResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.spins.len();
        tables.spins.retain(|s| !belongs_to(s, player));
        Ok((before - tables.spins.len()) as u64)
    }

    async fn leaderboard(&self, limit: usize) -> HistoryResult<Vec<LeaderboardEntry>> {
        let tables = self.tables.read().await;
        let mut per_user: HashMap<UserId, LeaderboardEntry> = HashMap::new();

        for spin in &tables.spins {
            let Some(user_id) = spin.user_id else {
                continue;
            };
            let Some(credentials) = tables.users.iter().find(|c| c.user.id == user_id) else {
                continue;
            };
            let entry = per_user.entry(user_id).or_insert_with(|| LeaderboardEntry {
                rank: 0,
                user_id,
                username: credentials.user.username.clone(),
                best_balance: spin.balance_after,
                total_won: 0,
                total_spins: 0,
            });
            entry.best_balance = entry.best_balance.max(spin.balance_after);
            entry.total_won += spin.winnings;
            entry.total_spins += 1;
        }

        Ok(rank_leaderboard(per_user.into_values().collect(), limit))
    }
}
