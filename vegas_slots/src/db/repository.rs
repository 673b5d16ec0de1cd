//! Repository traits and their PostgreSQL implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    auth::{AuthError, AuthResult, User, UserCredentials, UserId},
    game::{PlayerKey, Reels, Symbol},
    history::{
        HistoryError, HistoryResult, LeaderboardEntry, NewSpin, SpinRecord, rank_leaderboard,
    },
};

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    ///
    /// Fails with `AuthError::UsernameTaken` if the username exists.
    async fn create_user(&self, username: &str, password_hash: &str) -> AuthResult<User>;

    /// Find user and password hash by username
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<UserCredentials>>;

    /// Update user's last login timestamp
    async fn update_last_login(&self, user_id: UserId) -> AuthResult<()>;
}

/// Trait for spin history repository operations
#[async_trait]
pub trait SpinRepository: Send + Sync {
    /// Persist a spin, returning its ID
    async fn record_spin(&self, spin: &NewSpin) -> HistoryResult<i64>;

    /// Every spin of a player, oldest first
    async fn spins_for(&self, player: PlayerKey) -> HistoryResult<Vec<SpinRecord>>;

    /// Most recent spins of a player, newest first
    async fn recent_spins(&self, player: PlayerKey, limit: usize) -> HistoryResult<Vec<SpinRecord>>;

    /// Delete a player's spins, returning how many were removed
    async fn clear(&self, player: PlayerKey) -> HistoryResult<u64>;

    /// Registered players ranked by best balance
    async fn leaderboard(&self, limit: usize) -> HistoryResult<Vec<LeaderboardEntry>>;
}

/// Default PostgreSQL implementation of `UserRepository`
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        created_at: row.get("created_at"),
        last_login: row.get("last_login"),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, username: &str, password_hash: &str) -> AuthResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, created_at, last_login
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AuthError::UsernameTaken,
            e => AuthError::Database(e),
        })?;

        Ok(user_from_row(&row))
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<UserCredentials>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at, last_login
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserCredentials {
            user: user_from_row(&r),
            password_hash: r.get("password_hash"),
        }))
    }

    async fn update_last_login(&self, user_id: UserId) -> AuthResult<()> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Default PostgreSQL implementation of `SpinRepository`
pub struct PgSpinRepository {
    pool: PgPool,
}

impl PgSpinRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn spin_from_row(row: &PgRow) -> HistoryResult<SpinRecord> {
    let id: i64 = row.get("id");
    let labels: Vec<String> = row.get("reels");
    let reels = parse_reels(&labels).map_err(|reason| HistoryError::CorruptRecord { id, reason })?;
    let timestamp: DateTime<Utc> = row.get("created_at");

    Ok(SpinRecord {
        id,
        user_id: row.get("user_id"),
        timestamp,
        reels,
        bet: row.get("bet"),
        winnings: row.get("winnings"),
        balance_after: row.get("balance_after"),
        is_winner: row.get("is_winner"),
    })
}

fn parse_reels(labels: &[String]) -> Result<Reels, String> {
    match labels {
        [a, b, c] => {
            let parse = |s: &String| s.parse::<Symbol>().map_err(|e| e.to_string());
            Ok([parse(a)?, parse(b)?, parse(c)?])
        }
        _ => Err(format!("expected 3 reels, found {}", labels.len())),
    }
}

#[async_trait]
impl SpinRepository for PgSpinRepository {
    async fn record_spin(&self, spin: &NewSpin) -> HistoryResult<i64> {
        let labels: Vec<String> = spin.reels.iter().map(|s| s.label().to_string()).collect();
        let row = sqlx::query(
            r#"
            INSERT INTO spins (user_id, created_at, reels, bet, winnings, balance_after, is_winner)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(spin.player.user_id())
        .bind(spin.timestamp)
        .bind(labels)
        .bind(spin.bet)
        .bind(spin.winnings)
        .bind(spin.balance_after)
        .bind(spin.is_winner)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    async fn spins_for(&self, player: PlayerKey) -> HistoryResult<Vec<SpinRecord>> {
        let rows = sqlx::query(
            "SELECT id, user_id, created_at, reels, bet, winnings, balance_after, is_winner
             FROM spins WHERE user_id IS NOT DISTINCT FROM $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(player.user_id())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(spin_from_row).collect()
    }

    async fn recent_spins(&self, player: PlayerKey, limit: usize) -> HistoryResult<Vec<SpinRecord>> {
        let rows = sqlx::query(
            "SELECT id, user_id, created_at, reels, bet, winnings, balance_after, is_winner
             FROM spins WHERE user_id IS NOT DISTINCT FROM $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2",
        )
        .bind(player.user_id())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(spin_from_row).collect()
    }

    async fn clear(&self, player: PlayerKey) -> HistoryResult<u64> {
        let result = sqlx::query("DELETE FROM spins WHERE user_id IS NOT DISTINCT FROM $1")
            .bind(player.user_id())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn leaderboard(&self, limit: usize) -> HistoryResult<Vec<LeaderboardEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id AS user_id,
                   u.username,
                   MAX(s.balance_after) AS best_balance,
                   COALESCE(SUM(s.winnings), 0)::BIGINT AS total_won,
                   COUNT(*) AS total_spins
            FROM spins s
            JOIN users u ON u.id = s.user_id
            GROUP BY u.id, u.username
            ORDER BY best_balance DESC, total_won DESC, u.username ASC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .iter()
            .map(|r| LeaderboardEntry {
                rank: 0,
                user_id: r.get("user_id"),
                username: r.get("username"),
                best_balance: r.get("best_balance"),
                total_won: r.get("total_won"),
                total_spins: r.get("total_spins"),
            })
            .collect();

        Ok(rank_leaderboard(entries, limit))
    }
}
