//! Game round errors.

use thiserror::Error;

/// Errors from playing a round through the [`GameStore`](super::GameStore).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// Balance is exhausted; only a reset can continue the game
    #[error("Game Over - Reset Required")]
    GameOver,

    /// Bet is outside the configured limits
    #[error("Invalid bet amount: {0}")]
    InvalidBet(i64),

    /// Bet exceeds the current balance
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: i64, required: i64 },
}

impl GameError {
    /// Message shown to players.
    pub fn client_message(&self) -> String {
        match self {
            GameError::InsufficientBalance { .. } => "Insufficient balance".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;
