//! Per-player game store.

use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};
use tokio::sync::Mutex;

use super::{
    engine::{DEFAULT_STARTING_BALANCE, EngineState, SlotEngine},
    errors::{GameError, GameResult},
    symbols::Reels,
};
use crate::auth::UserId;

/// Identity a game belongs to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKey {
    /// Shared anonymous game
    Guest,
    User(UserId),
}

impl PlayerKey {
    #[must_use]
    pub fn user_id(self) -> Option<UserId> {
        match self {
            PlayerKey::Guest => None,
            PlayerKey::User(id) => Some(id),
        }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerKey::Guest => write!(f, "guest"),
            PlayerKey::User(id) => write!(f, "user:{id}"),
        }
    }
}

/// Bet limits applied before the engine sees a bet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BetLimits {
    pub min_bet: i64,
    pub max_bet: Option<i64>,
}

impl BetLimits {
    #[must_use]
    pub fn allows(&self, amount: i64) -> bool {
        amount >= self.min_bet && self.max_bet.is_none_or(|max| amount <= max)
    }
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            min_bet: 1,
            max_bet: None,
        }
    }
}

/// Settings shared by every game in a store.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GameSettings {
    pub starting_balance: i64,
    pub limits: BetLimits,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_STARTING_BALANCE,
            limits: BetLimits::default(),
        }
    }
}

/// Result of one bet-spin-payout round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundOutcome {
    pub reels: Reels,
    pub bet: i64,
    pub winnings: i64,
    pub balance: i64,
    pub is_winner: bool,
}

/// Map from player to engine.
///
/// Every operation holds the lock for a short synchronous section, so rounds
/// for the same player never interleave.
pub struct GameStore {
    games: Mutex<HashMap<PlayerKey, SlotEngine>>,
    settings: GameSettings,
}

impl GameStore {
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        Self {
            games: Mutex::new(HashMap::new()),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    /// Current state for `player`, starting a game if none exists.
    pub async fn state(&self, player: PlayerKey) -> EngineState {
        let mut games = self.games.lock().await;
        self.engine_for(&mut games, player).state()
    }

    /// Plays one round: bet, spin, check, and credit any winnings.
    ///
    /// # Errors
    ///
    /// * `GameError::GameOver` - Balance is zero or below
    /// * `GameError::InvalidBet` - Bet is outside the configured limits
    /// * `GameError::InsufficientBalance` - Bet exceeds the balance
    pub async fn play_round(&self, player: PlayerKey, bet: i64) -> GameResult<RoundOutcome> {
        let mut games = self.games.lock().await;
        let engine = self.engine_for(&mut games, player);

        if engine.balance() <= 0 {
            return Err(GameError::GameOver);
        }

        if !self.settings.limits.allows(bet) {
            return Err(GameError::InvalidBet(bet));
        }

        if !engine.place_bet(bet) {
            return Err(GameError::InsufficientBalance {
                available: engine.balance(),
                required: bet,
            });
        }

        let [reel1, reel2, reel3] = engine.spin();
        let winnings = engine.check_win(reel1, reel2, reel3);
        if winnings > 0 {
            engine.add_winnings(winnings);
        }

        debug!("{player} bet {bet} spun {reel1} {reel2} {reel3} won {winnings}");

        Ok(RoundOutcome {
            reels: [reel1, reel2, reel3],
            bet,
            winnings,
            balance: engine.balance(),
            is_winner: winnings > 0,
        })
    }

    /// Replaces the player's game with a fresh one at the starting balance.
    pub async fn reset(&self, player: PlayerKey) -> EngineState {
        let engine = SlotEngine::new(self.settings.starting_balance);
        let state = engine.state();
        self.games.lock().await.insert(player, engine);
        debug!("{player} reset to {}", state.balance);
        state
    }

    /// Drops the player's game. Returns whether one existed.
    pub async fn evict(&self, player: PlayerKey) -> bool {
        self.games.lock().await.remove(&player).is_some()
    }

    pub async fn active_games(&self) -> usize {
        self.games.lock().await.len()
    }

    fn engine_for<'a>(
        &self,
        games: &'a mut HashMap<PlayerKey, SlotEngine>,
        player: PlayerKey,
    ) -> &'a mut SlotEngine {
        games
            .entry(player)
            .or_insert_with(|| SlotEngine::new(self.settings.starting_balance))
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}
