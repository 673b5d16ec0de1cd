//! # Vegas Slots
//!
//! A three-reel Vegas style slot machine: the game engine, a per-player game
//! store, accounts, and spin history with a leaderboard.
//!
//! ## Core Modules
//!
//! - [`game`]: Reel symbols, payout table, [`SlotEngine`] and [`GameStore`]
//! - [`auth`]: Registration, login, and session tokens
//! - [`history`]: Spin records, statistics, and leaderboard ranking
//! - [`db`]: PostgreSQL and in-memory repositories
//!
//! ## Example
//!
//! ```
//! use vegas_slots::{SlotEngine, Symbol};
//!
//! let mut engine = SlotEngine::new(100);
//! assert!(engine.place_bet(5));
//!
//! let [a, b, c] = engine.spin();
//! let winnings = engine.check_win(a, b, c);
//! if winnings > 0 {
//!     engine.add_winnings(winnings);
//! }
//! assert_eq!(engine.check_win(Symbol::Seven, Symbol::Seven, Symbol::Seven), 1000);
//! ```

pub mod auth;
pub mod db;
pub mod game;
pub mod history;

pub use game::{
    BetLimits, EngineState, GameError, GameSettings, GameStore, PlayerKey, Reels, RoundOutcome,
    SlotEngine, Symbol,
};
