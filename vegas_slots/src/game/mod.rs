//! Slot machine game logic.
//!
//! [`SlotEngine`] holds one player's balance and last outcome. [`GameStore`]
//! owns one engine per player and runs the bet, spin, payout protocol.

pub mod engine;
pub mod errors;
pub mod paytable;
pub mod store;
pub mod symbols;

pub use engine::{DEFAULT_STARTING_BALANCE, EngineState, MAX_STARTING_BALANCE, SlotEngine};
pub use errors::{GameError, GameResult};
pub use paytable::{PAYOUTS, payout_for};
pub use store::{BetLimits, GameSettings, GameStore, PlayerKey, RoundOutcome};
pub use symbols::{ParseSymbolError, Reels, Symbol};
