//! Slot machine engine: balance, bets, reels, and winnings for one player.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    paytable::payout_for,
    symbols::{Reels, Symbol},
};

/// Balance given to a fresh game when nothing else is configured.
pub const DEFAULT_STARTING_BALANCE: i64 = 100;

/// Largest starting balance front ends accept. Leaves room for winnings
/// without approaching `i64::MAX`.
pub const MAX_STARTING_BALANCE: i64 = 1_000_000_000_000;

/// Snapshot of an engine's state.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EngineState {
    pub balance: i64,
    pub starting_balance: i64,
    pub last_spin: Option<Reels>,
    pub last_winnings: i64,
}

/// Game state for a single player session.
///
/// The engine is not synchronized; callers serialize access per player
/// (see [`GameStore`](super::GameStore)).
#[derive(Clone, Debug)]
pub struct SlotEngine {
    balance: i64,
    starting_balance: i64,
    last_spin: Option<Reels>,
    last_winnings: i64,
}

impl SlotEngine {
    #[must_use]
    pub fn new(starting_balance: i64) -> Self {
        Self {
            balance: starting_balance,
            starting_balance,
            last_spin: None,
            last_winnings: 0,
        }
    }

    #[must_use]
    pub fn balance(&self) -> i64 {
        self.balance
    }

    #[must_use]
    pub fn starting_balance(&self) -> i64 {
        self.starting_balance
    }

    /// Debits `amount` if the balance covers it.
    ///
    /// Returns `false` and leaves the balance untouched otherwise. The amount
    /// is not checked for sign here; bet limits are enforced by the caller.
    pub fn place_bet(&mut self, amount: i64) -> bool {
        if self.balance >= amount {
            self.balance -= amount;
            true
        } else {
            false
        }
    }

    /// Spins all three reels with the thread-local generator.
    pub fn spin(&mut self) -> Reels {
        self.spin_with(&mut rand::rng())
    }

    /// Spins all three reels, drawing each symbol independently and uniformly.
    pub fn spin_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Reels {
        let reels = [draw(rng), draw(rng), draw(rng)];
        self.last_spin = Some(reels);
        reels
    }

    /// Payout for the exact ordered triple. Reads no engine state.
    #[must_use]
    pub fn check_win(&self, reel1: Symbol, reel2: Symbol, reel3: Symbol) -> i64 {
        payout_for(&[reel1, reel2, reel3])
    }

    /// Credits `amount` and records it as the last win. The balance
    /// saturates at `i64::MAX` instead of wrapping.
    pub fn add_winnings(&mut self, amount: i64) {
        self.balance = self.balance.saturating_add(amount);
        self.last_winnings = amount;
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        EngineState {
            balance: self.balance,
            starting_balance: self.starting_balance,
            last_spin: self.last_spin,
            last_winnings: self.last_winnings,
        }
    }
}

impl Default for SlotEngine {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_BALANCE)
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R) -> Symbol {
    Symbol::ALL[rng.random_range(0..Symbol::ALL.len())]
}
