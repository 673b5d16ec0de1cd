//! Fixed payout table.

use super::symbols::{Reels, Symbol};

/// Winning triples and their payouts, highest first.
pub const PAYOUTS: [(Reels, i64); 5] = [
    ([Symbol::Seven, Symbol::Seven, Symbol::Seven], 1000),
    ([Symbol::Star, Symbol::Star, Symbol::Star], 500),
    ([Symbol::Hash, Symbol::Hash, Symbol::Hash], 250),
    ([Symbol::Dollar, Symbol::Dollar, Symbol::Dollar], 200),
    ([Symbol::At, Symbol::At, Symbol::At], 150),
];

/// Looks up the exact ordered triple, returning 0 when it does not pay.
#[must_use]
pub fn payout_for(reels: &Reels) -> i64 {
    PAYOUTS
        .iter()
        .find(|(triple, _)| triple == reels)
        .map_or(0, |(_, payout)| *payout)
}
