//! Reel symbols.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// One label from the fixed eight-symbol reel alphabet.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Symbol {
    #[serde(rename = "@")]
    At,
    #[serde(rename = "#")]
    Hash,
    #[serde(rename = "$")]
    Dollar,
    #[serde(rename = "*")]
    Star,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "BAR")]
    Bar,
    #[serde(rename = "CHERRY")]
    Cherry,
    #[serde(rename = "LEMON")]
    Lemon,
}

/// One symbol per reel, left to right.
pub type Reels = [Symbol; 3];

impl Symbol {
    /// Every symbol, in reel-strip order.
    pub const ALL: [Symbol; 8] = [
        Symbol::At,
        Symbol::Hash,
        Symbol::Dollar,
        Symbol::Star,
        Symbol::Seven,
        Symbol::Bar,
        Symbol::Cherry,
        Symbol::Lemon,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Symbol::At => "@",
            Symbol::Hash => "#",
            Symbol::Dollar => "$",
            Symbol::Star => "*",
            Symbol::Seven => "7",
            Symbol::Bar => "BAR",
            Symbol::Cherry => "CHERRY",
            Symbol::Lemon => "LEMON",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown reel symbol: {0:?}")]
pub struct ParseSymbolError(pub String);

impl FromStr for Symbol {
    type Err = ParseSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::ALL
            .into_iter()
            .find(|symbol| symbol.label() == s)
            .ok_or_else(|| ParseSymbolError(s.to_string()))
    }
}
