//! Book side.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Price;
use crate::error::Error;

/// Book side (bids or asks)
///
/// The feed names sides after the resting order: `"buy"` levels are bids,
/// `"sell"` levels are asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bids - best price is the highest
    Buy,
    /// Asks - best price is the lowest
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Wire name of the side
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }

    /// Order two prices from this side's point of view.
    ///
    /// `Greater` means `a` is the better price: higher for bids, lower for asks.
    pub fn rank(self, a: &Price, b: &Price) -> Ordering {
        match self {
            Side::Buy => a.cmp(b),
            Side::Sell => b.cmp(a),
        }
    }

    /// `true` when `a` is strictly better than `b` on this side
    pub fn is_better(self, a: &Price, b: &Price) -> bool {
        self.rank(a, b) == Ordering::Greater
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(Error::Protocol(format!("unknown side {other:?}"))),
        }
    }
}
