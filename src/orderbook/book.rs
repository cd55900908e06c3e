//! Two-sided order book built from snapshots and level-2 diffs.

use std::num::NonZeroUsize;

use rust_decimal::Decimal;
use tracing::warn;

use super::ladder::{PriceLadder, UpdateOutcome};
use crate::error::Error;
use crate::types::messages::{L2Change, LevelQuote};
use crate::types::{Price, Side, Size};

/// Result of applying a batch of levels or changes
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Entries that were parsed and handed to a ladder
    pub applied: usize,
    /// Entries rejected on their own; the rest of the batch still applied
    pub rejected: Vec<Error>,
}

impl ApplyReport {
    /// `true` when no entry was rejected
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Order book for a single product.
///
/// Holds one [`PriceLadder`] per side. A new book is built for every
/// snapshot; diffs then mutate it in place, strictly in the order received.
///
/// # Thread Safety
///
/// This struct is `Send + Sync` but not internally synchronized. The feed
/// controller is its only writer; readers get clones through
/// [`BookView`](super::BookView).
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Product id
    product_id: String,

    /// Bid levels
    bids: PriceLadder,

    /// Ask levels
    asks: PriceLadder,
}

impl OrderBook {
    /// Create an empty book; `depth` bounds both ladders when `Some`
    #[must_use]
    pub fn new(product_id: impl Into<String>, depth: Option<NonZeroUsize>) -> Self {
        Self {
            product_id: product_id.into(),
            bids: PriceLadder::with_depth(Side::Buy, depth),
            asks: PriceLadder::with_depth(Side::Sell, depth),
        }
    }

    /// Build a book from snapshot level lists
    ///
    /// Levels are applied in list order, so a price listed twice keeps its
    /// last size. Malformed pairs are skipped and reported.
    pub fn from_snapshot(
        product_id: impl Into<String>,
        depth: Option<NonZeroUsize>,
        bids: &[LevelQuote],
        asks: &[LevelQuote],
    ) -> (Self, ApplyReport) {
        let mut book = Self::new(product_id, depth);
        let report = book.apply_snapshot(bids, asks);
        (book, report)
    }

    /// Replace both ladders with the given snapshot levels
    pub fn apply_snapshot(&mut self, bids: &[LevelQuote], asks: &[LevelQuote]) -> ApplyReport {
        self.bids.clear();
        self.asks.clear();

        let mut report = ApplyReport::default();
        for (ladder, quotes) in [(&mut self.bids, bids), (&mut self.asks, asks)] {
            for LevelQuote(price, size) in quotes {
                match ladder.update_str(price, size) {
                    Ok(_) => report.applied += 1,
                    Err(e) => {
                        warn!(product_id = %self.product_id, side = %ladder.side(), error = %e, "dropping snapshot level");
                        report.rejected.push(e);
                    }
                }
            }
        }
        report
    }

    /// Apply a level-2 change list in order.
    ///
    /// Entries are applied one at a time because later entries may target
    /// the same price as earlier ones. An entry with an unknown side or a
    /// malformed number is rejected alone.
    pub fn apply_diff(&mut self, changes: &[L2Change]) -> ApplyReport {
        let mut report = ApplyReport::default();
        for change in changes {
            match self.apply_change(change) {
                Ok(_) => report.applied += 1,
                Err(e) => {
                    warn!(product_id = %self.product_id, error = %e, "dropping l2 change");
                    report.rejected.push(e);
                }
            }
        }
        report
    }

    /// Apply one `[side, price, size]` change
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`] for a side other than `"buy"` or `"sell"`
    /// - [`Error::InvalidDecimal`] for a malformed price or size
    pub fn apply_change(&mut self, change: &L2Change) -> Result<UpdateOutcome, Error> {
        let L2Change(side, price, size) = change;
        let side: Side = side.parse()?;
        self.ladder_mut(side).update_str(price, size)
    }

    /// Set a price level directly; size zero removes it
    pub fn update(&mut self, side: Side, price: Price, size: Size) -> UpdateOutcome {
        self.ladder_mut(side).update(price, size)
    }

    /// Get the product id
    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Ladder for one side
    #[must_use]
    pub fn ladder(&self, side: Side) -> &PriceLadder {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: Side) -> &mut PriceLadder {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Bid ladder
    #[must_use]
    pub fn bids(&self) -> &PriceLadder {
        &self.bids
    }

    /// Ask ladder
    #[must_use]
    pub fn asks(&self) -> &PriceLadder {
        &self.asks
    }

    /// Get the best bid (highest buy price)
    #[must_use]
    pub fn best_bid(&self) -> Option<(Price, Size)> {
        self.bids.best()
    }

    /// Get the best ask (lowest sell price)
    #[must_use]
    pub fn best_ask(&self) -> Option<(Price, Size)> {
        self.asks.best()
    }

    /// Average of best bid and best ask
    ///
    /// `None` if either side is empty or the sum overflows.
    #[must_use]
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => bid
                .checked_add(ask)
                .and_then(|sum| sum.checked_div(Decimal::TWO)),
            _ => None,
        }
    }

    /// Best ask minus best bid
    ///
    /// `None` if either side is empty or the difference overflows.
    #[must_use]
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => ask.checked_sub(bid),
            _ => None,
        }
    }

    /// Check if the book is crossed (best bid >= best ask)
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => bid >= ask,
            _ => false,
        }
    }

    /// Get the top N bid levels, best first
    #[must_use]
    pub fn top_bids(&self, n: usize) -> Vec<(Price, Size)> {
        self.bids.top(n)
    }

    /// Get the top N ask levels, best first
    #[must_use]
    pub fn top_asks(&self, n: usize) -> Vec<(Price, Size)> {
        self.asks.top(n)
    }

    /// Check if the orderbook is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Get the number of price levels as `(bids, asks)`
    #[must_use]
    pub fn num_levels(&self) -> (usize, usize) {
        (self.bids.len(), self.asks.len())
    }
}
