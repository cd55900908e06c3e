//! One side of an order book.
//!
//! A [`PriceLadder`] maps price to resting size. By default it mirrors the
//! full depth reported by the exchange. Built with a depth, it keeps only
//! the best `depth` prices and tracks the worst of them in a binary heap so
//! the admission check for a new price is a single peek.
//!
//! Levels are kept in a `BTreeMap` ordered by price, so the best level is
//! read from one end of the map and sorted views need no sort.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::num::NonZeroUsize;

use crate::error::Error;
use crate::types::{parse_decimal, Price, Side, Size};

/// What a single [`PriceLadder::update`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// New price level stored
    Inserted,
    /// Size of an existing level overwritten
    Replaced,
    /// Level removed (size zero)
    Removed,
    /// Size zero for a price the ladder does not hold
    Absent,
    /// New price admitted at capacity; the previous worst level was dropped
    Evicted {
        /// Price that was dropped
        evicted: Price,
    },
    /// New price at capacity that did not beat the worst kept level
    Discarded,
}

impl UpdateOutcome {
    /// `true` if the ladder content changed
    pub fn changed(self) -> bool {
        !matches!(self, UpdateOutcome::Absent | UpdateOutcome::Discarded)
    }
}

/// Heap entry ordered so that the worst price for its side is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WorstFirst {
    price: Price,
    side: Side,
}

impl Ord for WorstFirst {
    fn cmp(&self, other: &Self) -> Ordering {
        // self > other when other is the better price
        self.side.rank(&other.price, &self.price)
    }
}

impl PartialOrd for WorstFirst {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Prices kept by a bounded ladder, worst on top.
#[derive(Debug, Clone)]
struct DepthWindow {
    capacity: NonZeroUsize,
    heap: BinaryHeap<WorstFirst>,
}

impl DepthWindow {
    fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.get()),
        }
    }

    fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity.get()
    }

    fn peek_worst(&self) -> Option<Price> {
        self.heap.peek().map(|entry| entry.price)
    }

    fn push(&mut self, price: Price, side: Side) {
        self.heap.push(WorstFirst { price, side });
    }

    /// Swap the worst kept price for `price`, returning the one dropped.
    fn replace_worst(&mut self, price: Price, side: Side) -> Option<Price> {
        let mut top = self.heap.peek_mut()?;
        let evicted = top.price;
        *top = WorstFirst { price, side };
        Some(evicted)
    }

    // O(depth); only hit when a kept level is cancelled
    fn remove(&mut self, price: &Price) {
        self.heap.retain(|entry| entry.price != *price);
    }

    fn clear(&mut self) {
        self.heap.clear();
    }
}

/// Price-to-size mapping for one side of the book.
///
/// # Invariants
///
/// - No stored level has size zero.
/// - In bounded mode the ladder holds at most `depth` levels, and every
///   held price is at least as good as any price admitted and later evicted.
///
/// # Thread Safety
///
/// Not internally synchronized. The feed controller owns every ladder it
/// mutates; other consumers read cloned copies.
#[derive(Debug, Clone)]
pub struct PriceLadder {
    side: Side,
    levels: BTreeMap<Price, Size>,
    window: Option<DepthWindow>,
}

impl PriceLadder {
    /// Create an unbounded ladder that mirrors full exchange depth
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            window: None,
        }
    }

    /// Create a ladder that keeps only the `depth` best prices
    #[must_use]
    pub fn bounded(side: Side, depth: NonZeroUsize) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            window: Some(DepthWindow::new(depth)),
        }
    }

    /// Create a ladder, bounded when `depth` is `Some`
    #[must_use]
    pub fn with_depth(side: Side, depth: Option<NonZeroUsize>) -> Self {
        match depth {
            Some(depth) => Self::bounded(side, depth),
            None => Self::new(side),
        }
    }

    /// Apply one level change.
    ///
    /// A zero size removes the level; removing a price the ladder does not
    /// hold is a no-op, since the exchange may reference levels that were
    /// already matched or that fell outside the bounded window.
    ///
    /// In bounded mode a new price arriving at capacity must be strictly
    /// better than the worst kept price to be admitted. Otherwise it is
    /// dropped and not remembered.
    pub fn update(&mut self, price: Price, size: Size) -> UpdateOutcome {
        if size.is_zero() {
            return match self.levels.remove(&price) {
                Some(_) => {
                    if let Some(window) = self.window.as_mut() {
                        window.remove(&price);
                    }
                    UpdateOutcome::Removed
                }
                None => UpdateOutcome::Absent,
            };
        }

        if let Some(existing) = self.levels.get_mut(&price) {
            *existing = size;
            return UpdateOutcome::Replaced;
        }

        let side = self.side;
        match self.window.as_mut() {
            None => {
                self.levels.insert(price, size);
                UpdateOutcome::Inserted
            }
            Some(window) if !window.is_full() => {
                window.push(price, side);
                self.levels.insert(price, size);
                UpdateOutcome::Inserted
            }
            Some(window) => match window.peek_worst() {
                Some(worst) if side.is_better(&price, &worst) => {
                    window.replace_worst(price, side);
                    self.levels.remove(&worst);
                    self.levels.insert(price, size);
                    UpdateOutcome::Evicted { evicted: worst }
                }
                _ => UpdateOutcome::Discarded,
            },
        }
    }

    /// Parse a `(price, size)` string pair and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDecimal`] if either string is malformed; the
    /// ladder is left untouched.
    pub fn update_str(&mut self, price: &str, size: &str) -> Result<UpdateOutcome, Error> {
        let price = parse_decimal(price)?;
        let size = parse_decimal(size)?;
        Ok(self.update(price, size))
    }

    /// Side this ladder belongs to
    pub fn side(&self) -> Side {
        self.side
    }

    /// Retention depth, `None` when unbounded
    pub fn depth(&self) -> Option<usize> {
        self.window.as_ref().map(|window| window.capacity.get())
    }

    /// Size resting at `price`
    pub fn get(&self, price: &Price) -> Option<Size> {
        self.levels.get(price).copied()
    }

    /// Whether `price` is held
    pub fn contains(&self, price: &Price) -> bool {
        self.levels.contains_key(price)
    }

    /// Number of price levels held
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the ladder holds no levels
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Best level: highest bid or lowest ask
    pub fn best(&self) -> Option<(Price, Size)> {
        let level = match self.side {
            Side::Buy => self.levels.last_key_value(),
            Side::Sell => self.levels.first_key_value(),
        };
        level.map(|(&p, &s)| (p, s))
    }

    /// Least favorable price held.
    ///
    /// For a bounded ladder this is the admission boundary and is read from
    /// the top of the heap.
    pub fn worst_kept(&self) -> Option<Price> {
        match &self.window {
            Some(window) => window.peek_worst(),
            None => {
                let level = match self.side {
                    Side::Buy => self.levels.first_key_value(),
                    Side::Sell => self.levels.last_key_value(),
                };
                level.map(|(&p, _)| p)
            }
        }
    }

    /// The `n` best levels, best first
    pub fn top(&self, n: usize) -> Vec<(Price, Size)> {
        let levels = self.levels.iter().map(|(&p, &s)| (p, s));
        match self.side {
            Side::Buy => levels.rev().take(n).collect(),
            Side::Sell => levels.take(n).collect(),
        }
    }

    /// All levels, best first
    pub fn levels(&self) -> Vec<(Price, Size)> {
        self.top(self.levels.len())
    }

    /// Iterate over levels in ascending price order
    pub fn iter(&self) -> impl Iterator<Item = (Price, Size)> + '_ {
        self.levels.iter().map(|(&p, &s)| (p, s))
    }

    /// Sum of all resting sizes
    pub fn total_size(&self) -> Size {
        self.levels.values().sum()
    }

    /// Remove every level
    pub fn clear(&mut self) {
        self.levels.clear();
        if let Some(window) = self.window.as_mut() {
            window.clear();
        }
    }
}
