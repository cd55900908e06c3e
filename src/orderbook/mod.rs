//! Local order book mirror.
//!
//! This module provides:
//!
//! - [`PriceLadder`] - one side of a book, optionally bounded to the best N levels
//! - [`OrderBook`] - bid and ask ladders for one product
//! - [`BookView`] - read-only copies of books for other tasks
//!
//! # Example
//!
//! ```rust
//! use std::num::NonZeroUsize;
//!
//! use gdax_feed::orderbook::OrderBook;
//! use gdax_feed::types::messages::{L2Change, LevelQuote};
//!
//! let bids = [LevelQuote::new("5.0", "100"), LevelQuote::new("12.5", "2.123")];
//! let (mut book, _) = OrderBook::from_snapshot("BTC-EUR", NonZeroUsize::new(10), &bids, &[]);
//!
//! book.apply_diff(&[L2Change::new("buy", "12.5", "0")]);
//!
//! if let Some((price, size)) = book.best_bid() {
//!     println!("Best bid: {} @ {}", size, price);
//! }
//! ```

pub mod book;
pub mod ladder;
pub mod view;

pub use book::{ApplyReport, OrderBook};
pub use ladder::{PriceLadder, UpdateOutcome};
pub use view::BookView;
