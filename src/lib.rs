//! # gdax-feed
//!
//! A streaming level-2 market data client for the GDAX websocket feed.
//!
//! ## Features
//!
//! - **WebSocket Client** - Subscribe/unsubscribe lifecycle over one session
//! - **Local Order Book** - Snapshot plus in-order diffs, exact decimal prices
//! - **Bounded Depth** - Optionally keep only the N best levels per side
//! - **Async/Await** - Built on Tokio
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gdax_feed::{Config, FeedController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gdax_feed::Error> {
//!     // Track the 10 best levels per side of BTC-EUR
//!     let config = Config::new(["BTC-EUR"]).with_depth(Some(10));
//!     let mut feed = FeedController::connect(config).await?;
//!     let view = feed.book_view();
//!
//!     tokio::spawn(async move { feed.start().await });
//!
//!     // Later, from any task
//!     if let Some(book) = view.get("BTC-EUR") {
//!         println!("spread: {:?}", book.spread());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Delivery Model
//!
//! Messages are processed one at a time, in arrival order, by a single
//! loop. The book is only correct if the transport delivers each message
//! exactly once and in order; gaps and duplicates are not detected.
//!
//! ## Architecture
//!
//! This crate is organized into several modules:
//!
//! - [`client`] - Transport seam, WebSocket session and feed controller
//! - [`types`] - Wire messages and book side
//! - [`orderbook`] - Price ladders and order books
//! - [`config`] - Endpoint, products, channels and depth
//! - [`error`] - Error types for the crate

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod orderbook;
pub mod types;

// Re-export main types at crate root for convenience
pub use client::{FeedController, FeedState};
pub use config::Config;
pub use error::Error;
pub use orderbook::{BookView, OrderBook, PriceLadder};

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
