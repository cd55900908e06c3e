//! Read-only access to books owned by the feed controller.
//!
//! The controller is the only writer of its books. When a view is
//! requested it publishes an owned copy of a product's book after each
//! change; readers clone out of the view and never see the live structure.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::OrderBook;

/// Cloneable handle to the latest published copy of each book
///
/// # Example
///
/// ```rust,no_run
/// use gdax_feed::{Config, FeedController};
///
/// # async fn example() -> gdax_feed::Result<()> {
/// let mut feed = FeedController::connect(Config::new(["BTC-EUR"])).await?;
/// let view = feed.book_view();
///
/// tokio::spawn(async move { feed.run().await });
///
/// if let Some(book) = view.get("BTC-EUR") {
///     println!("best bid: {:?}", book.best_bid());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BookView {
    books: Arc<RwLock<FxHashMap<String, OrderBook>>>,
}

impl BookView {
    /// Create an empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the latest published book for `product_id`
    pub fn get(&self, product_id: &str) -> Option<OrderBook> {
        self.books.read().get(product_id).cloned()
    }

    /// Products with a published book
    pub fn product_ids(&self) -> Vec<String> {
        self.books.read().keys().cloned().collect()
    }

    /// Number of published books
    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    /// Check if nothing has been published yet
    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }

    pub(crate) fn publish(&self, book: &OrderBook) {
        self.books
            .write()
            .insert(book.product_id().to_string(), book.clone());
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::types::Side;

    #[test]
    fn test_publish_is_a_copy() {
        let view = BookView::new();
        let mut book = OrderBook::new("BTC-EUR", None);
        book.update(Side::Buy, dec!(10), dec!(1));
        view.publish(&book);

        book.update(Side::Buy, dec!(11), dec!(1));

        let published = view.get("BTC-EUR").unwrap();
        assert_eq!(published.best_bid(), Some((dec!(10), dec!(1))));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let view = BookView::new();
        let reader = view.clone();
        view.publish(&OrderBook::new("ETH-EUR", None));

        assert_eq!(reader.product_ids(), vec!["ETH-EUR".to_string()]);
        assert!(!reader.is_empty());
        assert!(reader.get("BTC-EUR").is_none());
    }
}
