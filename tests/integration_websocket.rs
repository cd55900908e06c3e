//! Integration tests against the live feed.
//!
//! These tests open a real WebSocket session and are skipped unless
//! `GDAX_FEED_LIVE` is set.
//!
//! # Running
//!
//! ```bash
//! GDAX_FEED_LIVE=1 cargo test --test integration_websocket
//! ```
//!
//! Optional:
//!   GDAX_FEED_ENDPOINT=wss://...  # Override the production endpoint
//!   GDAX_FEED_PRODUCT=BTC-USD     # Product to track (default: BTC-EUR)

use std::time::Duration;

use gdax_feed::client::{TransportSession, WebSocketTransport};
use gdax_feed::types::FeedMessage;
use gdax_feed::{Config, FeedController, FeedState};
use tokio::time::timeout;

/// Helper to create a config from environment variables
fn create_config() -> Option<Config> {
    std::env::var("GDAX_FEED_LIVE").ok()?;
    let product = std::env::var("GDAX_FEED_PRODUCT").unwrap_or_else(|_| "BTC-EUR".to_string());
    let mut config = Config::new([product]);
    if let Ok(endpoint) = std::env::var("GDAX_FEED_ENDPOINT") {
        config = config.with_endpoint(endpoint);
    }
    Some(config)
}

/// Skip test if live testing is not enabled
macro_rules! require_config {
    () => {
        match create_config() {
            Some(c) => c,
            None => {
                eprintln!("Skipping test: GDAX_FEED_LIVE not set");
                return;
            }
        }
    };
}

#[tokio::test]
async fn test_websocket_connect() {
    let config = require_config!();

    let result = WebSocketTransport::connect(config.endpoint()).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result);

    let mut ws = result.unwrap();
    println!("WebSocket connected successfully");

    let close_result = ws.close().await;
    assert!(close_result.is_ok(), "Failed to close: {:?}", close_result);
}

#[tokio::test]
async fn test_snapshot_then_updates() {
    let config = require_config!();
    let product = config.product_ids()[0].clone();

    let mut ws = match WebSocketTransport::connect(config.endpoint()).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return;
        }
    };

    let subscribe = format!(
        r#"{{"type":"subscribe","product_ids":["{product}"],"channels":["level2"]}}"#
    );
    ws.send(subscribe).await.expect("Failed to subscribe");

    let result = timeout(Duration::from_secs(10), async {
        let mut received_snapshot = false;
        let mut update_count = 0;

        while let Some(frame) = ws.recv().await {
            let text = match frame {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    break;
                }
            };
            match FeedMessage::decode(&text) {
                Ok(FeedMessage::Snapshot(snapshot)) => {
                    println!(
                        "Snapshot for {}: {} bids, {} asks",
                        snapshot.product_id,
                        snapshot.bids.len(),
                        snapshot.asks.len()
                    );
                    received_snapshot = true;
                }
                Ok(FeedMessage::L2Update(_)) => {
                    update_count += 1;
                    if update_count >= 5 {
                        break;
                    }
                }
                Ok(msg) => println!("Other: {}", msg.kind()),
                Err(e) => eprintln!("Undecodable: {}", e),
            }
        }

        received_snapshot
    })
    .await;

    match result {
        Ok(received) => assert!(received, "Did not receive a snapshot"),
        Err(_) => println!("Timeout reached"),
    }

    let _ = ws.close().await;
}

#[tokio::test]
async fn test_controller_builds_bounded_book() {
    let config = require_config!();
    let config = config.with_depth(Some(5));
    let product = config.product_ids()[0].clone();

    let mut feed = match FeedController::connect(config).await {
        Ok(feed) => feed,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return;
        }
    };
    let view = feed.book_view();

    let _ = timeout(Duration::from_secs(10), feed.start()).await;

    if let Some(book) = view.get(&product) {
        println!(
            "best bid {:?}, best ask {:?}",
            book.best_bid(),
            book.best_ask()
        );
        let (bids, asks) = book.num_levels();
        assert!(bids <= 5 && asks <= 5);
        assert!(!book.is_crossed());
    } else {
        println!("No snapshot within the timeout");
    }

    assert_ne!(feed.state(), FeedState::Idle);
    let _ = feed.close().await;
}
