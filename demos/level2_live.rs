//! Live level-2 feed - streams a bounded order book and prints the top levels
//!
//! Usage:
//!   cargo run --example level2_live
//!
//! Optional:
//!   GDAX_FEED_PRODUCT=BTC-USD  # Product to track (default: BTC-EUR)
//!   GDAX_FEED_DEPTH=10         # Levels kept per side (default: 10, 0 = full depth)
//!   GDAX_FEED_SECONDS=30       # How long to run (default: 30)

use std::time::Duration;

use gdax_feed::{Config, FeedController};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gdax_feed=info".parse()?),
        )
        .init();

    let product = std::env::var("GDAX_FEED_PRODUCT").unwrap_or_else(|_| "BTC-EUR".to_string());
    let depth = match std::env::var("GDAX_FEED_DEPTH") {
        Ok(d) => d.parse::<usize>()?,
        Err(_) => 10,
    };
    let seconds = match std::env::var("GDAX_FEED_SECONDS") {
        Ok(s) => s.parse::<u64>()?,
        Err(_) => 30,
    };

    println!("=== Level-2 Live Feed: {} ===\n", product);

    let config = Config::new([product.clone()]).with_depth((depth > 0).then_some(depth));
    let mut feed = FeedController::connect(config).await?;
    let view = feed.book_view();

    let feed_task = tokio::spawn(async move {
        let result = feed.start().await;
        (feed, result)
    });

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    for _ in 0..seconds {
        ticker.tick().await;
        let Some(book) = view.get(&product) else {
            println!("waiting for snapshot...");
            continue;
        };

        println!(
            "mid {:>12} | spread {:>8} | levels {:?}",
            book.mid_price().map(|p| p.to_string()).unwrap_or_default(),
            book.spread().map(|p| p.to_string()).unwrap_or_default(),
            book.num_levels()
        );
        for ((bid, bid_size), (ask, ask_size)) in book.top_bids(5).into_iter().zip(book.top_asks(5)) {
            println!("  {:>14} @ {:<12} | {:>14} @ {:<12}", bid_size, bid, ask_size, ask);
        }
    }

    // The receive loop only returns on unsubscribe ack or session failure
    feed_task.abort();
    match feed_task.await {
        Ok((_, Err(e))) => eprintln!("feed ended with error: {}", e),
        Ok((_, Ok(()))) => println!("feed stopped"),
        Err(_) => println!("done"),
    }

    Ok(())
}
