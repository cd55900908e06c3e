//! Configuration for the feed client.
//!
//! This module provides the [`Config`] struct naming the endpoint, the
//! products and channels to subscribe to, and the optional bounded depth
//! used by the price ladders.

use crate::error::Error;

/// Feed environment (production or sandbox)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Production feed
    #[default]
    Production,
    /// Public sandbox feed
    Sandbox,
}

impl Environment {
    /// Get the WebSocket URL
    pub fn websocket_url(&self) -> &'static str {
        match self {
            Environment::Production => "wss://ws-feed.exchange.coinbase.com",
            Environment::Sandbox => "wss://ws-feed-public.sandbox.exchange.coinbase.com",
        }
    }
}

/// Channels enabled when none are given
pub const DEFAULT_CHANNELS: [&str; 2] = ["heartbeat", "level2"];

/// Configuration for the feed client
///
/// # Example
///
/// ```rust
/// use gdax_feed::Config;
/// use gdax_feed::config::Environment;
///
/// let config = Config::new(["BTC-EUR"]);
///
/// // Use the sandbox feed and keep only the 10 best levels per side
/// let sandbox = Config::new(["BTC-USD"])
///     .with_environment(Environment::Sandbox)
///     .with_depth(Some(10));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// WebSocket endpoint URL
    endpoint: String,

    /// Instruments to track
    product_ids: Vec<String>,

    /// Feed channels to enable
    channels: Vec<String>,

    /// Price levels retained per side (`None` keeps full depth)
    depth: Option<usize>,
}

impl Config {
    /// Create a configuration for the given products with default channels
    pub fn new<I, S>(product_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoint: Environment::default().websocket_url().to_string(),
            product_ids: product_ids.into_iter().map(Into::into).collect(),
            channels: DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect(),
            depth: None,
        }
    }

    /// Point at one of the known environments
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.endpoint = environment.websocket_url().to_string();
        self
    }

    /// Set an explicit endpoint URL
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replace the channel list
    #[must_use]
    pub fn with_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channels = channels.into_iter().map(Into::into).collect();
        self
    }

    /// Keep only the `depth` best levels per side (`None` for full depth)
    #[must_use]
    pub fn with_depth(mut self, depth: Option<usize>) -> Self {
        self.depth = depth;
        self
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the product ids
    pub fn product_ids(&self) -> &[String] {
        &self.product_ids
    }

    /// Get the channels
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Get the bounded depth, if any
    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    /// Check that the configuration can drive a subscription
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty product or channel list, or a
    /// zero depth.
    pub fn validate(&self) -> Result<(), Error> {
        if self.product_ids.is_empty() {
            return Err(Error::Config("at least one product id is required".into()));
        }
        if self.channels.is_empty() {
            return Err(Error::Config("at least one channel is required".into()));
        }
        if self.depth == Some(0) {
            return Err(Error::Config("depth must be greater than zero".into()));
        }
        Ok(())
    }
}
