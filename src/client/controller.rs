//! Feed controller: subscription lifecycle and the receive/dispatch loop.
//!
//! [`FeedController`] owns the transport session, the subscription state and
//! one [`OrderBook`] per product. It is the only writer of those books.
//!
//! # Example
//!
//! ```rust,no_run
//! use gdax_feed::{Config, FeedController};
//!
//! # async fn example() -> gdax_feed::Result<()> {
//! let config = Config::new(["BTC-EUR"]).with_depth(Some(10));
//! let mut feed = FeedController::connect(config).await?;
//!
//! // Sends the subscribe request, then receives until unsubscribed or the
//! // session fails
//! feed.start().await?;
//! # Ok(())
//! # }
//! ```

use std::num::NonZeroUsize;

use rustc_hash::FxHashMap;
use tracing::{debug, error, info, warn};

use super::transport::TransportSession;
use super::websocket::WebSocketTransport;
use crate::config::Config;
use crate::error::Error;
use crate::orderbook::{BookView, OrderBook};
use crate::types::messages::{ChannelSpec, FeedCommand, FeedMessage};

/// Subscription state of a [`FeedController`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// No transport attached
    Idle,
    /// Transport attached, nothing sent yet
    Connected,
    /// Subscribe request sent, waiting for the acknowledgement
    Pending,
    /// Acknowledged; waiting for a snapshot
    Subscribed,
    /// At least one book is live
    Running,
    /// Unsubscribe request sent
    Unsubscribing,
    /// Receive failed; cleanup in progress
    Errored,
    /// Loop finished
    Stopped,
}

/// Drives one feed session and maintains the local books
///
/// # Thread Safety
///
/// Not internally synchronized. Run the controller on one task; share books
/// with other tasks through [`FeedController::book_view`].
#[derive(Debug)]
pub struct FeedController<T> {
    config: Config,
    depth: Option<NonZeroUsize>,
    transport: Option<T>,
    state: FeedState,
    /// Products and channels of the last subscribe request
    subscription: Option<(Vec<String>, Vec<String>)>,
    books: FxHashMap<String, OrderBook>,
    view: Option<BookView>,
}

impl FeedController<WebSocketTransport> {
    /// Validate `config` and open a WebSocket session to its endpoint
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the configuration is invalid
    /// - [`Error::Connection`] if the session cannot be established; there is
    ///   no retry
    pub async fn connect(config: Config) -> Result<Self, Error> {
        config.validate()?;
        info!(endpoint = %config.endpoint(), "connecting");
        let transport = WebSocketTransport::connect(config.endpoint()).await?;
        info!("connected");
        Self::with_transport(config, transport)
    }
}

impl<T: TransportSession> FeedController<T> {
    /// Create a controller with no transport
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            depth: config.depth().and_then(NonZeroUsize::new),
            config,
            transport: None,
            state: FeedState::Idle,
            subscription: None,
            books: FxHashMap::default(),
            view: None,
        })
    }

    /// Create a controller over an already open session
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_transport(config: Config, transport: T) -> Result<Self, Error> {
        let mut controller = Self::new(config)?;
        controller.attach(transport);
        Ok(controller)
    }

    /// Attach an open session, replacing any previous one
    pub fn attach(&mut self, transport: T) {
        self.transport = Some(transport);
        self.state = FeedState::Connected;
    }

    /// Current subscription state
    pub fn state(&self) -> FeedState {
        self.state
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The attached transport, if any
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// Current book for `product_id`
    pub fn book(&self, product_id: &str) -> Option<&OrderBook> {
        self.books.get(product_id)
    }

    /// Handle to read-only copies of the books
    ///
    /// Publishing starts with the first call; the current books are
    /// published immediately.
    pub fn book_view(&mut self) -> BookView {
        if let Some(view) = &self.view {
            return view.clone();
        }
        let view = BookView::new();
        for book in self.books.values() {
            view.publish(book);
        }
        self.view = Some(view.clone());
        view
    }

    fn transport_mut(&mut self) -> Result<&mut T, Error> {
        self.transport.as_mut().ok_or(Error::NotConnected)
    }

    async fn send_command(&mut self, cmd: FeedCommand) -> Result<(), Error> {
        let json = cmd.to_json()?;
        self.transport_mut()?.send(json).await
    }

    /// Request `channels` for `product_ids`
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] without a transport, or the transport's
    /// send error.
    pub async fn subscribe(
        &mut self,
        product_ids: Vec<String>,
        channels: Vec<String>,
    ) -> Result<(), Error> {
        self.send_command(FeedCommand::Subscribe {
            product_ids: product_ids.clone(),
            channels: channels.clone(),
        })
        .await?;
        info!(products = ?product_ids, channels = ?channels, "subscribe sent");
        self.subscription = Some((product_ids, channels));
        self.state = FeedState::Pending;
        Ok(())
    }

    /// Withdraw the last subscription
    ///
    /// Uses the configured products and channels if nothing was subscribed.
    /// Harmless when already unsubscribed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] without a transport, or the transport's
    /// send error.
    pub async fn unsubscribe(&mut self) -> Result<(), Error> {
        let (product_ids, channels) = self.subscription.clone().unwrap_or_else(|| {
            (
                self.config.product_ids().to_vec(),
                self.config.channels().to_vec(),
            )
        });
        self.send_command(FeedCommand::Unsubscribe {
            product_ids,
            channels,
        })
        .await?;
        info!("unsubscribe sent");
        self.state = FeedState::Unsubscribing;
        Ok(())
    }

    /// Subscribe with the configured products and channels, then [`run`](Self::run)
    ///
    /// # Errors
    ///
    /// See [`subscribe`](Self::subscribe) and [`run`](Self::run).
    pub async fn start(&mut self) -> Result<(), Error> {
        let product_ids = self.config.product_ids().to_vec();
        let channels = self.config.channels().to_vec();
        self.subscribe(product_ids, channels).await?;
        self.run().await
    }

    /// Receive and dispatch messages until the feed stops.
    ///
    /// The state is checked once per received message. Undecodable messages
    /// and protocol violations are logged and dropped. A failed or ended
    /// receive moves to [`FeedState::Errored`], sends a best-effort
    /// unsubscribe, stops, and returns the receive error.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if no transport is attached
    /// - the transport error that ended the loop
    pub async fn run(&mut self) -> Result<(), Error> {
        while self.state != FeedState::Stopped {
            let received = self.transport_mut()?.recv().await;
            match received {
                Some(Ok(text)) => self.handle_text(&text),
                Some(Err(e)) => return self.fail(e).await,
                None => return self.fail(Error::ConnectionClosed).await,
            }
        }
        info!("feed stopped");
        Ok(())
    }

    fn handle_text(&mut self, text: &str) {
        match FeedMessage::decode(text) {
            Ok(message) => {
                if let Err(e) = self.dispatch(message) {
                    warn!(error = %e, "message discarded");
                }
            }
            Err(e) => warn!(error = %e, "undecodable message dropped"),
        }
    }

    async fn fail(&mut self, error: Error) -> Result<(), Error> {
        error!(error = %error, "receive failed, stopping feed");
        self.state = FeedState::Errored;
        if let Err(e) = self.unsubscribe().await {
            debug!(error = %e, "best-effort unsubscribe failed");
        }
        self.state = FeedState::Stopped;
        Err(error)
    }

    /// Route one decoded message.
    ///
    /// Performs no I/O. Snapshots replace the product's book, diffs mutate
    /// it, acknowledgements move the subscription state; everything else is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] for a diff whose product has no snapshot
    /// yet. The message is dropped and no book is touched.
    pub fn dispatch(&mut self, message: FeedMessage) -> Result<(), Error> {
        debug!(kind = message.kind(), "dispatch");
        match message {
            FeedMessage::Subscriptions(ack) => {
                if ack.channels.is_empty() {
                    info!("unsubscribed");
                    self.state = FeedState::Stopped;
                } else {
                    let channels: Vec<&str> = ack.channels.iter().map(ChannelSpec::name).collect();
                    info!(channels = ?channels, "subscribed");
                    self.state = FeedState::Subscribed;
                }
            }
            FeedMessage::Snapshot(snapshot) => {
                let (book, report) = OrderBook::from_snapshot(
                    snapshot.product_id,
                    self.depth,
                    &snapshot.bids,
                    &snapshot.asks,
                );
                let (bids, asks) = book.num_levels();
                info!(
                    product_id = %book.product_id(),
                    bids,
                    asks,
                    rejected = report.rejected.len(),
                    "snapshot applied"
                );
                if let Some(view) = &self.view {
                    view.publish(&book);
                }
                self.books.insert(book.product_id().to_string(), book);
                if self.state == FeedState::Subscribed {
                    self.state = FeedState::Running;
                }
            }
            FeedMessage::L2Update(update) => {
                let book = self.books.get_mut(&update.product_id).ok_or_else(|| {
                    Error::Protocol(format!(
                        "l2update for {:?} before any snapshot",
                        update.product_id
                    ))
                })?;
                let report = book.apply_diff(&update.changes);
                if report.applied > 0 {
                    if let Some(view) = &self.view {
                        view.publish(book);
                    }
                }
            }
            FeedMessage::Heartbeat(heartbeat) => {
                debug!(
                    product_id = ?heartbeat.product_id,
                    sequence = ?heartbeat.sequence,
                    "heartbeat"
                );
            }
            FeedMessage::Error(err) => {
                error!(message = %err.message, reason = ?err.reason, "feed reported an error");
            }
            FeedMessage::Unknown { kind } => {
                warn!(kind = %kind, "ignoring unknown message kind");
            }
        }
        Ok(())
    }

    /// Close the session and stop
    ///
    /// # Errors
    ///
    /// Returns the transport's close error; the controller is stopped and
    /// detached either way.
    pub async fn close(&mut self) -> Result<(), Error> {
        self.state = FeedState::Stopped;
        if let Some(mut transport) = self.transport.take() {
            transport.close().await?;
        }
        Ok(())
    }
}
