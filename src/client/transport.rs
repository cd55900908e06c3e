//! Transport seam between the feed controller and the network.
//!
//! The controller only needs to send a text frame, wait for the next text
//! frame, and close the session. [`WebSocketTransport`](super::WebSocketTransport)
//! is the production implementation; tests drive the controller with
//! scripted in-memory sessions.

use std::future::Future;

use crate::error::Error;

/// A persistent, ordered, text-framed session
///
/// Implementations deliver each inbound frame exactly once and in order;
/// the controller does not detect gaps or duplicates.
pub trait TransportSession: Send {
    /// Send one text frame
    fn send(&mut self, text: String) -> impl Future<Output = Result<(), Error>> + Send;

    /// Wait for the next text frame
    ///
    /// Returns `None` once the session has ended. This is the only call on
    /// which the controller suspends; closing the session unblocks it.
    fn recv(&mut self) -> impl Future<Output = Option<Result<String, Error>>> + Send;

    /// Close the session
    fn close(&mut self) -> impl Future<Output = Result<(), Error>> + Send;
}
