//! Feed client: transport and controller.
//!
//! This module contains:
//!
//! - [`transport`] - the session trait the controller talks through
//! - [`websocket`] - WebSocket implementation of that trait
//! - [`controller`] - subscription state machine and dispatch loop

pub mod controller;
pub mod transport;
pub mod websocket;

pub use controller::{FeedController, FeedState};
pub use transport::TransportSession;
pub use websocket::WebSocketTransport;
