//! Error types for the gdax-feed crate.
//!
//! Errors fall into four families:
//!
//! - **Connection** - the transport session could not be established. Fatal.
//! - **Transport** - the session failed while sending or receiving.
//! - **Decode** - a message or a price/size string could not be parsed.
//! - **Protocol** - a message was well-formed but made no sense here
//!   (unknown side, diff before snapshot, missing `type`).
//!
//! Decode and protocol errors are recovered locally by the feed controller;
//! they are returned from lower layers so callers can log or count them.

use thiserror::Error;

/// The main error type for this crate
#[derive(Debug, Error)]
pub enum Error {
    /// Transport session could not be established
    #[error("connection error: {0}")]
    Connection(String),

    /// WebSocket failure while sending or receiving
    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// WebSocket connection closed by the peer
    #[error("connection closed")]
    ConnectionClosed,

    /// Operation requires a transport session that was never attached
    #[error("not connected")]
    NotConnected,

    /// JSON serialization/deserialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Price or size string is not a valid decimal
    #[error("invalid decimal {value:?}: {source}")]
    InvalidDecimal {
        /// The offending string
        value: String,
        /// Parser error
        #[source]
        source: rust_decimal::Error,
    },

    /// Unexpected or missing discriminator value
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Message or field could not be decoded into the expected schema
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Json(_) | Error::InvalidDecimal { .. })
    }

    /// Well-formed input that violated the feed protocol
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Protocol(_))
    }

    /// Failure of the underlying session (including a peer close)
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::ConnectionClosed)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_invalid_decimal_display() {
        let source = Decimal::from_str("12.x").unwrap_err();
        let err = Error::InvalidDecimal {
            value: "12.x".to_string(),
            source,
        };
        assert!(err.to_string().contains("12.x"));
        assert!(err.is_decode());
        assert!(!err.is_protocol());
    }

    #[test]
    fn test_protocol_error() {
        let err = Error::Protocol("unknown side \"hold\"".to_string());
        assert!(err.is_protocol());
        assert!(err.to_string().contains("hold"));
    }

    #[test]
    fn test_json_error_is_decode() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.is_decode());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_connection_closed_is_transport() {
        assert!(Error::ConnectionClosed.is_transport());
        assert!(!Error::NotConnected.is_transport());
    }
}
