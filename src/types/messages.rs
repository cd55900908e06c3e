//! WebSocket message types.
//!
//! This module contains the commands sent to the feed and the messages
//! received from it. Inbound messages are decoded once, at the boundary,
//! into the [`FeedMessage`] tagged union; anything past this point works
//! with typed records only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// WebSocket command sent to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedCommand {
    /// Subscribe to channels
    Subscribe {
        /// Products to subscribe to
        product_ids: Vec<String>,
        /// Channels to enable
        channels: Vec<String>,
    },
    /// Unsubscribe from channels
    Unsubscribe {
        /// Products to unsubscribe from
        product_ids: Vec<String>,
        /// Channels to disable
        channels: Vec<String>,
    },
}

impl FeedCommand {
    /// Encode the command as a JSON text frame
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Message received from the feed, keyed by its `type` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMessage {
    /// Subscription acknowledgement (`subscriptions`)
    Subscriptions(SubscriptionsMsg),
    /// Full book for one product (`snapshot`)
    Snapshot(SnapshotMsg),
    /// Incremental changes for one product (`l2update`)
    L2Update(L2UpdateMsg),
    /// Keep-alive (`heartbeat`)
    Heartbeat(HeartbeatMsg),
    /// Exchange-reported error (`error`)
    Error(ErrorMsg),
    /// Any other kind; carried so it can be logged
    Unknown {
        /// The `type` value as received
        kind: String,
    },
}

impl FeedMessage {
    /// Decode a text frame
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the frame is not JSON or a known kind does not
    ///   match its schema
    /// - [`Error::Protocol`] if the `type` field is missing or not a string
    pub fn decode(text: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(text)?;
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => {
                return Err(Error::Protocol(format!("non-string message type {other}")));
            }
            None => return Err(Error::Protocol("message has no type".into())),
        };

        let message = match kind.as_str() {
            "subscriptions" => FeedMessage::Subscriptions(serde_json::from_value(value)?),
            "snapshot" => FeedMessage::Snapshot(serde_json::from_value(value)?),
            "l2update" => FeedMessage::L2Update(serde_json::from_value(value)?),
            "heartbeat" => FeedMessage::Heartbeat(serde_json::from_value(value)?),
            "error" => FeedMessage::Error(serde_json::from_value(value)?),
            _ => FeedMessage::Unknown { kind },
        };
        Ok(message)
    }

    /// The wire `type` of this message
    pub fn kind(&self) -> &str {
        match self {
            FeedMessage::Subscriptions(_) => "subscriptions",
            FeedMessage::Snapshot(_) => "snapshot",
            FeedMessage::L2Update(_) => "l2update",
            FeedMessage::Heartbeat(_) => "heartbeat",
            FeedMessage::Error(_) => "error",
            FeedMessage::Unknown { kind } => kind,
        }
    }
}

/// Subscription acknowledgement
///
/// Lists every channel still active on the session. An empty list means
/// the last unsubscribe took effect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubscriptionsMsg {
    /// Active channels
    pub channels: Vec<ChannelSpec>,
}

/// One channel in a subscription acknowledgement
///
/// The feed reports channels either by name or as an object carrying the
/// products the channel is enabled for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChannelSpec {
    /// Bare channel name
    Name(String),
    /// Channel with its products
    Detailed {
        /// Channel name
        name: String,
        /// Products the channel covers
        #[serde(default)]
        product_ids: Vec<String>,
    },
}

impl ChannelSpec {
    /// Channel name
    pub fn name(&self) -> &str {
        match self {
            ChannelSpec::Name(name) => name,
            ChannelSpec::Detailed { name, .. } => name,
        }
    }
}

/// A `[price, size]` pair as sent by the feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LevelQuote(pub String, pub String);

impl LevelQuote {
    /// Build a quote from string slices
    pub fn new(price: &str, size: &str) -> Self {
        Self(price.to_string(), size.to_string())
    }
}

/// Orderbook snapshot
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapshotMsg {
    /// Product the snapshot belongs to
    #[serde(default)]
    pub product_id: String,
    /// Bid levels: [[price, size], ...]
    pub bids: Vec<LevelQuote>,
    /// Ask levels: [[price, size], ...]
    pub asks: Vec<LevelQuote>,
}

/// A `[side, price, size]` change as sent by the feed
///
/// The side stays a string here so that one bad entry can be rejected on
/// its own without failing the whole message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct L2Change(pub String, pub String, pub String);

impl L2Change {
    /// Build a change from string slices
    pub fn new(side: &str, price: &str, size: &str) -> Self {
        Self(side.to_string(), price.to_string(), size.to_string())
    }
}

/// Level-2 update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct L2UpdateMsg {
    /// Product the update belongs to
    #[serde(default)]
    pub product_id: String,
    /// Changes, to be applied in order
    pub changes: Vec<L2Change>,
    /// Exchange timestamp
    #[serde(default)]
    pub time: Option<String>,
}

/// Heartbeat
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeartbeatMsg {
    /// Feed sequence number
    #[serde(default)]
    pub sequence: Option<u64>,
    /// Last trade id seen on the product
    #[serde(default)]
    pub last_trade_id: Option<u64>,
    /// Product id
    #[serde(default)]
    pub product_id: Option<String>,
    /// Exchange timestamp
    #[serde(default)]
    pub time: Option<String>,
}

/// Error reported by the exchange
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorMsg {
    /// Error message
    #[serde(default)]
    pub message: String,
    /// Additional detail
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_command_serialization() {
        let cmd = FeedCommand::Subscribe {
            product_ids: vec!["BTC-EUR".to_string()],
            channels: vec!["heartbeat".to_string(), "level2".to_string()],
        };

        let json: Value = serde_json::from_str(&cmd.to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "subscribe");
        assert_eq!(json["product_ids"][0], "BTC-EUR");
        assert_eq!(json["channels"][1], "level2");
    }

    #[test]
    fn test_unsubscribe_command_serialization() {
        let cmd = FeedCommand::Unsubscribe {
            product_ids: vec!["BTC-EUR".to_string()],
            channels: vec!["level2".to_string()],
        };
        let json = cmd.to_json().unwrap();
        assert!(json.contains(r#""type":"unsubscribe""#));
    }

    #[test]
    fn test_snapshot_deserialization() {
        let json = r#"{
            "type": "snapshot",
            "product_id": "BTC-EUR",
            "bids": [["5.0", "100"], ["12.5", "2.123"]],
            "asks": [["13.0", "1"]]
        }"#;

        match FeedMessage::decode(json).unwrap() {
            FeedMessage::Snapshot(snapshot) => {
                assert_eq!(snapshot.product_id, "BTC-EUR");
                assert_eq!(snapshot.bids.len(), 2);
                assert_eq!(snapshot.bids[1], LevelQuote::new("12.5", "2.123"));
                assert_eq!(snapshot.asks[0].0, "13.0");
            }
            other => panic!("Expected Snapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_l2update_deserialization() {
        let json = r#"{
            "type": "l2update",
            "product_id": "BTC-EUR",
            "time": "2018-01-15T12:00:00.000000Z",
            "changes": [["buy", "5.0", "0"], ["sell", "13.0", "0.5"]]
        }"#;

        let msg = FeedMessage::decode(json).unwrap();
        assert_eq!(msg.kind(), "l2update");
        match msg {
            FeedMessage::L2Update(update) => {
                assert_eq!(update.changes.len(), 2);
                assert_eq!(update.changes[0], L2Change::new("buy", "5.0", "0"));
                assert!(update.time.is_some());
            }
            other => panic!("Expected L2Update, got {other:?}"),
        }
    }

    #[test]
    fn test_subscriptions_channel_forms() {
        let json = r#"{
            "type": "subscriptions",
            "channels": [
                "heartbeat",
                {"name": "level2", "product_ids": ["BTC-EUR"]}
            ]
        }"#;

        match FeedMessage::decode(json).unwrap() {
            FeedMessage::Subscriptions(ack) => {
                let names: Vec<&str> = ack.channels.iter().map(ChannelSpec::name).collect();
                assert_eq!(names, ["heartbeat", "level2"]);
            }
            other => panic!("Expected Subscriptions, got {other:?}"),
        }

        match FeedMessage::decode(r#"{"type":"subscriptions","channels":[]}"#).unwrap() {
            FeedMessage::Subscriptions(ack) => assert!(ack.channels.is_empty()),
            other => panic!("Expected Subscriptions, got {other:?}"),
        }
    }

    #[test]
    fn test_heartbeat_and_error() {
        let heartbeat = r#"{"type":"heartbeat","sequence":90,"last_trade_id":20,"product_id":"BTC-EUR","time":"2014-11-07T08:19:28.464459Z"}"#;
        match FeedMessage::decode(heartbeat).unwrap() {
            FeedMessage::Heartbeat(hb) => assert_eq!(hb.sequence, Some(90)),
            other => panic!("Expected Heartbeat, got {other:?}"),
        }

        let error = r#"{"type":"error","message":"Failed to subscribe","reason":"BTC-XYZ is not a valid product"}"#;
        match FeedMessage::decode(error).unwrap() {
            FeedMessage::Error(err) => {
                assert_eq!(err.message, "Failed to subscribe");
                assert!(err.reason.unwrap().contains("BTC-XYZ"));
            }
            other => panic!("Expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_is_a_variant() {
        let msg = FeedMessage::decode(r#"{"type":"ticker","price":"1"}"#).unwrap();
        assert_eq!(
            msg,
            FeedMessage::Unknown {
                kind: "ticker".to_string()
            }
        );
    }

    #[test]
    fn test_decode_failures() {
        assert!(FeedMessage::decode("not json").unwrap_err().is_decode());
        assert!(FeedMessage::decode(r#"{"bids":[]}"#)
            .unwrap_err()
            .is_protocol());
        assert!(FeedMessage::decode(r#"{"type":7}"#).unwrap_err().is_protocol());
        // Known kind with a payload that does not fit its schema
        assert!(FeedMessage::decode(r#"{"type":"snapshot","bids":"nope","asks":[]}"#)
            .unwrap_err()
            .is_decode());
    }

    #[test]
    fn test_ack_without_channels_is_malformed() {
        let err = FeedMessage::decode(r#"{"type":"subscriptions"}"#).unwrap_err();
        assert!(err.is_decode());

        let empty = FeedMessage::decode(r#"{"type":"subscriptions","channels":[]}"#).unwrap();
        assert_eq!(
            empty,
            FeedMessage::Subscriptions(SubscriptionsMsg { channels: vec![] })
        );
    }
}
