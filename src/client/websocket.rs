//! WebSocket transport for the feed.
//!
//! [`WebSocketTransport`] wraps a `tokio-tungstenite` stream split into a
//! sink and a stream half. It answers pings, skips non-text frames, and
//! reports a close frame as [`Error::ConnectionClosed`].

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;
use url::Url;

use super::transport::TransportSession;
use crate::error::Error;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket session to the feed endpoint
///
/// # Thread Safety
///
/// This client is NOT thread-safe. It is owned by a single
/// [`FeedController`](super::FeedController).
#[derive(Debug)]
pub struct WebSocketTransport {
    write: SplitSink<WsStream, Message>,
    read: SplitStream<WsStream>,
}

impl WebSocketTransport {
    /// Open a session to `endpoint`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the URL is invalid, is not a `ws`/`wss`
    /// URL, or the handshake fails.
    pub async fn connect(endpoint: &str) -> Result<Self, Error> {
        let url = parse_endpoint(endpoint)?;

        let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| Error::Connection(format!("{url}: {e}")))?;
        let (write, read) = ws_stream.split();

        Ok(Self { write, read })
    }
}

impl TransportSession for WebSocketTransport {
    async fn send(&mut self, text: String) -> Result<(), Error> {
        self.write.send(Message::Text(text)).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String, Error>> {
        loop {
            match self.read.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Ping(data)) => {
                    if let Err(e) = self.write.send(Message::Pong(data)).await {
                        return Some(Err(e.into()));
                    }
                }
                Ok(Message::Close(frame)) => {
                    debug!(frame = ?frame, "close frame received");
                    return Some(Err(Error::ConnectionClosed));
                }
                // Binary, Pong, Frame
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }

    async fn close(&mut self) -> Result<(), Error> {
        self.write.close().await?;
        Ok(())
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, Error> {
    let url = Url::parse(endpoint)
        .map_err(|e| Error::Connection(format!("invalid endpoint {endpoint:?}: {e}")))?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(Error::Connection(format!(
            "unsupported endpoint scheme {other:?}"
        ))),
    }
}
