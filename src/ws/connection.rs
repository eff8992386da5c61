//! WebSocket connection to the event stream.
//!
//! [`connect`] performs the handshake. [`run_connection`] owns the socket
//! afterwards: it decodes every text frame and forwards the result, in
//! arrival order, to the single consumer on the other end of the channel.

use std::time::Duration;

use futures_util::{SinkExt, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::messages::{CloseReason, FeedMessage};
use crate::config::FeedConfig;
use crate::domain::decode_event;
use crate::error::FeedError;

/// Client side of an established event-stream connection.
pub type FeedStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a local close waits for the server to acknowledge.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Opens the WebSocket connection described by `config`.
///
/// # Errors
///
/// - [`FeedError::InvalidEndpoint`] if the endpoint is not a WebSocket URL.
/// - [`FeedError::Connect`] if the handshake fails.
/// - [`FeedError::ConnectTimeout`] if it does not finish within
///   `config.connect_timeout`.
pub async fn connect(config: &FeedConfig) -> Result<FeedStream, FeedError> {
    config.validate()?;

    let handshake = tokio_tungstenite::connect_async(config.endpoint.as_str());
    match tokio::time::timeout(config.connect_timeout, handshake).await {
        Ok(Ok((stream, response))) => {
            tracing::info!(
                url = %config.endpoint,
                status = %response.status(),
                "event stream connected"
            );
            Ok(stream)
        }
        Ok(Err(source)) => Err(FeedError::Connect {
            url: config.endpoint.clone(),
            source,
        }),
        Err(_) => Err(FeedError::ConnectTimeout {
            url: config.endpoint.clone(),
            timeout: config.connect_timeout,
        }),
    }
}

/// Runs the receive loop for a single connection.
///
/// - Text frames are decoded; successes and failures are both forwarded.
/// - Binary frames are ignored; ping/pong is answered by the protocol layer.
/// - Any change on `shutdown` (or its sender being dropped) sends a close
///   frame and ends the loop.
///
/// A final [`FeedMessage::Closed`] is always sent before returning.
pub async fn run_connection(
    stream: FeedStream,
    tx: mpsc::UnboundedSender<FeedMessage>,
    mut shutdown: watch::Receiver<bool>,
) {
    let (mut ws_tx, mut ws_rx) = stream.split();

    let reason = loop {
        tokio::select! {
            // Close requested by the widget
            _ = shutdown.changed() => {
                if let Err(err) = ws_tx.send(Message::Close(None)).await {
                    tracing::debug!(error = %err, "failed to send close frame");
                } else {
                    let drained = tokio::time::timeout(CLOSE_GRACE, drain_until_close(&mut ws_rx, &tx));
                    match drained.await {
                        Ok(true) => {}
                        Ok(false) => {
                            tracing::debug!("event stream ended before acknowledging close");
                        }
                        Err(_) => {
                            tracing::debug!(grace = ?CLOSE_GRACE, "peer did not acknowledge close");
                        }
                    }
                }
                break CloseReason::Local;
            }
            // Frame from the server
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if !forward_text(text.as_str(), &tx) {
                            break CloseReason::Local;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        tracing::debug!(len = data.len(), "ignoring binary frame");
                    }
                    Some(Ok(Message::Close(frame))) => break CloseReason::from_close_frame(frame),
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::warn!(error = %err, "event stream failed");
                        break CloseReason::Error(err.to_string());
                    }
                    None => break CloseReason::from_close_frame(None),
                }
            }
        }
    };

    tracing::info!(%reason, "event stream closed");
    if tx.send(FeedMessage::Closed(reason)).is_err() {
        tracing::debug!("feed consumer already gone");
    }
}

/// Decodes one text frame and forwards the result.
///
/// Returns `false` if the consumer is gone.
fn forward_text(text: &str, tx: &mpsc::UnboundedSender<FeedMessage>) -> bool {
    let msg = match decode_event(text) {
        Ok(event) => FeedMessage::Event(event),
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "dropping undecodable frame");
            FeedMessage::Rejected(err)
        }
    };
    tx.send(msg).is_ok()
}

/// Reads frames after a local close until the peer acknowledges it.
///
/// Text frames that were already in flight are still decoded and
/// forwarded. Returns `true` if the peer's close frame was seen.
async fn drain_until_close<S>(ws_rx: &mut S, tx: &mpsc::UnboundedSender<FeedMessage>) -> bool
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(Ok(msg)) = ws_rx.next().await {
        match msg {
            Message::Text(text) => {
                forward_text(text.as_str(), tx);
            }
            Message::Close(_) => return true,
            _ => {}
        }
    }
    false
}
