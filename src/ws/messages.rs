//! Messages passed from the connection reader to the feed consumer.

use std::fmt;

use tokio_tungstenite::tungstenite::protocol::CloseFrame;

use crate::domain::Event;
use crate::error::DecodeError;

/// One item on the reader → consumer channel, in arrival order.
#[derive(Debug)]
pub enum FeedMessage {
    /// A text frame decoded into an event.
    Event(Event),
    /// A text frame that could not be decoded.
    Rejected(DecodeError),
    /// The receive loop ended. Always the last message sent.
    Closed(CloseReason),
}

/// Why the receive loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The widget was closed or dropped.
    Local,
    /// The server closed the connection.
    Peer {
        /// Close code from the close frame, if one was sent.
        code: Option<u16>,
        /// Close reason text; empty when absent.
        reason: String,
    },
    /// The connection failed mid-stream.
    Error(String),
}

impl CloseReason {
    /// Builds a peer close reason from an optional close frame.
    #[must_use]
    pub fn from_close_frame(frame: Option<CloseFrame>) -> Self {
        match frame {
            Some(frame) => Self::Peer {
                code: Some(u16::from(frame.code)),
                reason: frame.reason.as_str().to_owned(),
            },
            None => Self::Peer {
                code: None,
                reason: String::new(),
            },
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("closed locally"),
            Self::Peer { code: Some(code), reason } if !reason.is_empty() => {
                write!(f, "closed by peer ({code}: {reason})")
            }
            Self::Peer { code: Some(code), .. } => write!(f, "closed by peer ({code})"),
            Self::Peer { code: None, .. } => f.write_str("closed by peer"),
            Self::Error(err) => write!(f, "connection error: {err}"),
        }
    }
}
