//! Error types for the event feed.
//!
//! Two classes of failure exist:
//!
//! | Type            | Scope        | Effect                                   |
//! |-----------------|--------------|------------------------------------------|
//! | [`DecodeError`] | one frame    | frame skipped, list unchanged, loop runs |
//! | [`FeedError`]   | the widget   | widget could not be opened               |
//!
//! Failures after the connection is established are not errors returned
//! to the caller; they end the receive loop and are recorded as a
//! [`crate::ws::CloseReason`] in the feed status.

use std::time::Duration;

use tokio_tungstenite::tungstenite;

/// Failure to interpret an inbound text frame as an [`crate::domain::Event`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The frame is not valid JSON.
    #[error("malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The frame is valid JSON but not an event-shaped object.
    #[error("unexpected event shape: {0}")]
    Shape(#[source] serde_json::Error),
}

impl DecodeError {
    /// Classifies a `serde_json` error into a decode error variant.
    #[must_use]
    pub fn from_json(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Data => Self::Shape(err),
            serde_json::error::Category::Io
            | serde_json::error::Category::Syntax
            | serde_json::error::Category::Eof => Self::Malformed(err),
        }
    }

    /// Returns a short static label for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::Shape(_) => "shape",
        }
    }
}

/// Failure to open an event feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The configured endpoint is not a `ws://` URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The WebSocket handshake failed (refused, DNS, HTTP upgrade rejected).
    #[error("failed to connect to {url}: {source}")]
    Connect {
        /// Endpoint that was dialled.
        url: String,
        /// Underlying protocol error.
        #[source]
        source: tungstenite::Error,
    },

    /// The WebSocket handshake did not complete in time.
    #[error("timed out after {timeout:?} connecting to {url}")]
    ConnectTimeout {
        /// Endpoint that was dialled.
        url: String,
        /// Configured handshake timeout.
        timeout: Duration,
    },
}
