//! Consumer-side feed state.
//!
//! [`FeedState`] is the only place the display list is mutated. It is
//! driven one [`FeedMessage`] at a time by the consumer task, so every
//! update happens in channel order.

use std::fmt;

use crate::domain::EventList;
use crate::ws::{CloseReason, FeedMessage};

/// Lifecycle of the feed connection: `Open` → `Receiving` → `Closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake completed, no frame received yet.
    Open,
    /// At least one text frame has arrived.
    Receiving,
    /// The receive loop has ended; no further updates will arrive.
    Closed(CloseReason),
}

impl ConnectionState {
    /// Returns `true` once the connection has ended.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Receiving => f.write_str("receiving"),
            Self::Closed(reason) => write!(f, "{reason}"),
        }
    }
}

/// Connection state plus frame counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedStatus {
    /// Current lifecycle state.
    pub state: ConnectionState,
    /// Frames decoded into events.
    pub decoded: u64,
    /// Frames dropped because they failed to decode.
    pub rejected: u64,
}

impl Default for FeedStatus {
    fn default() -> Self {
        Self {
            state: ConnectionState::Open,
            decoded: 0,
            rejected: 0,
        }
    }
}

/// Display list and status owned by the consumer task.
#[derive(Debug, Default)]
pub struct FeedState {
    events: EventList,
    status: FeedStatus,
    max_events: Option<usize>,
}

impl FeedState {
    /// Creates an empty state with an optional retention bound.
    #[must_use]
    pub fn new(max_events: Option<usize>) -> Self {
        Self {
            max_events,
            ..Self::default()
        }
    }

    /// Applies one message. Returns `true` if the display list was replaced.
    ///
    /// Messages arriving after `Closed` are ignored.
    pub fn apply(&mut self, msg: FeedMessage) -> bool {
        if self.status.state.is_closed() {
            return false;
        }
        match msg {
            FeedMessage::Event(event) => {
                self.status.state = ConnectionState::Receiving;
                self.status.decoded += 1;
                self.events = self.events.prepend(event, self.max_events);
                true
            }
            FeedMessage::Rejected(_) => {
                self.status.state = ConnectionState::Receiving;
                self.status.rejected += 1;
                false
            }
            FeedMessage::Closed(reason) => {
                self.status.state = ConnectionState::Closed(reason);
                false
            }
        }
    }

    /// Current display list.
    #[must_use]
    pub const fn events(&self) -> &EventList {
        &self.events
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> &FeedStatus {
        &self.status
    }
}
