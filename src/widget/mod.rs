//! The event feed widget.
//!
//! [`EventFeedWidget`] owns one connection and two tasks:
//!
//! ```text
//! socket ──► reader (ws::run_connection)
//!              │  mpsc<FeedMessage>, arrival order
//!              ▼
//!            consumer (FeedState::apply)
//!              │  watch<EventList>, watch<FeedStatus>
//!              ▼
//!            renderer (read-only snapshots)
//! ```
//!
//! The consumer is the single writer of the display list. Renderers get
//! snapshots through [`tokio::sync::watch`] and are notified whenever the
//! list is replaced.

pub mod state;

pub use state::{ConnectionState, FeedState, FeedStatus};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::FeedConfig;
use crate::domain::EventList;
use crate::error::FeedError;
use crate::ws::{self, FeedMessage};

/// A live, newest-first view of an event stream.
///
/// Created with [`EventFeedWidget::open`]. The connection lives as long as
/// the widget: [`EventFeedWidget::close`] tears it down gracefully, and
/// dropping the widget aborts it.
#[derive(Debug)]
pub struct EventFeedWidget {
    endpoint: String,
    events_rx: watch::Receiver<EventList>,
    status_rx: watch::Receiver<FeedStatus>,
    shutdown_tx: watch::Sender<bool>,
    reader: Option<JoinHandle<()>>,
    consumer: Option<JoinHandle<()>>,
}

impl EventFeedWidget {
    /// Connects to `config.endpoint` and starts receiving events.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns any [`FeedError`] produced by [`ws::connect`]; no retry is
    /// attempted.
    pub async fn open(config: FeedConfig) -> Result<Self, FeedError> {
        let stream = ws::connect(&config).await?;

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (events_tx, events_rx) = watch::channel(EventList::new());
        let (status_tx, status_rx) = watch::channel(FeedStatus::default());

        let reader = tokio::spawn(ws::run_connection(stream, msg_tx, shutdown_rx));
        let consumer = tokio::spawn(run_consumer(
            msg_rx,
            FeedState::new(config.max_events),
            events_tx,
            status_tx,
        ));

        Ok(Self {
            endpoint: config.endpoint,
            events_rx,
            status_rx,
            shutdown_tx,
            reader: Some(reader),
            consumer: Some(consumer),
        })
    }

    /// Endpoint this widget is connected to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current display list, newest first.
    #[must_use]
    pub fn events(&self) -> EventList {
        self.events_rx.borrow().clone()
    }

    /// Receiver notified every time the display list is replaced.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EventList> {
        self.events_rx.clone()
    }

    /// Current connection state and counters.
    #[must_use]
    pub fn status(&self) -> FeedStatus {
        self.status_rx.borrow().clone()
    }

    /// Receiver notified every time the status changes.
    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<FeedStatus> {
        self.status_rx.clone()
    }

    /// Closes the connection and waits for both tasks to finish.
    ///
    /// Frames already received, including ones still in flight while the
    /// close handshake completes, are applied to the list before this
    /// returns.
    /// Returns the final status.
    pub async fn close(mut self) -> FeedStatus {
        self.shutdown_tx.send_replace(true);

        if let Some(reader) = self.reader.take()
            && let Err(err) = reader.await
        {
            tracing::warn!(error = %err, "feed reader task failed");
        }
        if let Some(consumer) = self.consumer.take()
            && let Err(err) = consumer.await
        {
            tracing::warn!(error = %err, "feed consumer task failed");
        }

        self.status()
    }
}

impl Drop for EventFeedWidget {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if let Some(consumer) = self.consumer.take() {
            consumer.abort();
        }
    }
}

/// Applies reader messages in order and publishes the resulting snapshots.
///
/// Ends when the reader drops its sender.
async fn run_consumer(
    mut rx: mpsc::UnboundedReceiver<FeedMessage>,
    mut state: FeedState,
    events_tx: watch::Sender<EventList>,
    status_tx: watch::Sender<FeedStatus>,
) {
    while let Some(msg) = rx.recv().await {
        let list_changed = state.apply(msg);

        // Status first, so a renderer woken by the list sees matching counters.
        status_tx.send_if_modified(|status| {
            if *status == *state.status() {
                false
            } else {
                *status = state.status().clone();
                true
            }
        });
        if list_changed {
            events_tx.send_replace(state.events().clone());
        }
    }

    tracing::debug!(events = state.events().len(), "feed consumer stopped");
}
