//! # event-feed
//!
//! WebSocket client that keeps a live, newest-first list of events.
//!
//! The feed opens a single connection to an event stream (by default
//! `ws://localhost:8080/ws/events`), decodes each JSON text frame into an
//! [`domain::Event`], and prepends it to an [`domain::EventList`] that a
//! rendering layer reads through [`widget::EventFeedWidget`].
//!
//! ## Architecture
//!
//! ```text
//! Event stream (WebSocket)
//!     │
//!     ├── Reader task (ws/)          decode, arrival order
//!     │
//!     ├── Feed consumer (widget/)    single writer of the list
//!     │
//!     └── Renderer                   read-only EventList snapshots
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use event_feed::config::FeedConfig;
//! use event_feed::widget::EventFeedWidget;
//!
//! # async fn run() -> Result<(), event_feed::error::FeedError> {
//! let widget = EventFeedWidget::open(FeedConfig::default()).await?;
//! let mut updates = widget.subscribe();
//! while updates.changed().await.is_ok() {
//!     if let Some(event) = updates.borrow_and_update().newest() {
//!         println!("{event}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod widget;
pub mod ws;
