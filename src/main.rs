//! event-feed terminal entry point.
//!
//! Connects to the configured event stream and prints the display list
//! every time it changes. Exits on Ctrl-C or when the stream closes.

use std::io::Write;

use tracing_subscriber::EnvFilter;

use event_feed::config::FeedConfig;
use event_feed::domain::EventList;
use event_feed::widget::EventFeedWidget;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = FeedConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(url = %config.endpoint, max_events = ?config.max_events, "starting event-feed");
    let widget = EventFeedWidget::open(config).await?;

    let mut events = widget.subscribe();
    let mut status = widget.subscribe_status();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
            changed = events.changed() => {
                if changed.is_err() {
                    break;
                }
                let list = events.borrow_and_update().clone();
                render(&list)?;
            }
            changed = status.changed() => {
                if changed.is_err() || status.borrow_and_update().state.is_closed() {
                    break;
                }
            }
        }
    }

    if events.has_changed().unwrap_or(false) {
        let list = events.borrow_and_update().clone();
        render(&list)?;
    }

    let final_status = widget.close().await;
    tracing::info!(
        state = %final_status.state,
        decoded = final_status.decoded,
        rejected = final_status.rejected,
        "event-feed stopped"
    );

    Ok(())
}

/// Writes the whole list to stdout, newest first.
fn render(list: &EventList) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "--- {} event(s) ---", list.len())?;
    for event in list {
        writeln!(out, "{event}")?;
    }
    out.flush()
}
