//! Scripted event source for integration tests.
//!
//! Serves `/ws/events` on an ephemeral port and plays a fixed list of
//! frames to every client that connects.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use event_feed::config::FeedConfig;
use event_feed::domain::EventList;
use event_feed::widget::FeedStatus;

/// Upper bound on any wait in the integration tests.
pub const TIMEOUT: Duration = Duration::from_secs(5);

/// One step of the server script.
#[derive(Debug, Clone)]
pub enum Step {
    /// Send a text frame.
    Text(String),
    /// Send a binary frame.
    Binary(Vec<u8>),
    /// Send a close frame with code 1001 and end the session.
    Close,
    /// Drop the socket without a close handshake.
    Drop,
}

/// How a client session ended, as seen by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientGone {
    /// The client sent a close frame.
    Closed,
    /// The stream ended without a close frame.
    Dropped,
}

#[derive(Debug, Clone)]
struct ServerState {
    script: Arc<Vec<Step>>,
    gone_tx: mpsc::UnboundedSender<ClientGone>,
}

/// Running scripted server.
#[derive(Debug)]
pub struct TestServer {
    addr: SocketAddr,
    gone_rx: mpsc::UnboundedReceiver<ClientGone>,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Binds an ephemeral port and starts serving `script`.
    pub async fn spawn(script: Vec<Step>) -> Self {
        let (gone_tx, gone_rx) = mpsc::unbounded_channel();
        let state = ServerState {
            script: Arc::new(script),
            gone_tx,
        };
        let app = Router::new()
            .route("/ws/events", get(events_ws))
            .with_state(state);

        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("failed to bind test listener");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("listener has no local address");
        };
        let task = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!(error = %err, "test server failed");
            }
        });

        Self {
            addr,
            gone_rx,
            task,
        }
    }

    /// Feed configuration pointing at this server.
    pub fn config(&self) -> FeedConfig {
        FeedConfig::new(format!("ws://{}/ws/events", self.addr))
            .with_connect_timeout(Duration::from_secs(2))
    }

    /// Waits until a client session ends and reports how.
    pub async fn client_gone(&mut self) -> ClientGone {
        let Ok(Some(gone)) = tokio::time::timeout(TIMEOUT, self.gone_rx.recv()).await else {
            panic!("client session did not end");
        };
        gone
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Text frame carrying a well-formed event.
pub fn event_frame(date: &str, message: &str) -> Step {
    Step::Text(format!(r#"{{"eventDate":"{date}","message":"{message}"}}"#))
}

/// Waits until the display list holds exactly `n` events.
pub async fn wait_for_len(rx: &mut watch::Receiver<EventList>, n: usize) -> EventList {
    let result = tokio::time::timeout(TIMEOUT, rx.wait_for(|list| list.len() == n)).await;
    let Ok(Ok(list)) = result else {
        panic!("display list never reached {n} events");
    };
    (*list).clone()
}

/// Waits until the feed reports a closed connection.
pub async fn wait_for_closed(rx: &mut watch::Receiver<FeedStatus>) -> FeedStatus {
    let result = tokio::time::timeout(TIMEOUT, rx.wait_for(|s| s.state.is_closed())).await;
    let Ok(Ok(status)) = result else {
        panic!("feed never reported closed");
    };
    (*status).clone()
}

/// Messages of `list`, newest first.
pub fn messages(list: &EventList) -> Vec<Option<String>> {
    list.iter().map(|e| e.message.clone()).collect()
}

async fn events_ws(ws: WebSocketUpgrade, State(state): State<ServerState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| play(socket, state))
}

async fn play(mut socket: WebSocket, state: ServerState) {
    for step in state.script.iter() {
        let msg = match step {
            Step::Text(text) => Message::text(text.clone()),
            Step::Binary(data) => Message::Binary(data.clone().into()),
            Step::Close => {
                let frame = CloseFrame {
                    code: close_code::AWAY,
                    reason: String::from("server shutting down").into(),
                };
                if socket.send(Message::Close(Some(frame))).await.is_err() {
                    return;
                }
                continue;
            }
            Step::Drop => return,
        };
        if socket.send(msg).await.is_err() {
            return;
        }
    }

    let gone = loop {
        match socket.recv().await {
            Some(Ok(Message::Close(_))) => break ClientGone::Closed,
            Some(Ok(_)) => {}
            Some(Err(_)) | None => break ClientGone::Dropped,
        }
    };
    let _ = state.gone_tx.send(gone);
}
