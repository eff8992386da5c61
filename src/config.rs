//! Feed configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Every key is optional; without any configuration the feed
//! connects to [`DEFAULT_ENDPOINT`] and keeps every event it receives.

use std::time::Duration;

use crate::error::FeedError;

/// Endpoint the feed connects to when `EVENT_FEED_URL` is not set.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/ws/events";

/// Top-level feed configuration.
///
/// Loaded once at startup via [`FeedConfig::from_env`], or built directly
/// with [`FeedConfig::new`] in tests and embedding code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// WebSocket URL of the event stream.
    pub endpoint: String,

    /// Maximum number of events retained in the display list.
    /// `None` keeps every event.
    pub max_events: Option<usize>,

    /// Time allowed for the WebSocket handshake.
    pub connect_timeout: Duration,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl FeedConfig {
    /// Creates a configuration for `endpoint` with default limits.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            max_events: None,
            connect_timeout: Duration::from_secs(10),
            json_logs: false,
        }
    }

    /// Sets the retention bound. `0` means unbounded.
    #[must_use]
    pub fn with_max_events(mut self, max_events: usize) -> Self {
        self.max_events = (max_events > 0).then_some(max_events);
        self
    }

    /// Sets the handshake timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    /// Numeric keys fall back to their defaults when missing or invalid.
    ///
    /// | Key                               | Default                          |
    /// |-----------------------------------|----------------------------------|
    /// | `EVENT_FEED_URL`                  | `ws://localhost:8080/ws/events`  |
    /// | `EVENT_FEED_MAX_EVENTS`           | `0` (unbounded)                  |
    /// | `EVENT_FEED_CONNECT_TIMEOUT_SECS` | `10`                             |
    /// | `EVENT_FEED_LOG_JSON`             | `false`                          |
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidEndpoint`] if `EVENT_FEED_URL` is set to
    /// something other than a `ws://` URL.
    pub fn from_env() -> Result<Self, FeedError> {
        dotenvy::dotenv().ok();

        let endpoint =
            std::env::var("EVENT_FEED_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let max_events = parse_env("EVENT_FEED_MAX_EVENTS", 0_usize);
        let connect_timeout_secs = parse_env("EVENT_FEED_CONNECT_TIMEOUT_SECS", 10_u64);
        let json_logs = parse_env_bool("EVENT_FEED_LOG_JSON", false);

        let mut config = Self::new(endpoint)
            .with_max_events(max_events)
            .with_connect_timeout(Duration::from_secs(connect_timeout_secs));
        config.json_logs = json_logs;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the endpoint is a plain `ws://` URL naming a host.
    ///
    /// `wss://` is rejected: the client is built without a TLS backend.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidEndpoint`] otherwise.
    pub fn validate(&self) -> Result<(), FeedError> {
        match self.endpoint.strip_prefix("ws://") {
            Some(rest) if !rest.is_empty() && !rest.starts_with('/') => Ok(()),
            _ => Err(FeedError::InvalidEndpoint(self.endpoint.clone())),
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
