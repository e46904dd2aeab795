//! Crate-wide error type.
//!
//! ERROR HANDLING
//! ==============
//! Transport and backend failures surface as `ShepherdError` values; the
//! session turns the recoverable ones (snapshot fetch, malformed messages,
//! dropped connections) into log lines and keeps running. Only CLI entry
//! points propagate them to the process exit code.

/// Errors raised by the shepherd client.
#[derive(Debug, thiserror::Error)]
pub enum ShepherdError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("server returned HTTP {status}: {body}")]
    ServerStatus { status: u16, body: String },
    #[error("backend rejected {action}: {reason}")]
    Rejected { action: &'static str, reason: String },
    #[error("no event is selected")]
    NoSelection,
    #[error("event {0} is already acknowledged")]
    AlreadyAcknowledged(String),
    #[error("acknowledge for {0} is already in flight")]
    AckInFlight(String),
    #[error("session closed")]
    SessionClosed,
    #[error("{0}")]
    InvalidCommand(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for ShepherdError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WsConnect(Box::new(error))
    }
}
