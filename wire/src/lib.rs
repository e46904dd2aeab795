//! Shared event model and JSON codec for the shepherd backend protocol.
//!
//! This crate owns the wire representation consumed by the client: the
//! `Event` record returned by `GET /events` and carried on the `/ws` push
//! channel, the push-channel message envelope, and the small REST payloads
//! for acknowledge and ingest. Push messages are discriminated by a `type`
//! field and decoded into [`Inbound`], a closed tagged union the client
//! matches on exhaustively.

use serde::{Deserialize, Serialize};

/// Error returned by [`decode_message`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload was not valid JSON or did not match any known message shape.
    #[error("failed to decode message: {0}")]
    Json(#[from] serde_json::Error),
    /// A binary frame did not contain UTF-8 text.
    #[error("binary frame is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Severity of a backend event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Client-side failure (status 400-499).
    Warning,
    /// Server-side failure (status 500 and up).
    Error,
    /// Informational line (status below 400). Unrecognised names land here.
    #[default]
    #[serde(other)]
    Info,
}

impl Level {
    /// Lowercase name as it appears on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A log/alert record owned by the backend and cached by the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stable identity. Never changes once the backend has issued it.
    pub id: String,
    /// Status code the backend extracted from the raw line (0 when none).
    #[serde(default)]
    pub status: i64,
    /// Severity bucket.
    #[serde(default)]
    pub level: Level,
    /// Whether an operator has acknowledged the event. Only ever goes false → true.
    #[serde(default)]
    pub acknowledged: bool,
    /// Raw log line as ingested.
    #[serde(default)]
    pub raw: String,
    /// Ingest time in Unix seconds, when the backend provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// Body of `GET /events`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A push-channel message as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Full snapshot sent once after the socket opens.
    Init {
        #[serde(default)]
        events: Vec<Event>,
    },
    /// A newly ingested event.
    LogEvent { event: Event },
    /// Some client acknowledged the event with this id.
    Ack { id: String },
}

/// A classified inbound push message.
///
/// Unlike [`Message`], this also captures payloads that failed to decode so
/// the dispatcher can log and drop them without leaving the match.
#[derive(Debug)]
pub enum Inbound {
    Init(Vec<Event>),
    LogEvent(Event),
    Ack(String),
    Malformed(CodecError),
}

impl From<Message> for Inbound {
    fn from(message: Message) -> Self {
        match message {
            Message::Init { events } => Self::Init(events),
            Message::LogEvent { event } => Self::LogEvent(event),
            Message::Ack { id } => Self::Ack(id),
        }
    }
}

/// Body of `POST /acknowledge/{id}` and `POST /ingest` responses.
///
/// The backend reports application-level failures as `{"ok": false, "error": ...}`
/// with a success HTTP status, so callers must inspect `ok`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Id of the event created by `POST /ingest`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

fn default_ok() -> bool {
    true
}

/// Body of `POST /ingest`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngestRequest {
    pub raw: String,
}

/// Encode a push message as JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
pub fn encode_message(message: &Message) -> Result<String, CodecError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode JSON text into a push message.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed JSON, an unknown `type`, or a
/// payload that does not match the variant's fields.
pub fn decode_message(text: &str) -> Result<Message, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Classify a text frame. Never fails; decode errors become [`Inbound::Malformed`].
#[must_use]
pub fn classify(text: &str) -> Inbound {
    match decode_message(text) {
        Ok(message) => message.into(),
        Err(e) => Inbound::Malformed(e),
    }
}

/// Classify a binary frame holding UTF-8 JSON.
#[must_use]
pub fn classify_bytes(bytes: &[u8]) -> Inbound {
    match std::str::from_utf8(bytes) {
        Ok(text) => classify(text),
        Err(e) => Inbound::Malformed(e.into()),
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
