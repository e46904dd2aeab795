//! Push-channel synchronizer.
//!
//! DESIGN
//! ======
//! The synchronizer runs on its own task. It owns the websocket and nothing
//! else: every inbound frame is classified into a [`wire::Inbound`] and sent
//! to the session over an mpsc feed, together with connection status
//! changes. The session applies inbound messages to its store with [`apply`],
//! so the store keeps a single owner.
//!
//! LIFECYCLE
//! =========
//! 1. Publish `Connecting`, open the socket, publish `Connected`
//! 2. Forward classified frames until close or read error
//! 3. Publish `Disconnected`, sleep per [`ReconnectPolicy`], go to 1
//!
//! The loop ends when reconnect is disabled or when the feed receiver is
//! gone. Aborting the task drops the socket.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::time::Duration;

use futures_util::StreamExt;
use rand::Rng;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use wire::Inbound;

use crate::error::ShepherdError;
use crate::store::EventStore;

/// WebSocket connection state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

/// Exponential reconnect backoff.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    pub initial: Duration,
    pub max: Duration,
    /// Upper bound of the random delay added to each wait.
    pub jitter: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            initial: Duration::from_millis(1000),
            max: Duration::from_millis(10_000),
            jitter: Duration::from_millis(250),
        }
    }
}

impl ReconnectPolicy {
    /// Connect once; stop after the first close.
    #[must_use]
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    /// Base wait before reconnect attempt number `attempt` (0-based, counted
    /// since the last successful connect). `None` when reconnect is off.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let scaled = self.initial.saturating_mul(2_u32.saturating_pow(attempt));
        Some(scaled.min(self.max))
    }

    fn jittered(&self, attempt: u32) -> Option<Duration> {
        let base = self.delay(attempt)?;
        let cap = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let extra = rand::rng().random_range(0..=cap);
        Some(base + Duration::from_millis(extra))
    }
}

/// Messages from the synchronizer task to the session.
#[derive(Debug)]
pub enum SyncEvent {
    Status(ConnectionStatus),
    Inbound(Inbound),
}

/// How a store changed after applying one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Replaced { count: usize },
    Prepended { evicted: Option<String> },
    Acknowledged { changed: bool },
    Dropped,
}

/// Apply one classified push message to the store.
pub fn apply(store: &mut EventStore, inbound: Inbound) -> Applied {
    match inbound {
        Inbound::Init(events) => {
            store.replace_all(events);
            debug!(count = store.len(), "sync: init applied");
            Applied::Replaced { count: store.len() }
        }
        Inbound::LogEvent(event) => {
            debug!(id = %event.id, level = event.level.as_str(), "sync: log_event");
            let evicted = store.prepend(event).map(|old| old.id);
            Applied::Prepended { evicted }
        }
        Inbound::Ack(id) => {
            let changed = store.mark_acknowledged(&id);
            debug!(%id, changed, "sync: ack");
            Applied::Acknowledged { changed }
        }
        Inbound::Malformed(error) => {
            warn!(%error, "sync: dropping malformed push message");
            Applied::Dropped
        }
    }
}

/// Spawn [`run`] on the runtime.
pub fn spawn(url: String, policy: ReconnectPolicy, feed: mpsc::Sender<SyncEvent>) -> JoinHandle<()> {
    tokio::spawn(run(url, policy, feed))
}

/// Connect, forward, and reconnect until the policy or the feed says stop.
pub async fn run(url: String, policy: ReconnectPolicy, feed: mpsc::Sender<SyncEvent>) {
    let mut attempt: u32 = 0;
    loop {
        if !publish(&feed, SyncEvent::Status(ConnectionStatus::Connecting)).await {
            return;
        }

        match connect_and_run(&url, &feed).await {
            Ok(Closed::ByPeer) => {
                info!(%url, "sync: push channel closed");
                attempt = 0;
            }
            Ok(Closed::FeedDropped) => return,
            Err(error) => warn!(%url, %error, "sync: connect failed"),
        }

        if !publish(&feed, SyncEvent::Status(ConnectionStatus::Disconnected)).await {
            return;
        }

        let Some(delay) = policy.jittered(attempt) else {
            info!("sync: reconnect disabled, stopping");
            return;
        };
        debug!(attempt, delay_ms = delay.as_millis(), "sync: reconnecting after backoff");
        tokio::time::sleep(delay).await;
        attempt = attempt.saturating_add(1);
    }
}

enum Closed {
    ByPeer,
    FeedDropped,
}

/// Errors only for a failed connect; once connected, read failures end the
/// connection like a close does.
async fn connect_and_run(url: &str, feed: &mpsc::Sender<SyncEvent>) -> Result<Closed, ShepherdError> {
    let (mut stream, _) = connect_async(url).await?;
    info!(%url, "sync: push channel connected");
    if !publish(feed, SyncEvent::Status(ConnectionStatus::Connected)).await {
        return Ok(Closed::FeedDropped);
    }

    while let Some(message) = stream.next().await {
        let message = match message {
            Ok(message) => message,
            Err(error) => {
                warn!(%error, "sync: push channel read failed");
                break;
            }
        };
        let inbound = match message {
            Message::Text(text) => wire::classify(text.as_str()),
            Message::Binary(bytes) => wire::classify_bytes(&bytes),
            Message::Close(frame) => {
                debug!(?frame, "sync: close frame");
                break;
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
        };
        if !publish(feed, SyncEvent::Inbound(inbound)).await {
            return Ok(Closed::FeedDropped);
        }
    }
    Ok(Closed::ByPeer)
}

async fn publish(feed: &mpsc::Sender<SyncEvent>, event: SyncEvent) -> bool {
    if feed.send(event).await.is_err() {
        debug!("sync: session gone, stopping");
        return false;
    }
    true
}
