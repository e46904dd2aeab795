use std::time::Duration;

use futures_util::SinkExt;
use tokio::net::TcpListener;
use tokio::time::timeout;
use wire::{Event, Level};

use super::*;

fn event(id: &str) -> Event {
    Event {
        id: id.to_owned(),
        status: 500,
        level: Level::Error,
        acknowledged: false,
        raw: format!("GET /{id} 500"),
        timestamp: None,
    }
}

fn ids(store: &EventStore) -> Vec<&str> {
    store.iter().map(|e| e.id.as_str()).collect()
}

// =============================================================
// ReconnectPolicy
// =============================================================

#[test]
fn backoff_doubles_then_caps() {
    let policy = ReconnectPolicy::default();
    let schedule: Vec<u64> = (0..7)
        .map(|attempt| u64::try_from(policy.delay(attempt).unwrap().as_millis()).unwrap())
        .collect();
    assert_eq!(schedule, [1000, 2000, 4000, 8000, 10_000, 10_000, 10_000]);
}

#[test]
fn backoff_survives_huge_attempt_counts() {
    let policy = ReconnectPolicy::default();
    assert_eq!(policy.delay(u32::MAX), Some(Duration::from_secs(10)));
}

#[test]
fn jitter_stays_within_bound() {
    let policy = ReconnectPolicy::default();
    for attempt in 0..6 {
        let base = policy.delay(attempt).unwrap();
        for _ in 0..50 {
            let waited = policy.jittered(attempt).unwrap();
            assert!(waited >= base && waited <= base + Duration::from_millis(250), "{waited:?}");
        }
    }
}

#[test]
fn disabled_policy_never_waits() {
    let policy = ReconnectPolicy::disabled();
    assert!(policy.delay(0).is_none());
    assert!(policy.jittered(3).is_none());
}

#[test]
fn status_names() {
    assert_eq!(ConnectionStatus::default(), ConnectionStatus::Disconnected);
    assert_eq!(ConnectionStatus::Connecting.as_str(), "connecting");
    assert_eq!(ConnectionStatus::Connected.as_str(), "connected");
}

// =============================================================
// apply
// =============================================================

#[test]
fn apply_init_replaces_store() {
    let mut store = EventStore::default();
    store.prepend(event("stale"));
    let applied = apply(&mut store, Inbound::Init(vec![event("b"), event("a")]));
    assert_eq!(applied, Applied::Replaced { count: 2 });
    assert_eq!(ids(&store), ["b", "a"]);
}

#[test]
fn incremental_log_event_then_ack() {
    let mut store = EventStore::default();
    let applied = apply(&mut store, Inbound::LogEvent(event("b")));
    assert_eq!(applied, Applied::Prepended { evicted: None });
    assert_eq!(ids(&store), ["b"]);

    let applied = apply(&mut store, Inbound::Ack("b".to_owned()));
    assert_eq!(applied, Applied::Acknowledged { changed: true });
    assert_eq!(ids(&store), ["b"]);
    assert!(store.get("b").is_some_and(|e| e.acknowledged));
}

#[test]
fn apply_log_event_reports_eviction() {
    let mut store = EventStore::new(1);
    apply(&mut store, Inbound::LogEvent(event("a")));
    let applied = apply(&mut store, Inbound::LogEvent(event("b")));
    assert_eq!(applied, Applied::Prepended { evicted: Some("a".to_owned()) });
}

#[test]
fn apply_ack_for_unknown_id_changes_nothing() {
    let mut store = EventStore::default();
    apply(&mut store, Inbound::LogEvent(event("a")));
    let applied = apply(&mut store, Inbound::Ack("ghost".to_owned()));
    assert_eq!(applied, Applied::Acknowledged { changed: false });
    assert!(store.get("a").is_some_and(|e| !e.acknowledged));
}

#[test]
fn apply_malformed_is_dropped() {
    let mut store = EventStore::default();
    apply(&mut store, Inbound::LogEvent(event("a")));
    let applied = apply(&mut store, wire::classify("{not json"));
    assert_eq!(applied, Applied::Dropped);
    assert_eq!(ids(&store), ["a"]);
}

// =============================================================
// run against a local websocket
// =============================================================

async fn next(feed: &mut mpsc::Receiver<SyncEvent>) -> SyncEvent {
    timeout(Duration::from_secs(5), feed.recv())
        .await
        .expect("feed timed out")
        .expect("feed closed")
}

#[tokio::test]
async fn run_forwards_frames_and_stops_without_reconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        ws.send(Message::text(r#"{"type":"init","events":[]}"#)).await.unwrap();
        ws.send(Message::text("garbage")).await.unwrap();
        let log = r#"{"type":"log_event","event":{"id":"b","status":503,"level":"error","acknowledged":false,"raw":"x"}}"#;
        ws.send(Message::binary(log.as_bytes().to_vec())).await.unwrap();
        ws.send(Message::text(r#"{"type":"ack","id":"b"}"#)).await.unwrap();
        ws.close(None).await.unwrap();
    });

    let (tx, mut rx) = mpsc::channel(16);
    let task = spawn(format!("ws://{addr}/ws"), ReconnectPolicy::disabled(), tx);

    assert!(matches!(next(&mut rx).await, SyncEvent::Status(ConnectionStatus::Connecting)));
    assert!(matches!(next(&mut rx).await, SyncEvent::Status(ConnectionStatus::Connected)));
    assert!(matches!(next(&mut rx).await, SyncEvent::Inbound(Inbound::Init(events)) if events.is_empty()));
    assert!(matches!(next(&mut rx).await, SyncEvent::Inbound(Inbound::Malformed(_))));
    assert!(matches!(next(&mut rx).await, SyncEvent::Inbound(Inbound::LogEvent(e)) if e.id == "b"));
    assert!(matches!(next(&mut rx).await, SyncEvent::Inbound(Inbound::Ack(id)) if id == "b"));
    assert!(matches!(next(&mut rx).await, SyncEvent::Status(ConnectionStatus::Disconnected)));

    timeout(Duration::from_secs(5), task).await.expect("task ended").unwrap();
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn run_reports_failed_connect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (tx, mut rx) = mpsc::channel(16);
    let task = spawn(format!("ws://{addr}/ws"), ReconnectPolicy::disabled(), tx);

    assert!(matches!(next(&mut rx).await, SyncEvent::Status(ConnectionStatus::Connecting)));
    assert!(matches!(next(&mut rx).await, SyncEvent::Status(ConnectionStatus::Disconnected)));
    timeout(Duration::from_secs(5), task).await.expect("task ended").unwrap();
}

#[tokio::test]
async fn run_reconnects_after_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        for round in 0..2 {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            let text = format!(r#"{{"type":"ack","id":"round-{round}"}}"#);
            ws.send(Message::text(text)).await.unwrap();
            ws.close(None).await.unwrap();
        }
    });

    let policy = ReconnectPolicy {
        initial: Duration::from_millis(10),
        max: Duration::from_millis(20),
        jitter: Duration::ZERO,
        ..ReconnectPolicy::default()
    };
    let (tx, mut rx) = mpsc::channel(16);
    let task = spawn(format!("ws://{addr}/ws"), policy, tx);

    let mut acks = Vec::new();
    while acks.len() < 2 {
        if let SyncEvent::Inbound(Inbound::Ack(id)) = next(&mut rx).await {
            acks.push(id);
        }
    }
    assert_eq!(acks, ["round-0", "round-1"]);
    task.abort();
}

#[tokio::test]
async fn run_stops_when_feed_is_dropped() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let task = spawn(format!("ws://{addr}/ws"), ReconnectPolicy::default(), tx);
    timeout(Duration::from_secs(5), task).await.expect("task ended").unwrap();
}
