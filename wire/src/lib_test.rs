use super::*;

fn sample_event() -> Event {
    Event {
        id: "a".to_owned(),
        status: 503,
        level: Level::Error,
        acknowledged: false,
        raw: "GET /health 503".to_owned(),
        timestamp: Some(1_700_000_000.5),
    }
}

#[test]
fn level_wire_names_are_lowercase() {
    assert_eq!(Level::Info.as_str(), "info");
    assert_eq!(Level::Warning.as_str(), "warning");
    assert_eq!(Level::Error.as_str(), "error");
    assert_eq!(serde_json::to_string(&Level::Warning).expect("serialize"), "\"warning\"");
}

#[test]
fn unknown_level_decodes_as_info() {
    let level = serde_json::from_str::<Level>("\"critical\"").expect("decode");
    assert_eq!(level, Level::Info);
}

#[test]
fn init_with_unknown_level_keeps_every_event() {
    let text = r#"{"type":"init","events":[{"id":"a","level":"critical"},{"id":"b","level":"error"}]}"#;
    let Inbound::Init(events) = classify(text) else {
        panic!("expected init");
    };
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].level, Level::Info);
    assert_eq!(events[1].level, Level::Error);
}

#[test]
fn decode_init_message() {
    let text = r#"{"type":"init","events":[{"id":"a","status":5,"level":"error","acknowledged":false,"raw":"boom"}]}"#;
    let message = decode_message(text).expect("init should decode");
    let Message::Init { events } = message else {
        panic!("expected init, got {message:?}");
    };
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "a");
    assert_eq!(events[0].status, 5);
    assert_eq!(events[0].level, Level::Error);
    assert!(events[0].timestamp.is_none());
}

#[test]
fn decode_init_without_events_is_empty() {
    let message = decode_message(r#"{"type":"init"}"#).expect("init should decode");
    assert_eq!(message, Message::Init { events: Vec::new() });
}

#[test]
fn decode_log_event_message() {
    let text = r#"{"type":"log_event","event":{"id":"b","status":404,"level":"warning","acknowledged":false,"raw":"GET /x 404","timestamp":12.0}}"#;
    let message = decode_message(text).expect("log_event should decode");
    let Message::LogEvent { event } = message else {
        panic!("expected log_event, got {message:?}");
    };
    assert_eq!(event.id, "b");
    assert_eq!(event.level, Level::Warning);
    assert_eq!(event.timestamp, Some(12.0));
}

#[test]
fn decode_ack_message() {
    let message = decode_message(r#"{"type":"ack","id":"b"}"#).expect("ack should decode");
    assert_eq!(message, Message::Ack { id: "b".to_owned() });
}

#[test]
fn decode_event_defaults_optional_fields() {
    let text = r#"{"type":"log_event","event":{"id":"c"}}"#;
    let Message::LogEvent { event } = decode_message(text).expect("decode") else {
        panic!("expected log_event");
    };
    assert_eq!(event.status, 0);
    assert_eq!(event.level, Level::Info);
    assert!(!event.acknowledged);
    assert!(event.raw.is_empty());
}

#[test]
fn decode_rejects_unknown_type() {
    let err = decode_message(r#"{"type":"heartbeat"}"#).expect_err("unknown type should fail");
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn decode_rejects_event_without_id() {
    let err = decode_message(r#"{"type":"log_event","event":{"status":1}}"#);
    assert!(err.is_err());
}

#[test]
fn encode_then_decode_preserves_log_event() {
    let message = Message::LogEvent { event: sample_event() };
    let text = encode_message(&message).expect("encode");
    assert!(text.contains("\"type\":\"log_event\""));
    assert_eq!(decode_message(&text).expect("decode"), message);
}

#[test]
fn classify_maps_each_variant() {
    assert!(matches!(classify(r#"{"type":"init","events":[]}"#), Inbound::Init(events) if events.is_empty()));
    assert!(matches!(classify(r#"{"type":"ack","id":"z"}"#), Inbound::Ack(id) if id == "z"));
    assert!(matches!(
        classify(r#"{"type":"log_event","event":{"id":"q"}}"#),
        Inbound::LogEvent(event) if event.id == "q"
    ));
}

#[test]
fn classify_turns_garbage_into_malformed() {
    assert!(matches!(classify("not json"), Inbound::Malformed(CodecError::Json(_))));
    assert!(matches!(classify("{}"), Inbound::Malformed(_)));
    assert!(matches!(classify(r#"{"type":"ack"}"#), Inbound::Malformed(_)));
}

#[test]
fn classify_bytes_decodes_utf8_json() {
    assert!(matches!(classify_bytes(br#"{"type":"ack","id":"b"}"#), Inbound::Ack(id) if id == "b"));
}

#[test]
fn classify_bytes_rejects_invalid_utf8() {
    assert!(matches!(classify_bytes(&[0xff, 0xfe, 0x00]), Inbound::Malformed(CodecError::Utf8(_))));
}

#[test]
fn snapshot_without_events_key_is_empty() {
    let snapshot: Snapshot = serde_json::from_str("{}").expect("snapshot");
    assert!(snapshot.events.is_empty());
}

#[test]
fn reply_defaults_to_ok_when_field_missing() {
    let reply: Reply = serde_json::from_str("{}").expect("reply");
    assert!(reply.ok);
    assert!(reply.error.is_none());
}

#[test]
fn reply_reports_backend_not_found() {
    let reply: Reply = serde_json::from_str(r#"{"ok":false,"error":"not_found"}"#).expect("reply");
    assert!(!reply.ok);
    assert_eq!(reply.error.as_deref(), Some("not_found"));
}

#[test]
fn ingest_reply_carries_new_id() {
    let reply: Reply = serde_json::from_str(r#"{"ok":true,"id":"abc"}"#).expect("reply");
    assert_eq!(reply.id.as_deref(), Some("abc"));
}
