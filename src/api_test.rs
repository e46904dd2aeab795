use super::*;

fn backend(base: &str) -> HttpBackend {
    HttpBackend::new(base, Duration::from_secs(1)).expect("backend")
}

// =============================================================
// construction
// =============================================================

#[test]
fn new_rejects_non_http_schemes() {
    for base in ["ftp://host", "mailto:ops@example.com", "not a url"] {
        assert!(
            matches!(HttpBackend::new(base, Duration::from_secs(1)), Err(ShepherdError::InvalidBaseUrl(_))),
            "{base}"
        );
    }
}

#[test]
fn from_config_uses_session_base_url() {
    let config = Config { base_url: "https://ops.example.com/shepherd".to_owned(), ..Config::default() };
    let b = HttpBackend::from_config(&config).expect("backend");
    assert_eq!(b.endpoint(&["events"]).unwrap().as_str(), "https://ops.example.com/shepherd/events");

    let bad = Config { base_url: "ftp://host".to_owned(), ..Config::default() };
    assert!(matches!(HttpBackend::from_config(&bad), Err(ShepherdError::InvalidBaseUrl(_))));
}

#[tokio::test]
async fn from_config_applies_request_timeout() {
    // Accepts connections into the backlog but never answers.
    let silent = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = Config {
        base_url: format!("http://{}", silent.local_addr().unwrap()),
        request_timeout: Duration::from_millis(100),
        ..Config::default()
    };
    let b = HttpBackend::from_config(&config).expect("backend");
    let started = std::time::Instant::now();
    let err = b.fetch_events().await.unwrap_err();
    assert!(matches!(&err, ShepherdError::Http(e) if e.is_timeout()), "{err:?}");
    assert!(started.elapsed() < Duration::from_secs(5));
    drop(silent);
}

// =============================================================
// endpoint
// =============================================================

#[test]
fn endpoint_joins_under_origin() {
    let b = backend("http://127.0.0.1:8000");
    assert_eq!(b.endpoint(&["events"]).unwrap().as_str(), "http://127.0.0.1:8000/events");
    assert_eq!(
        b.endpoint(&["acknowledge", "a"]).unwrap().as_str(),
        "http://127.0.0.1:8000/acknowledge/a"
    );
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let b = backend("https://ops.example.com/shepherd/");
    assert_eq!(b.endpoint(&["events"]).unwrap().as_str(), "https://ops.example.com/shepherd/events");
}

#[test]
fn endpoint_percent_encodes_ids() {
    let b = backend("http://127.0.0.1:8000");
    let url = b.endpoint(&["acknowledge", "a/b c?d"]).unwrap();
    assert_eq!(url.path(), "/acknowledge/a%2Fb%20c%3Fd");
    assert!(url.query().is_none());
}

// =============================================================
// interpret_reply
// =============================================================

#[test]
fn reply_ok_true_is_success() {
    let reply = interpret_reply(r#"{"ok":true}"#, "acknowledge").unwrap().expect("reply");
    assert!(reply.ok);
}

#[test]
fn reply_not_found_is_rejected() {
    let err = interpret_reply(r#"{"ok":false,"error":"not_found"}"#, "acknowledge").unwrap_err();
    match err {
        ShepherdError::Rejected { action, reason } => {
            assert_eq!(action, "acknowledge");
            assert_eq!(reason, "not_found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn reply_ok_false_without_reason() {
    let err = interpret_reply(r#"{"ok":false}"#, "ingest").unwrap_err();
    assert!(matches!(err, ShepherdError::Rejected { reason, .. } if reason == "unspecified"));
}

#[test]
fn reply_empty_or_foreign_body_is_success() {
    assert!(interpret_reply("", "acknowledge").unwrap().is_none());
    assert!(interpret_reply("acknowledged", "acknowledge").unwrap().is_none());
}

#[test]
fn reply_carries_ingest_id() {
    let reply = interpret_reply(r#"{"ok":true,"id":"abc"}"#, "ingest").unwrap().expect("reply");
    assert_eq!(reply.id.as_deref(), Some("abc"));
}
