use super::*;

fn entry(id: i64, content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "content": content,
        "sender": 7,
        "sender_name": "Ana",
        "sender_role": "CLIENT",
        "timestamp": "2026-01-01T10:00:00Z"
    })
}

#[test]
fn endpoints_format_expected_paths() {
    assert_eq!(order_endpoint("http://localhost:8000/api", 38), "http://localhost:8000/api/orders/38/");
    assert_eq!(
        order_messages_endpoint("http://localhost:8000/api/", 38),
        "http://localhost:8000/api/orders/38/messages/"
    );
}

#[test]
fn bearer_formats_authorization_value() {
    assert_eq!(bearer("t1"), "Bearer t1");
}

#[test]
fn request_failed_message_formats_status() {
    assert_eq!(request_failed_message("history", 403), "history request failed: 403");
}

#[test]
fn parse_history_body_reads_messages_envelope_in_order() {
    let body = serde_json::json!({
        "messages": [entry(1, "a"), entry(2, "b")],
        "total_messages": 2
    });
    let messages = parse_history_body(&body).expect("history");
    assert_eq!(messages.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn parse_history_body_accepts_bare_list_and_results() {
    let bare = serde_json::json!([entry(3, "c")]);
    assert_eq!(parse_history_body(&bare).expect("bare").len(), 1);

    let paged = serde_json::json!({"count": 1, "results": [entry(4, "d")]});
    assert_eq!(parse_history_body(&paged).expect("paged")[0].id, 4);
}

#[test]
fn parse_history_body_empty_list_is_valid() {
    let body = serde_json::json!({"messages": [], "total_messages": 0});
    assert_eq!(parse_history_body(&body), Ok(Vec::new()));
}

#[test]
fn parse_history_body_skips_invalid_entries() {
    let body = serde_json::json!({"messages": [entry(1, "a"), {"id": 2}]});
    let messages = parse_history_body(&body).expect("history");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, 1);
}

#[test]
fn parse_history_body_rejects_unexpected_shapes() {
    assert!(parse_history_body(&serde_json::json!({"detail": "Not found."})).is_err());
    assert!(parse_history_body(&serde_json::json!("oops")).is_err());
    assert!(parse_history_body(&serde_json::json!({"messages": "oops"})).is_err());
}

#[test]
fn history_load_folds_failure_into_marker() {
    let failed = HistoryLoad::from_result(Err("history request failed: 500".to_owned()));
    assert!(failed.messages.is_empty());
    assert_eq!(failed.error, Some(ChatError::HistoryUnavailable));

    let ok = HistoryLoad::from_result(Ok(Vec::new()));
    assert_eq!(ok, HistoryLoad::default());
}
