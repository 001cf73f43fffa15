use super::*;

#[test]
fn build_channel_url_embeds_order_and_token() {
    assert_eq!(
        build_channel_url("ws://localhost:8000", 38, "t1"),
        "ws://localhost:8000/ws/chat/38/?token=t1"
    );
}

#[test]
fn build_channel_url_trims_trailing_slash_on_base() {
    assert_eq!(
        build_channel_url("wss://api.example.test/", 7, "abc.def"),
        "wss://api.example.test/ws/chat/7/?token=abc.def"
    );
}

#[test]
fn close_codes_map_to_reasons() {
    assert_eq!(CloseReason::from_code(1000), CloseReason::NormalClosure);
    assert_eq!(CloseReason::from_code(4001), CloseReason::Unauthorized);
    assert_eq!(CloseReason::from_code(4003), CloseReason::Forbidden);
    assert_eq!(CloseReason::from_code(4004), CloseReason::NotFound);
    assert_eq!(CloseReason::from_code(4005), CloseReason::ChatInactive);
    assert_eq!(CloseReason::from_code(1006), CloseReason::Transient(1006));
    assert_eq!(CloseReason::from_code(4999).code(), 4999);
}

#[test]
fn only_normal_and_chat_inactive_suppress_reconnect() {
    assert!(CloseReason::NormalClosure.suppresses_reconnect());
    assert!(CloseReason::ChatInactive.suppresses_reconnect());
    assert!(!CloseReason::Unauthorized.suppresses_reconnect());
    assert!(!CloseReason::NotFound.suppresses_reconnect());
    assert!(!CloseReason::Transient(1011).suppresses_reconnect());
}

#[test]
fn close_reason_errors() {
    assert_eq!(CloseReason::Unauthorized.error(), Some(ChatError::SessionExpired));
    assert_eq!(CloseReason::Forbidden.error(), Some(ChatError::Forbidden));
    assert_eq!(CloseReason::NotFound.error(), Some(ChatError::OrderNotFound));
    assert_eq!(CloseReason::NormalClosure.error(), None);
    assert_eq!(CloseReason::ChatInactive.error(), None);
    assert_eq!(CloseReason::Transient(1006).error(), None);
}

#[test]
fn default_policy_uses_fixed_delay() {
    let policy = ReconnectPolicy::default();
    assert_eq!(policy.max_retries, MAX_RETRIES);
    assert_eq!(policy.delay_for(1), RECONNECT_DELAY);
    assert_eq!(policy.delay_for(5), RECONNECT_DELAY);
}

#[test]
fn backoff_factor_grows_delay_up_to_cap() {
    let policy = ReconnectPolicy {
        delay: Duration::from_secs(1),
        backoff_factor: 2.0,
        max_delay: Duration::from_secs(5),
        ..ReconnectPolicy::default()
    };
    assert_eq!(policy.delay_for(1), Duration::from_secs(1));
    assert_eq!(policy.delay_for(2), Duration::from_secs(2));
    assert_eq!(policy.delay_for(3), Duration::from_secs(4));
    assert_eq!(policy.delay_for(4), Duration::from_secs(5));
    assert_eq!(policy.delay_for(40), Duration::from_secs(5));
}

#[test]
fn decide_respects_bound_and_terminal_codes() {
    let policy = ReconnectPolicy { max_retries: 2, ..ReconnectPolicy::default() };
    assert_eq!(
        policy.decide(CloseReason::Transient(1006), 0),
        RetryDecision::Retry { attempt: 1, delay: RECONNECT_DELAY }
    );
    assert_eq!(
        policy.decide(CloseReason::Transient(1006), 1),
        RetryDecision::Retry { attempt: 2, delay: RECONNECT_DELAY }
    );
    assert_eq!(policy.decide(CloseReason::Transient(1006), 2), RetryDecision::Exhausted);
    assert_eq!(policy.decide(CloseReason::NormalClosure, 0), RetryDecision::Settle);
    assert_eq!(policy.decide(CloseReason::ChatInactive, 5), RetryDecision::Settle);
    assert!(matches!(policy.decide(CloseReason::Unauthorized, 0), RetryDecision::Retry { attempt: 1, .. }));
}

#[test]
fn decide_uses_backoff_delay_for_next_attempt() {
    let policy = ReconnectPolicy { backoff_factor: 2.0, ..ReconnectPolicy::default() };
    assert_eq!(
        policy.decide(CloseReason::Transient(1011), 2),
        RetryDecision::Retry { attempt: 3, delay: RECONNECT_DELAY * 4 }
    );
}

#[test]
fn fail_fast_on_auth_short_circuits_auth_closes() {
    let policy = ReconnectPolicy { fail_fast_on_auth: true, ..ReconnectPolicy::default() };
    assert_eq!(policy.decide(CloseReason::Unauthorized, 0), RetryDecision::FailFast);
    assert_eq!(policy.decide(CloseReason::Forbidden, 0), RetryDecision::FailFast);
    assert!(matches!(policy.decide(CloseReason::NotFound, 0), RetryDecision::Retry { .. }));
}
