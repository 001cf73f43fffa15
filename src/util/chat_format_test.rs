use super::*;
use crate::config::ClientConfig;
use crate::state::chat::SessionCommand;

fn message(sender: i64) -> ChatMessage {
    ChatMessage {
        id: 1,
        content: "Hola".to_owned(),
        sender,
        sender_name: "Ana".to_owned(),
        sender_role: SenderRole::Client,
        timestamp: "2026-01-01T10:00:00Z".to_owned(),
    }
}

#[test]
fn connection_label_tracks_state() {
    let mut s = ChatSession::new(38, "t1".to_owned(), true, &ClientConfig::default());
    assert_eq!(connection_label(&s), "Desconectado");

    let Some(SessionCommand::Open { epoch, .. }) = s.connect() else {
        panic!("expected open");
    };
    s.handle_open(epoch);
    assert_eq!(connection_label(&s), "Conectado");
    assert!(connection_class(&s).ends_with("--connected"));

    assert!(s.handle_close(epoch, 1006).is_some());
    assert_eq!(connection_label(&s), "Reconectando...");
    assert!(connection_class(&s).ends_with("--reconnecting"));
}

#[test]
fn input_enabled_requires_both_flags() {
    assert!(input_enabled(true, true));
    assert!(!input_enabled(false, true));
    assert!(!input_enabled(true, false));
}

#[test]
fn own_message_matches_sender() {
    assert!(is_own_message(&message(7), Some(7)));
    assert!(!is_own_message(&message(7), Some(8)));
    assert!(!is_own_message(&message(7), None));
}

#[test]
fn role_labels_are_localized() {
    assert_eq!(role_label(SenderRole::Worker), "Trabajador");
    assert_eq!(role_label(SenderRole::Unknown), "Usuario");
}

#[test]
fn format_message_time_extracts_hours_and_minutes() {
    assert_eq!(format_message_time("2026-01-01T10:00:00Z"), "10:00");
    assert_eq!(format_message_time("2026-01-01T09:05:33.123456+00:00"), "09:05");
    assert_eq!(format_message_time("2026-01-01T23:59"), "23:59");
}

#[test]
fn format_message_time_falls_back_to_raw_value() {
    assert_eq!(format_message_time("2026-01-01"), "2026-01-01");
    assert_eq!(format_message_time("yesterday"), "yesterday");
    assert_eq!(format_message_time(""), "");
}

#[test]
fn local_clock_shifts_zoned_timestamps_to_local_offset() {
    // UTC-5 viewer.
    assert_eq!(local_clock("2026-01-01T10:00:00Z", -300).as_deref(), Some("05:00"));
    // UTC+2 viewer, wrapping past midnight.
    assert_eq!(local_clock("2026-01-01T23:30:00Z", 120).as_deref(), Some("01:30"));
    // Source offset is removed before the local one is applied.
    assert_eq!(local_clock("2026-01-01T10:00:00-03:00", 0).as_deref(), Some("13:00"));
    assert_eq!(local_clock("2026-01-01T10:15:00.5+0530", 0).as_deref(), Some("04:45"));
}

#[test]
fn local_clock_keeps_unzoned_times_as_written() {
    assert_eq!(local_clock("2026-01-01T10:00:00", -300).as_deref(), Some("10:00"));
    assert_eq!(local_clock("2026-01-01T25:00:00Z", 0), None);
    assert_eq!(local_clock("2026-01-01T10:00:00+xx", 0), None);
}

#[test]
fn retry_offered_after_normal_close_on_enabled_chat() {
    let mut s = ChatSession::new(38, "t1".to_owned(), true, &ClientConfig::default());
    assert!(!retry_available(&s));

    let Some(SessionCommand::Open { epoch, .. }) = s.connect() else {
        panic!("expected open");
    };
    assert!(!retry_available(&s));
    s.handle_open(epoch);
    assert!(!retry_available(&s));

    assert_eq!(s.handle_close(epoch, 1000), None);
    assert_eq!(s.error(), None);
    assert!(retry_available(&s));
    assert!(s.reconnect().is_some());
}

#[test]
fn retry_not_offered_while_reconnecting_or_disabled() {
    let mut s = ChatSession::new(38, "t1".to_owned(), true, &ClientConfig::default());
    let Some(SessionCommand::Open { epoch, .. }) = s.connect() else {
        panic!("expected open");
    };
    assert!(s.handle_close(epoch, 1006).is_some());
    assert!(!retry_available(&s));

    let disabled = ChatSession::new(38, "t1".to_owned(), false, &ClientConfig::default());
    assert!(!retry_available(&disabled));
}

#[test]
fn retry_offered_for_retryable_errors() {
    let mut s = ChatSession::new(38, "t1".to_owned(), true, &ClientConfig::default());
    s.record_send_failure("socket closed");
    assert!(retry_available(&s));
}
