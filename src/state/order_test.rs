use super::*;

#[test]
fn chat_allowed_only_for_active_statuses() {
    for status in CHAT_ENABLED_STATUSES {
        assert!(can_chat_in_status(status), "{status}");
    }
    for status in ["PENDING", "COMPLETED", "CANCELLED", "REJECTED", "", "accepted", " ACCEPTED", "UNKNOWN"] {
        assert!(!can_chat_in_status(status), "{status:?}");
    }
}

#[test]
fn notice_absent_when_chat_allowed() {
    assert_eq!(chat_unavailable_notice("IN_PROGRESS"), None);
}

#[test]
fn notice_explains_closed_statuses() {
    assert_eq!(
        chat_unavailable_notice("PENDING"),
        Some("El chat estará disponible cuando el trabajador acepte la orden.")
    );
    assert_eq!(
        chat_unavailable_notice("CANCELLED"),
        Some("La orden fue cancelada. El chat está cerrado.")
    );
    assert_eq!(
        chat_unavailable_notice(""),
        Some("El chat no está disponible para esta orden.")
    );
}
