use super::*;

#[test]
fn display_is_localized_user_text() {
    assert_eq!(
        ChatError::RetriesExhausted.to_string(),
        "No se pudo conectar al chat. Recarga la página."
    );
    assert_eq!(ChatError::Server("Orden cerrada".to_owned()).to_string(), "Orden cerrada");
    assert_eq!(
        ChatError::SendFailed("socket closed".to_owned()).to_string(),
        "No se pudo enviar el mensaje: socket closed"
    );
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(ChatError::SessionExpired.error_code(), "E_SESSION_EXPIRED");
    assert_eq!(ChatError::OrderNotFound.error_code(), "E_ORDER_NOT_FOUND");
    assert_eq!(ChatError::HistoryUnavailable.error_code(), "E_HISTORY_UNAVAILABLE");
}

#[test]
fn retryable_only_for_connectivity_failures() {
    assert!(ChatError::ConnectionFailed.retryable());
    assert!(ChatError::RetriesExhausted.retryable());
    assert!(!ChatError::SessionExpired.retryable());
    assert!(!ChatError::Forbidden.retryable());
    assert!(!ChatError::Server("x".to_owned()).retryable());
}
