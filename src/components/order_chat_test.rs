use super::*;

#[test]
fn message_class_marks_own_messages() {
    assert_eq!(message_class(true), "order-chat__message order-chat__message--own");
    assert_eq!(message_class(false), "order-chat__message");
}

#[test]
fn composer_placeholder_reflects_activation_before_connection() {
    assert_eq!(composer_placeholder(false, true), "El chat no está disponible para esta orden");
    assert_eq!(composer_placeholder(false, false), "El chat no está disponible para esta orden");
    assert_eq!(composer_placeholder(true, false), "Conectando al chat...");
    assert_eq!(composer_placeholder(true, true), "Escribe un mensaje...");
}
