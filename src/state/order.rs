//! Chat activation policy for orders.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend owns order status transitions. The client only decides, from the
//! status literal, whether the chat input and channel may be active.

#[cfg(test)]
#[path = "order_test.rs"]
mod order_test;

/// Order statuses in which both parties may chat.
pub const CHAT_ENABLED_STATUSES: [&str; 3] = ["ACCEPTED", "IN_ESCROW", "IN_PROGRESS"];

/// Whether the chat may be active for an order in `status`.
pub fn can_chat_in_status(status: &str) -> bool {
    CHAT_ENABLED_STATUSES.iter().any(|allowed| *allowed == status)
}

/// Localized explanation shown when the chat is not active, or `None` when it is.
pub fn chat_unavailable_notice(status: &str) -> Option<&'static str> {
    if can_chat_in_status(status) {
        return None;
    }
    Some(match status {
        "PENDING" => "El chat estará disponible cuando el trabajador acepte la orden.",
        "COMPLETED" => "La orden fue completada. El chat es de solo lectura.",
        "CANCELLED" => "La orden fue cancelada. El chat está cerrado.",
        _ => "El chat no está disponible para esta orden.",
    })
}
