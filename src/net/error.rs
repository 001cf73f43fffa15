//! User-visible chat failures.
//!
//! ERROR HANDLING
//! ==============
//! Every failure in the chat subsystem is absorbed into one of these variants
//! and rendered as a banner; none of them escape as a panic or rejected future.
//! `Display` is the localized text shown to the user.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors surfaced by the order-chat session and history loader.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// Channel closed with 4001.
    #[error("Tu sesión ha expirado. Inicia sesión nuevamente.")]
    SessionExpired,

    /// Channel closed with 4003.
    #[error("No tienes permiso para acceder a este chat.")]
    Forbidden,

    /// Channel closed with 4004.
    #[error("La orden no existe o no está disponible.")]
    OrderNotFound,

    /// Transport error before the channel opened.
    #[error("Error de conexión con el chat.")]
    ConnectionFailed,

    /// Automatic reconnects are exhausted; the user must retry or reload.
    #[error("No se pudo conectar al chat. Recarga la página.")]
    RetriesExhausted,

    /// Server-reported error carried by a `type=error` frame.
    #[error("{0}")]
    Server(String),

    /// The transport refused an outbound frame.
    #[error("No se pudo enviar el mensaje: {0}")]
    SendFailed(String),

    /// The message history request failed.
    #[error("No se pudo cargar el historial de mensajes.")]
    HistoryUnavailable,
}

impl ChatError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SessionExpired => "E_SESSION_EXPIRED",
            Self::Forbidden => "E_FORBIDDEN",
            Self::OrderNotFound => "E_ORDER_NOT_FOUND",
            Self::ConnectionFailed => "E_CONNECTION_FAILED",
            Self::RetriesExhausted => "E_RETRIES_EXHAUSTED",
            Self::Server(_) => "E_SERVER",
            Self::SendFailed(_) => "E_SEND_FAILED",
            Self::HistoryUnavailable => "E_HISTORY_UNAVAILABLE",
        }
    }

    /// Whether the manual "retry" action can plausibly clear this error.
    pub fn retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed | Self::RetriesExhausted | Self::SendFailed(_))
    }
}
