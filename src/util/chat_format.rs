//! Display helpers for the order chat.
//!
//! SYSTEM CONTEXT
//! ==============
//! Kept free of Leptos so the chat view's derived text is unit-testable.

#[cfg(test)]
#[path = "chat_format_test.rs"]
mod chat_format_test;

use crate::net::error::ChatError;
use crate::net::types::{ChatMessage, SenderRole};
use crate::state::chat::{ChannelState, ChatSession};

/// Status indicator text for the channel.
pub fn connection_label(session: &ChatSession) -> &'static str {
    if session.is_connected() {
        "Conectado"
    } else if session.is_reconnecting() {
        "Reconectando..."
    } else {
        "Desconectado"
    }
}

/// BEM modifier class for the status dot.
pub fn connection_class(session: &ChatSession) -> &'static str {
    if session.is_connected() {
        "order-chat__status order-chat__status--connected"
    } else if session.is_reconnecting() {
        "order-chat__status order-chat__status--reconnecting"
    } else {
        "order-chat__status order-chat__status--disconnected"
    }
}

/// The input accepts text only when the order allows chat and the channel is open.
pub fn input_enabled(enabled: bool, connected: bool) -> bool {
    enabled && connected
}

pub fn is_own_message(message: &ChatMessage, user_id: Option<i64>) -> bool {
    user_id == Some(message.sender)
}

pub fn role_label(role: SenderRole) -> &'static str {
    match role {
        SenderRole::Client => "Cliente",
        SenderRole::Worker => "Trabajador",
        SenderRole::Admin => "Administrador",
        SenderRole::Unknown => "Usuario",
    }
}

/// `HH:MM` of a message timestamp in the viewer's local time zone.
///
/// Timestamps without a zone suffix are shown as written. Anything that is
/// not an ISO 8601 date-time is returned unchanged.
pub fn format_message_time(timestamp: &str) -> String {
    local_clock(timestamp, local_offset_minutes(timestamp)).unwrap_or_else(|| timestamp.to_owned())
}

/// Wall-clock `HH:MM` of `timestamp` shifted to a zone `local_offset_minutes`
/// east of UTC.
fn local_clock(timestamp: &str, local_offset_minutes: i32) -> Option<String> {
    let (_, time) = timestamp.split_once('T')?;
    if time.get(2..3) != Some(":") {
        return None;
    }
    let hours: i32 = time.get(..2)?.parse().ok()?;
    let minutes: i32 = time.get(3..5)?.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    let rest = time.get(5..)?;
    let Some(zone_start) = rest.find(['Z', 'z', '+', '-']) else {
        return Some(format!("{hours:02}:{minutes:02}"));
    };
    let zone_offset = parse_zone_offset(&rest[zone_start..])?;

    let total = (hours * 60 + minutes - zone_offset + local_offset_minutes).rem_euclid(24 * 60);
    Some(format!("{:02}:{:02}", total / 60, total % 60))
}

/// Minutes east of UTC for `Z`, `+HH:MM`, `-HHMM`, or `+HH`.
fn parse_zone_offset(zone: &str) -> Option<i32> {
    if zone.eq_ignore_ascii_case("z") {
        return Some(0);
    }
    let sign = if zone.starts_with('-') { -1 } else { 1 };
    let digits: String = zone.get(1..)?.chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    Some(sign * (hours * 60 + minutes))
}

#[cfg(feature = "hydrate")]
#[allow(clippy::cast_possible_truncation)]
fn local_offset_minutes(timestamp: &str) -> i32 {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_str(timestamp));
    let date = if date.get_time().is_nan() { js_sys::Date::new_0() } else { date };
    // JS reports UTC minus local time.
    -(date.get_timezone_offset() as i32)
}

#[cfg(not(feature = "hydrate"))]
fn local_offset_minutes(_timestamp: &str) -> i32 {
    0
}

/// Whether the manual "retry" action should be offered.
///
/// Shown for retryable errors, and whenever an enabled chat has settled closed
/// (e.g. the server closed it normally) so the user is never stuck offline.
pub fn retry_available(session: &ChatSession) -> bool {
    if session.error().is_some_and(ChatError::retryable) {
        return true;
    }
    session.enabled() && !session.is_torn_down() && session.state() == ChannelState::Closed
}
