//! Order-chat channel addressing, reconnect policy, and close-code taxonomy.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pure data shared by the session state machine (`state::chat`) and the
//! browser socket driver (`net::chat_socket`). Nothing here holds state.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use super::error::ChatError;
use crate::state::chat::OrderId;

/// Bounded number of automatic reconnect attempts after the channel drops.
pub const MAX_RETRIES: u32 = 5;
/// Delay between automatic reconnect attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(3);
/// Upper bound applied when `backoff_factor` grows the delay.
pub const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

/// Intentional close by either side.
pub const NORMAL_CLOSURE: u16 = 1000;
/// Close reported by the browser when the socket dropped without a close frame.
pub const ABNORMAL_CLOSURE: u16 = 1006;
/// Bearer token missing, invalid, or expired.
pub const UNAUTHORIZED: u16 = 4001;
/// Caller is not a participant of the order.
pub const FORBIDDEN: u16 = 4003;
/// Order does not exist or is not visible to the caller.
pub const NOT_FOUND: u16 = 4004;
/// Server confirms the chat is closed for this order.
pub const CHAT_INACTIVE: u16 = 4005;

/// Build the channel endpoint for one order.
///
/// The token is embedded verbatim; the server is authoritative on its validity.
pub fn build_channel_url(ws_base: &str, order_id: OrderId, token: &str) -> String {
    let base = ws_base.trim_end_matches('/');
    format!("{base}/ws/chat/{order_id}/?token={token}")
}

/// Semantic meaning of a transport close code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseReason {
    NormalClosure,
    Unauthorized,
    Forbidden,
    NotFound,
    ChatInactive,
    /// Any other code, e.g. a dropped network connection.
    Transient(u16),
}

impl CloseReason {
    pub fn from_code(code: u16) -> Self {
        match code {
            NORMAL_CLOSURE => Self::NormalClosure,
            UNAUTHORIZED => Self::Unauthorized,
            FORBIDDEN => Self::Forbidden,
            NOT_FOUND => Self::NotFound,
            CHAT_INACTIVE => Self::ChatInactive,
            other => Self::Transient(other),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            Self::NormalClosure => NORMAL_CLOSURE,
            Self::Unauthorized => UNAUTHORIZED,
            Self::Forbidden => FORBIDDEN,
            Self::NotFound => NOT_FOUND,
            Self::ChatInactive => CHAT_INACTIVE,
            Self::Transient(code) => code,
        }
    }

    /// Business-terminal closes never schedule a reconnect.
    pub fn suppresses_reconnect(self) -> bool {
        matches!(self, Self::NormalClosure | Self::ChatInactive)
    }

    /// Closes that a retry with the same credential cannot fix.
    pub fn is_auth_failure(self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden)
    }

    /// User-facing error carried by this close, if any.
    pub fn error(self) -> Option<ChatError> {
        match self {
            Self::Unauthorized => Some(ChatError::SessionExpired),
            Self::Forbidden => Some(ChatError::Forbidden),
            Self::NotFound => Some(ChatError::OrderNotFound),
            Self::NormalClosure | Self::ChatInactive | Self::Transient(_) => None,
        }
    }
}

/// Automatic reconnect limits for one channel session.
///
/// With the default `backoff_factor` of `1.0` every attempt waits `delay`.
/// Larger factors grow the wait geometrically up to `max_delay`; the attempt
/// bound is unaffected either way.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub delay: Duration,
    pub backoff_factor: f64,
    pub max_delay: Duration,
    /// Stop after the first 4001/4003 close instead of spending retries on it.
    pub fail_fast_on_auth: bool,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            delay: RECONNECT_DELAY,
            backoff_factor: 1.0,
            max_delay: MAX_RECONNECT_DELAY,
            fail_fast_on_auth: false,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before the given 1-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = if self.backoff_factor.is_finite() && self.backoff_factor > 1.0 {
            self.backoff_factor
        } else {
            return self.delay;
        };
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.delay.as_secs_f64() * factor.powi(exponent);
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay.max(self.delay);
        }
        Duration::from_secs_f64(secs)
    }

    /// Decide what a session does after a close with `reason`, given
    /// `attempts` automatic retries already spent since the last open.
    pub fn decide(&self, reason: CloseReason, attempts: u32) -> RetryDecision {
        if reason.suppresses_reconnect() {
            return RetryDecision::Settle;
        }
        if self.fail_fast_on_auth && reason.is_auth_failure() {
            return RetryDecision::FailFast;
        }
        if attempts >= self.max_retries {
            return RetryDecision::Exhausted;
        }
        let attempt = attempts + 1;
        RetryDecision::Retry { attempt, delay: self.delay_for(attempt) }
    }
}

/// Outcome of `ReconnectPolicy::decide`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Normal or chat-inactive close: stop without an error.
    Settle,
    /// Auth close under `fail_fast_on_auth`.
    FailFast,
    /// The retry bound is reached.
    Exhausted,
    /// Schedule the 1-based `attempt` after `delay`.
    Retry { attempt: u32, delay: Duration },
}
