//! Order-chat session state: one logical channel per `(order, token, enabled)`.
//!
//! ARCHITECTURE
//! ============
//! `ChatSession` is a synchronous state machine. It never touches a socket or
//! a timer; instead, lifecycle methods return a `SessionCommand` that the
//! browser driver (`net::chat_socket`) executes. Socket and timer callbacks
//! come back in tagged with the epoch they were issued under, so callbacks from
//! a replaced or torn-down channel are dropped here instead of in the driver.
//!
//! ```text
//! Idle ──connect──▶ Connecting ──open──▶ Open
//!                      │  ▲                │
//!                 error│  │timer       close (retry-eligible)
//!                      ▼  │                ▼
//!                    Closed ◀──────── Reconnecting
//! ```
//!
//! TRADE-OFFS
//! ==========
//! There is no optimistic echo: a sent message is only listed once the server
//! broadcasts it back. The server stays the single source of ordering and ids.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::net::error::ChatError;
use crate::net::transport::{CloseReason, NORMAL_CLOSURE, ReconnectPolicy, RetryDecision, build_channel_url};
use crate::net::types::{ChatMessage, InboundFrame, MessageId, OutboundFrame};

/// Backend order identifier.
pub type OrderId = i64;

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

fn next_epoch() -> u64 {
    NEXT_EPOCH.fetch_add(1, Ordering::Relaxed)
}

/// Channel lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelState {
    /// Constructed, no connect attempted yet.
    #[default]
    Idle,
    /// Socket created; waiting for open.
    Connecting,
    Open,
    /// Dropped; a reconnect timer is pending.
    Reconnecting,
    /// Dropped with no timer pending, or torn down.
    Closed,
}

/// Side effect requested from the socket driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Tear down any live socket and pending timer, then open `url`.
    /// Callbacks for the new socket must report `epoch`.
    Open { url: String, epoch: u64 },
    /// Detach socket handlers, close with `code`, and cancel any pending timer.
    Close { code: u16 },
    /// Call `handle_reconnect_timer(epoch)` after `delay`.
    ScheduleReconnect { delay: Duration, epoch: u64 },
}

/// Client-side state of one order's chat channel.
#[derive(Clone, Debug)]
pub struct ChatSession {
    order_id: OrderId,
    token: String,
    enabled: bool,
    url: String,
    policy: ReconnectPolicy,
    state: ChannelState,
    attempts: u32,
    epoch: u64,
    torn_down: bool,
    messages: Vec<ChatMessage>,
    seen: HashSet<MessageId>,
    error: Option<ChatError>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(0, String::new(), false, &ClientConfig::default())
    }
}

impl ChatSession {
    pub fn new(order_id: OrderId, token: String, enabled: bool, config: &ClientConfig) -> Self {
        Self {
            order_id,
            url: build_channel_url(&config.ws_base, order_id, &token),
            token,
            enabled,
            policy: config.reconnect.clone(),
            state: ChannelState::Idle,
            attempts: 0,
            epoch: next_epoch(),
            torn_down: false,
            messages: Vec::new(),
            seen: HashSet::new(),
            error: None,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Consecutive reconnect attempts since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn error(&self) -> Option<&ChatError> {
        self.error.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.state == ChannelState::Open
    }

    /// True while a reconnect is pending or the retry socket is still handshaking.
    pub fn is_reconnecting(&self) -> bool {
        match self.state {
            ChannelState::Reconnecting => true,
            ChannelState::Connecting => self.attempts > 0,
            _ => false,
        }
    }

    fn can_activate(&self) -> bool {
        self.enabled && self.order_id > 0 && !self.token.is_empty() && !self.torn_down
    }

    fn is_current(&self, epoch: u64) -> bool {
        !self.torn_down && epoch == self.epoch
    }

    /// Begin connecting.
    ///
    /// No-op while a socket is already connecting or open, so overlapping
    /// triggers (identity change, timer, manual retry) cannot open two sockets.
    pub fn connect(&mut self) -> Option<SessionCommand> {
        if !self.can_activate() {
            return None;
        }
        if matches!(self.state, ChannelState::Connecting | ChannelState::Open) {
            return None;
        }
        self.epoch = next_epoch();
        self.state = ChannelState::Connecting;
        log::debug!("order chat {}: connecting (attempt {})", self.order_id, self.attempts);
        Some(SessionCommand::Open { url: self.url.clone(), epoch: self.epoch })
    }

    /// The socket reported open.
    pub fn handle_open(&mut self, epoch: u64) {
        if !self.is_current(epoch) || self.state != ChannelState::Connecting {
            return;
        }
        self.state = ChannelState::Open;
        self.attempts = 0;
        self.error = None;
        log::debug!("order chat {}: open", self.order_id);
    }

    /// The socket reported a transport error.
    ///
    /// Before open this closes the attempt; the close that follows decides
    /// whether to retry. After open the browser always follows with a close.
    pub fn handle_error(&mut self, epoch: u64) {
        if !self.is_current(epoch) {
            return;
        }
        if self.state == ChannelState::Connecting {
            self.state = ChannelState::Closed;
            self.fail(ChatError::ConnectionFailed);
        }
    }

    /// The socket closed with `code`.
    pub fn handle_close(&mut self, epoch: u64, code: u16) -> Option<SessionCommand> {
        if !self.is_current(epoch) || matches!(self.state, ChannelState::Idle | ChannelState::Reconnecting) {
            return None;
        }
        self.state = ChannelState::Closed;

        let reason = CloseReason::from_code(code);
        if let Some(error) = reason.error() {
            self.fail(error);
        }
        match self.policy.decide(reason, self.attempts) {
            RetryDecision::Settle => {
                log::debug!("order chat {}: closed ({}), not reconnecting", self.order_id, reason.code());
                None
            }
            RetryDecision::FailFast => {
                log::warn!("order chat {}: auth close {}, not retrying", self.order_id, reason.code());
                None
            }
            RetryDecision::Exhausted => {
                log::warn!("order chat {}: giving up after {} attempts", self.order_id, self.attempts);
                self.fail(ChatError::RetriesExhausted);
                None
            }
            RetryDecision::Retry { attempt, delay } => {
                self.attempts = attempt;
                self.state = ChannelState::Reconnecting;
                log::warn!(
                    "order chat {}: closed ({}), reconnect {attempt}/{} in {delay:?}",
                    self.order_id,
                    reason.code(),
                    self.policy.max_retries
                );
                Some(SessionCommand::ScheduleReconnect { delay, epoch: self.epoch })
            }
        }
    }

    /// A reconnect timer fired.
    pub fn handle_reconnect_timer(&mut self, epoch: u64) -> Option<SessionCommand> {
        if !self.is_current(epoch) || self.state != ChannelState::Reconnecting {
            return None;
        }
        self.connect()
    }

    /// Dispatch one inbound text frame.
    ///
    /// Malformed payloads are logged at debug level and otherwise ignored.
    pub fn handle_frame(&mut self, epoch: u64, payload: &str) {
        if !self.is_current(epoch) {
            return;
        }
        match serde_json::from_str::<InboundFrame>(payload) {
            Ok(InboundFrame::ChatMessage(message)) => self.push_message(message),
            Ok(InboundFrame::Error { message }) => {
                let text = if message.trim().is_empty() {
                    "Error en el chat".to_owned()
                } else {
                    message
                };
                self.fail(ChatError::Server(text));
            }
            Ok(InboundFrame::Unknown) => {}
            Err(e) => log::debug!("order chat {}: ignoring malformed frame: {e}", self.order_id),
        }
    }

    fn push_message(&mut self, message: ChatMessage) {
        if self.seen.insert(message.id) {
            self.messages.push(message);
        }
    }

    /// Validate and encode an outbound message.
    ///
    /// Returns `None`, with no side effect, when the channel is not open or
    /// the trimmed text is empty.
    pub fn outbound_payload(&self, text: &str) -> Option<String> {
        if self.state != ChannelState::Open {
            return None;
        }
        let message = text.trim();
        if message.is_empty() {
            return None;
        }
        serde_json::to_string(&OutboundFrame { message }).ok()
    }

    /// The transport refused an outbound frame. The channel is left as is.
    pub fn record_send_failure(&mut self, detail: impl Into<String>) {
        self.fail(ChatError::SendFailed(detail.into()));
    }

    fn fail(&mut self, error: ChatError) {
        log::debug!("order chat {}: {}", self.order_id, error.error_code());
        self.error = Some(error);
    }

    /// Merge a loaded history into the message list.
    ///
    /// History takes the front of the list in its own order; live messages that
    /// arrived first and are not part of it keep their relative order after it.
    /// An empty history leaves the list unchanged.
    pub fn seed_history(&mut self, history: Vec<ChatMessage>) {
        if history.is_empty() {
            return;
        }
        let mut seen = HashSet::with_capacity(history.len() + self.messages.len());
        let mut merged = Vec::with_capacity(history.len() + self.messages.len());
        for message in history.into_iter().chain(std::mem::take(&mut self.messages)) {
            if seen.insert(message.id) {
                merged.push(message);
            }
        }
        self.messages = merged;
        self.seen = seen;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Manual retry: forget prior attempts and open a fresh channel.
    pub fn reconnect(&mut self) -> Option<SessionCommand> {
        if !self.can_activate() {
            return None;
        }
        self.attempts = 0;
        self.error = None;
        self.state = ChannelState::Idle;
        self.connect()
    }

    /// Terminal teardown.
    ///
    /// Invalidates every outstanding socket and timer callback. Messages are
    /// kept so a disabled chat still shows its history.
    pub fn disconnect(&mut self) -> SessionCommand {
        self.torn_down = true;
        self.epoch = next_epoch();
        self.state = ChannelState::Closed;
        SessionCommand::Close { code: NORMAL_CLOSURE }
    }

    /// Tear this session down and build its replacement for a new identity.
    ///
    /// Messages carry over when the order is unchanged (e.g. a refreshed
    /// token). The replacement has not started connecting.
    pub fn successor(
        &mut self,
        order_id: OrderId,
        token: String,
        enabled: bool,
        config: &ClientConfig,
    ) -> (SessionCommand, ChatSession) {
        let close = self.disconnect();
        let mut next = ChatSession::new(order_id, token, enabled, config);
        if self.order_id == order_id {
            next.seed_history(self.messages.clone());
        }
        (close, next)
    }
}

/// Whether history for `order_id` must be fetched.
///
/// History loads once per order. A token refresh or a reconnect for an order
/// that already loaded does not fetch again.
pub fn history_load_needed(loaded_for: Option<OrderId>, order_id: OrderId, token: Option<&str>) -> bool {
    order_id > 0 && token.is_some_and(|t| !t.is_empty()) && loaded_for != Some(order_id)
}

/// Loading state of the REST message history for the mounted order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryState {
    pub loading: bool,
    pub error: Option<ChatError>,
    /// Order the current contents belong to.
    pub order_id: Option<OrderId>,
}

impl HistoryState {
    pub fn loading_for(order_id: OrderId) -> Self {
        Self { loading: true, error: None, order_id: Some(order_id) }
    }

    /// Record a finished load. Ignored when a load for another order took over.
    pub fn finish(&mut self, order_id: OrderId, error: Option<ChatError>) -> bool {
        if self.order_id != Some(order_id) {
            return false;
        }
        self.loading = false;
        self.error = error;
        true
    }
}
