//! Browser driver for the order-chat session.
//!
//! `use_order_chat` owns one `ChatSession` per mounted chat view and executes
//! the `SessionCommand`s it emits against a `web_sys::WebSocket` and a
//! `gloo-timers` timeout. It also runs the one-shot history load.
//!
//! All socket logic is gated behind `#[cfg(feature = "hydrate")]` since it
//! requires a browser environment; other builds get an inert handle.
//!
//! ERROR HANDLING
//! ==============
//! Socket construction and send failures are logged and folded into session
//! state. Nothing here panics or propagates an error to the view.
//!
//! TEARDOWN
//! ========
//! Handlers are detached from a socket before it is closed, the reconnect
//! timer is dropped (which cancels it), and the history fetch is aborted. The
//! session epoch guard covers any callback that was already queued.

use leptos::prelude::*;

use crate::config::ClientConfig;
use crate::net::error::ChatError;
use crate::net::types::ChatMessage;
use crate::state::chat::{ChatSession, HistoryState, OrderId};

#[cfg(feature = "hydrate")]
use std::cell::RefCell;
#[cfg(feature = "hydrate")]
use std::rc::{Rc, Weak};

#[cfg(feature = "hydrate")]
use crate::net::transport::{ABNORMAL_CLOSURE, NORMAL_CLOSURE};
#[cfg(feature = "hydrate")]
use crate::state::chat::{SessionCommand, history_load_needed};

/// Reactive handle to one order's chat channel.
#[derive(Clone, Copy)]
pub struct OrderChatHandle {
    pub session: RwSignal<ChatSession>,
    pub history: RwSignal<HistoryState>,
    #[cfg(feature = "hydrate")]
    driver: StoredValue<Rc<RefCell<ChannelDriver>>, LocalStorage>,
}

impl OrderChatHandle {
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.session.with(|s| s.messages().to_vec())
    }

    pub fn is_connected(&self) -> bool {
        self.session.with(ChatSession::is_connected)
    }

    pub fn is_reconnecting(&self) -> bool {
        self.session.with(ChatSession::is_reconnecting)
    }

    pub fn error(&self) -> Option<ChatError> {
        self.session.with(|s| s.error().cloned())
    }

    pub fn history_loading(&self) -> bool {
        self.history.with(|h| h.loading)
    }

    pub fn clear_error(&self) {
        self.session.update(ChatSession::clear_error);
    }

    /// Send `text` on the open channel.
    ///
    /// Returns `false` if the channel is not open, the text is blank, or the
    /// transport refused the frame; callers keep their draft in that case.
    pub fn send_message(&self, text: &str) -> bool {
        let Some(payload) = self.session.with_untracked(|s| s.outbound_payload(text)) else {
            return false;
        };

        #[cfg(feature = "hydrate")]
        {
            match self.driver.try_with_value(|d| d.borrow().send(&payload)) {
                Some(Ok(())) => true,
                Some(Err(e)) => {
                    log::warn!("order chat send failed: {e}");
                    self.session.update(|s| s.record_send_failure(e));
                    false
                }
                None => false,
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = payload;
            false
        }
    }

    /// Manual retry after an error or exhausted reconnects.
    pub fn reconnect(&self) {
        let Some(Some(command)) = self.session.try_update(ChatSession::reconnect) else {
            return;
        };

        #[cfg(feature = "hydrate")]
        {
            let session = self.session;
            let _ = self.driver.try_with_value(|d| apply(session, d, command));
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = command;
        }
    }

    /// Explicit teardown; the view stays mounted with its messages.
    pub fn disconnect(&self) {
        let Some(command) = self.session.try_update(ChatSession::disconnect) else {
            return;
        };

        #[cfg(feature = "hydrate")]
        {
            let session = self.session;
            let _ = self.driver.try_with_value(|d| apply(session, d, command));
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = command;
        }
    }
}

/// Bind a chat channel to the calling component.
///
/// A new session replaces the current one whenever `order_id`, `token`, or
/// `enabled` changes; history loads once per order. Everything is torn down
/// when the owning component is cleaned up.
pub fn use_order_chat(
    order_id: Signal<OrderId>,
    token: Signal<Option<String>>,
    enabled: Signal<bool>,
) -> OrderChatHandle {
    let config = use_context::<ClientConfig>().unwrap_or_else(ClientConfig::from_build_env);
    let session = RwSignal::new(ChatSession::default());
    let history = RwSignal::new(HistoryState::default());

    #[cfg(feature = "hydrate")]
    {
        let driver = Rc::new(RefCell::new(ChannelDriver::default()));
        let stored = StoredValue::new_local(Rc::clone(&driver));

        let channel_driver = Rc::clone(&driver);
        let channel_config = config.clone();
        Effect::new(move |previous: Option<ChannelKey>| {
            let key = ChannelKey {
                order_id: order_id.get(),
                token: token.get().unwrap_or_default(),
                enabled: enabled.get(),
            };
            if previous.as_ref() != Some(&key) {
                restart_channel(session, &channel_driver, &channel_config, &key);
            }
            key
        });

        let history_driver = driver;
        let api_base = config.api_base;
        Effect::new(move |loaded_for: Option<Option<OrderId>>| {
            let loaded_for = loaded_for.flatten();
            let order = order_id.get();
            let token = token.get();
            if !history_load_needed(loaded_for, order, token.as_deref()) {
                return loaded_for;
            }
            start_history_load(session, history, &history_driver, api_base.clone(), order, token.unwrap_or_default());
            Some(order)
        });

        on_cleanup(move || {
            if let Some(command) = session.try_update(ChatSession::disconnect) {
                let _ = stored.try_with_value(|d| apply(session, d, command));
            }
            let _ = stored.try_with_value(|d| d.borrow_mut().abort_history());
        });

        OrderChatHandle { session, history, driver: stored }
    }

    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (order_id, token, enabled, config);
        OrderChatHandle { session, history }
    }
}

#[cfg(feature = "hydrate")]
#[derive(Clone, Debug, PartialEq, Eq)]
struct ChannelKey {
    order_id: OrderId,
    token: String,
    enabled: bool,
}

/// Replace the current session with its successor for `key` and connect it.
#[cfg(feature = "hydrate")]
fn restart_channel(
    session: RwSignal<ChatSession>,
    driver: &Rc<RefCell<ChannelDriver>>,
    config: &ClientConfig,
    key: &ChannelKey,
) {
    let outgoing =
        session.try_update(|s| s.successor(key.order_id, key.token.clone(), key.enabled, config));
    let Some((close, mut next)) = outgoing else {
        return;
    };
    apply(session, driver, close);

    let open = next.connect();
    session.set(next);
    if let Some(open) = open {
        apply(session, driver, open);
    }
}

#[cfg(feature = "hydrate")]
fn start_history_load(
    session: RwSignal<ChatSession>,
    history: RwSignal<HistoryState>,
    driver: &Rc<RefCell<ChannelDriver>>,
    api_base: String,
    order_id: OrderId,
    token: String,
) {
    use futures::future::{AbortHandle, Abortable};

    let (handle, registration) = AbortHandle::new_pair();
    if let Some(previous) = driver.borrow_mut().history_fetch.replace(handle) {
        previous.abort();
    }
    history.set(HistoryState::loading_for(order_id));

    leptos::task::spawn_local(async move {
        let fetch = crate::net::api::load_order_history(&api_base, order_id, &token);
        let Ok(load) = Abortable::new(fetch, registration).await else {
            return;
        };
        history.try_update(|h| h.finish(order_id, load.error.clone()));
        session.try_update(|s| {
            if s.order_id() == order_id {
                s.seed_history(load.messages);
            }
        });
    });
}

/// Execute one session command.
#[cfg(feature = "hydrate")]
fn apply(session: RwSignal<ChatSession>, driver: &Rc<RefCell<ChannelDriver>>, command: SessionCommand) {
    match command {
        SessionCommand::Open { url, epoch } => {
            let opened = {
                let mut d = driver.borrow_mut();
                d.cancel_reconnect();
                d.close_socket(NORMAL_CLOSURE);
                LiveChannel::open(&url, epoch, session, Rc::downgrade(driver)).map(|channel| d.socket = Some(channel))
            };
            if let Err(e) = opened {
                log::warn!("order chat socket failed to open: {e}");
                session.try_update(|s| s.handle_error(epoch));
                if let Some(next) = session.try_update(|s| s.handle_close(epoch, ABNORMAL_CLOSURE)).flatten() {
                    apply(session, driver, next);
                }
            }
        }
        SessionCommand::Close { code } => {
            let mut d = driver.borrow_mut();
            d.cancel_reconnect();
            d.close_socket(code);
        }
        SessionCommand::ScheduleReconnect { delay, epoch } => {
            let weak = Rc::downgrade(driver);
            let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
            let timer = gloo_timers::callback::Timeout::new(millis, move || {
                let Some(driver) = weak.upgrade() else {
                    return;
                };
                if let Some(next) = session.try_update(|s| s.handle_reconnect_timer(epoch)).flatten() {
                    apply(session, &driver, next);
                }
            });
            let mut d = driver.borrow_mut();
            d.close_socket(NORMAL_CLOSURE);
            d.reconnect_timer = Some(timer);
        }
    }
}

/// Browser resources behind one mounted chat view.
#[cfg(feature = "hydrate")]
#[derive(Default)]
struct ChannelDriver {
    socket: Option<LiveChannel>,
    reconnect_timer: Option<gloo_timers::callback::Timeout>,
    history_fetch: Option<futures::future::AbortHandle>,
}

#[cfg(feature = "hydrate")]
impl ChannelDriver {
    fn cancel_reconnect(&mut self) {
        // Dropping a pending Timeout clears it.
        self.reconnect_timer.take();
    }

    fn close_socket(&mut self, code: u16) {
        if let Some(socket) = self.socket.take() {
            socket.shutdown(code);
        }
    }

    fn abort_history(&mut self) {
        if let Some(handle) = self.history_fetch.take() {
            handle.abort();
        }
    }

    fn send(&self, payload: &str) -> Result<(), String> {
        self.socket
            .as_ref()
            .ok_or_else(|| "channel is not open".to_owned())?
            .send(payload)
    }
}

#[cfg(feature = "hydrate")]
impl Drop for ChannelDriver {
    fn drop(&mut self) {
        self.cancel_reconnect();
        self.close_socket(NORMAL_CLOSURE);
        self.abort_history();
    }
}

/// A `WebSocket` plus the closures registered as its handlers.
#[cfg(feature = "hydrate")]
struct LiveChannel {
    ws: web_sys::WebSocket,
    _on_open: wasm_bindgen::closure::Closure<dyn FnMut(web_sys::Event)>,
    _on_message: wasm_bindgen::closure::Closure<dyn FnMut(web_sys::MessageEvent)>,
    _on_error: wasm_bindgen::closure::Closure<dyn FnMut(web_sys::Event)>,
    _on_close: wasm_bindgen::closure::Closure<dyn FnMut(web_sys::CloseEvent)>,
}

#[cfg(feature = "hydrate")]
impl LiveChannel {
    fn open(
        url: &str,
        epoch: u64,
        session: RwSignal<ChatSession>,
        driver: Weak<RefCell<ChannelDriver>>,
    ) -> Result<Self, String> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let ws = web_sys::WebSocket::new(url).map_err(|e| format!("{e:?}"))?;

        let on_open = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            session.try_update(|s| s.handle_open(epoch));
        });
        let on_message = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |ev: web_sys::MessageEvent| {
            if let Some(text) = ev.data().as_string() {
                session.try_update(|s| s.handle_frame(epoch, &text));
            }
        });
        let on_error = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            session.try_update(|s| s.handle_error(epoch));
        });
        let on_close = Closure::<dyn FnMut(web_sys::CloseEvent)>::new(move |ev: web_sys::CloseEvent| {
            let next = session.try_update(|s| s.handle_close(epoch, ev.code())).flatten();
            if let (Some(next), Some(driver)) = (next, driver.upgrade()) {
                apply(session, &driver, next);
            }
        });

        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        Ok(Self { ws, _on_open: on_open, _on_message: on_message, _on_error: on_error, _on_close: on_close })
    }

    fn send(&self, payload: &str) -> Result<(), String> {
        self.ws.send_with_str(payload).map_err(|e| format!("{e:?}"))
    }

    /// Detach every handler, then close if the socket is still live.
    fn shutdown(self, code: u16) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);

        let state = self.ws.ready_state();
        if state == web_sys::WebSocket::CONNECTING || state == web_sys::WebSocket::OPEN {
            if let Err(e) = self.ws.close_with_code(code) {
                log::warn!("order chat close failed: {e:?}");
            }
        }
    }
}
