//! Order chat panel: status indicator, message list, and composer.
//!
//! DESIGN
//! ======
//! Everything rendered here is derived from the `OrderChatHandle` plus the
//! order's status. The only local state is the draft text in the input box.

#[cfg(test)]
#[path = "order_chat_test.rs"]
mod order_chat_test;

use leptos::prelude::*;

use crate::net::chat_socket::use_order_chat;
use crate::net::types::ChatMessage;
use crate::state::auth::AuthState;
use crate::state::chat::OrderId;
use crate::state::order::{can_chat_in_status, chat_unavailable_notice};
use crate::util::chat_format::{
    connection_class, connection_label, format_message_time, input_enabled, is_own_message, retry_available,
    role_label,
};

const HISTORY_SKELETON_ROWS: usize = 3;

fn message_class(own: bool) -> &'static str {
    if own { "order-chat__message order-chat__message--own" } else { "order-chat__message" }
}

fn composer_placeholder(enabled: bool, connected: bool) -> &'static str {
    if !enabled {
        "El chat no está disponible para esta orden"
    } else if connected {
        "Escribe un mensaje..."
    } else {
        "Conectando al chat..."
    }
}

fn render_message(msg: &ChatMessage, user_id: Option<i64>) -> impl IntoView + use<> {
    let class = message_class(is_own_message(msg, user_id));
    let name = msg.sender_name.clone();
    let role = role_label(msg.sender_role);
    let time = format_message_time(&msg.timestamp);
    let content = msg.content.clone();
    view! {
        <div class=class>
            <div class="order-chat__meta">
                <span class="order-chat__author">{name}</span>
                <span class="order-chat__role">{role}</span>
                <time class="order-chat__time">{time}</time>
            </div>
            <p class="order-chat__text">{content}</p>
        </div>
    }
}

/// Chat view for one order.
///
/// `order_status` is `None` while the order is still loading; the channel
/// stays idle until a chat-enabled status arrives.
#[component]
pub fn OrderChat(
    #[prop(into)] order_id: Signal<OrderId>,
    #[prop(into)] order_status: Signal<Option<String>>,
) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let token = Signal::derive(move || auth.get().token);
    let enabled = Signal::derive(move || order_status.get().as_deref().is_some_and(can_chat_in_status));
    let chat = use_order_chat(order_id, token, enabled);

    let input = RwSignal::new(String::new());
    let messages_ref = NodeRef::<leptos::html::Div>::new();

    Effect::new(move || {
        let _ = chat.session.with(|s| s.messages().len());

        #[cfg(feature = "hydrate")]
        {
            if let Some(el) = messages_ref.get() {
                let scroll_height = el.scroll_height();
                el.set_scroll_top(scroll_height);
            }
        }
    });

    let can_type = move || input_enabled(enabled.get(), chat.is_connected());
    let can_send = move || can_type() && !input.get().trim().is_empty();

    let do_send = move || {
        // Keep the draft if the frame did not go out.
        if chat.send_message(&input.get_untracked()) {
            input.set(String::new());
        }
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            do_send();
        }
    };

    let notice = move || order_status.get().as_deref().and_then(chat_unavailable_notice);
    let history_error = move || chat.history.with(|h| h.error.as_ref().map(ToString::to_string));
    let session_error = move || chat.error().map(|e| e.to_string());
    let can_retry = move || chat.session.with(retry_available);

    view! {
        <section class="order-chat">
            <header class="order-chat__header">
                <span class=move || chat.session.with(connection_class)></span>
                <span class="order-chat__status-label">{move || chat.session.with(connection_label)}</span>
                <Show when=can_retry>
                    <button class="btn order-chat__retry" on:click=move |_| chat.reconnect()>
                        "Reintentar"
                    </button>
                </Show>
            </header>

            <Show when=move || notice().is_some()>
                <p class="order-chat__notice">{move || notice().unwrap_or_default()}</p>
            </Show>

            <Show when=move || history_error().is_some()>
                <div class="order-chat__banner order-chat__banner--history">
                    {move || history_error().unwrap_or_default()}
                </div>
            </Show>

            <Show when=move || session_error().is_some()>
                <div class="order-chat__banner" role="alert">
                    <span>{move || session_error().unwrap_or_default()}</span>
                    <button class="order-chat__dismiss" on:click=move |_| chat.clear_error()>
                        "×"
                    </button>
                </div>
            </Show>

            <div class="order-chat__messages" node_ref=messages_ref>
                {move || {
                    let messages = chat.messages();
                    if messages.is_empty() && chat.history_loading() {
                        return (0..HISTORY_SKELETON_ROWS)
                            .map(|_| view! { <div class="order-chat__skeleton"></div> })
                            .collect::<Vec<_>>()
                            .into_any();
                    }
                    if messages.is_empty() {
                        return view! {
                            <div class="order-chat__empty">"Aún no hay mensajes"</div>
                        }
                            .into_any();
                    }

                    let user_id = auth.with(AuthState::user_id);
                    messages
                        .iter()
                        .map(|msg| render_message(msg, user_id))
                        .collect::<Vec<_>>()
                        .into_any()
                }}
            </div>

            <div class="order-chat__input-row">
                <input
                    class="order-chat__input"
                    type="text"
                    placeholder=move || composer_placeholder(enabled.get(), chat.is_connected())
                    prop:value=move || input.get()
                    disabled=move || !can_type()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                />
                <button
                    class="btn btn--primary order-chat__send"
                    on:click=move |_| do_send()
                    disabled=move || !can_send()
                >
                    "Enviar"
                </button>
            </div>
        </section>
    }
}
