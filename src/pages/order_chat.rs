//! Order chat page: `/orders/:id/chat`.
//!
//! ARCHITECTURE
//! ============
//! The page turns the route parameter into an order id, loads the order once
//! per id to learn its status, and hands both to `OrderChat`. Whether the
//! channel may open is decided by the order status, not by this page.

#[cfg(test)]
#[path = "order_chat_test.rs"]
mod order_chat_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::components::order_chat::OrderChat;
use crate::config::ClientConfig;
use crate::net::types::OrderSummary;
use crate::state::auth::AuthState;
use crate::state::chat::OrderId;
use crate::util::auth::install_unauth_redirect;

const ORDER_LOAD_FAILED: &str = "No se pudo cargar la orden.";

/// Parse the `:id` route segment; anything but a positive integer is `0`.
fn parse_order_id(raw: Option<&str>) -> OrderId {
    raw.and_then(|s| s.trim().parse::<OrderId>().ok()).filter(|id| *id > 0).unwrap_or(0)
}

fn page_title(order_id: OrderId, order: Option<&OrderSummary>) -> String {
    match order.and_then(|o| o.title.as_deref()).map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!("Orden #{order_id} · {title}"),
        None => format!("Orden #{order_id}"),
    }
}

#[component]
pub fn OrderChatPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let config = expect_context::<ClientConfig>();
    let params = use_params_map();
    install_unauth_redirect(auth, use_navigate());

    let order_id = Signal::derive(move || parse_order_id(params.read().get("id").as_deref()));
    let order = RwSignal::new(None::<OrderSummary>);
    let load_error = RwSignal::new(None::<String>);
    let api_base = config.api_base;

    Effect::new(move |loaded_for: Option<Option<OrderId>>| {
        let loaded_for = loaded_for.flatten();
        let id = order_id.get();
        let Some(token) = auth.get().token.filter(|t| !t.is_empty()) else {
            return loaded_for;
        };
        if id <= 0 || loaded_for == Some(id) {
            return loaded_for;
        }

        order.set(None);
        load_error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let api_base = api_base.clone();
            leptos::task::spawn_local(async move {
                let result = crate::net::api::fetch_order(&api_base, id, &token).await;
                if order_id.get_untracked() != id {
                    return;
                }
                match result {
                    Ok(summary) => order.set(Some(summary)),
                    Err(e) => {
                        log::warn!("order {id} failed to load: {e}");
                        load_error.set(Some(ORDER_LOAD_FAILED.to_owned()));
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api_base, token);
        }

        Some(id)
    });

    let status = Signal::derive(move || order.get().map(|o| o.status));
    let title = move || order.with(|o| page_title(order_id.get(), o.as_ref()));

    view! {
        <div class="order-chat-page">
            <Show
                when=move || { order_id.get() > 0 }
                fallback=|| view! { <p class="order-chat-page__error">"Orden no válida."</p> }
            >
                <h1 class="order-chat-page__title">{title}</h1>
                <Show when=move || load_error.get().is_some()>
                    <p class="order-chat-page__error">{move || load_error.get().unwrap_or_default()}</p>
                </Show>
                <OrderChat order_id=order_id order_status=status/>
            </Show>
        </div>
    }
}
