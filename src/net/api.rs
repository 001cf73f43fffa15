//! REST API helpers for the order chat.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native builds: stubs returning errors, since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result`/`HistoryLoad` outputs instead of panics so fetch
//! failures degrade to banners without crashing hydration.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::error::ChatError;
use super::types::{ChatMessage, OrderSummary};
use crate::state::chat::OrderId;

#[cfg(any(test, feature = "hydrate"))]
fn order_endpoint(api_base: &str, order_id: OrderId) -> String {
    format!("{}/orders/{order_id}/", api_base.trim_end_matches('/'))
}

#[cfg(any(test, feature = "hydrate"))]
fn order_messages_endpoint(api_base: &str, order_id: OrderId) -> String {
    format!("{}/orders/{order_id}/messages/", api_base.trim_end_matches('/'))
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(any(test, feature = "hydrate"))]
fn request_failed_message(what: &str, status: u16) -> String {
    format!("{what} request failed: {status}")
}

/// Decode a history body: `{messages: [...]}`, `{results: [...]}`, or a bare list.
///
/// Entries that fail to decode are skipped rather than failing the whole load.
#[cfg(any(test, feature = "hydrate"))]
fn parse_history_body(body: &serde_json::Value) -> Result<Vec<ChatMessage>, String> {
    let items = match body {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => {
            match map.get("messages").or_else(|| map.get("results")) {
                Some(serde_json::Value::Array(items)) => items,
                Some(_) => return Err("history message list is not an array".to_owned()),
                None => return Err("history body has no message list".to_owned()),
            }
        }
        _ => return Err("unexpected history body".to_owned()),
    };
    Ok(items
        .iter()
        .filter_map(|item| match serde_json::from_value::<ChatMessage>(item.clone()) {
            Ok(message) => Some(message),
            Err(e) => {
                log::debug!("skipping undecodable history entry: {e}");
                None
            }
        })
        .collect())
}

/// Outcome of one history load: never an `Err`, so callers can render both parts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryLoad {
    pub messages: Vec<ChatMessage>,
    pub error: Option<ChatError>,
}

impl HistoryLoad {
    fn from_result(result: Result<Vec<ChatMessage>, String>) -> Self {
        match result {
            Ok(messages) => Self { messages, error: None },
            Err(e) => {
                log::warn!("message history failed: {e}");
                Self { messages: Vec::new(), error: Some(ChatError::HistoryUnavailable) }
            }
        }
    }
}

/// Fetch `GET /orders/{id}/messages/`.
///
/// # Errors
///
/// Returns an error string if the request fails, the server responds with a
/// non-OK status, or the body is not a message list.
pub async fn fetch_order_messages(api_base: &str, order_id: OrderId, token: &str) -> Result<Vec<ChatMessage>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(&order_messages_endpoint(api_base, order_id))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(request_failed_message("history", resp.status()));
        }
        let body: serde_json::Value = resp.json().await.map_err(|e| e.to_string())?;
        parse_history_body(&body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api_base, order_id, token);
        Err("not available on server".to_owned())
    }
}

/// Load the message history for an order once, folding failure into the result.
pub async fn load_order_history(api_base: &str, order_id: OrderId, token: &str) -> HistoryLoad {
    HistoryLoad::from_result(fetch_order_messages(api_base, order_id, token).await)
}

/// Fetch `GET /orders/{id}/` for the status the activation policy needs.
///
/// # Errors
///
/// Returns an error string if the request fails or the server responds with a
/// non-OK status.
pub async fn fetch_order(api_base: &str, order_id: OrderId, token: &str) -> Result<OrderSummary, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(&order_endpoint(api_base, order_id))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(request_failed_message("order", resp.status()));
        }
        resp.json::<OrderSummary>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api_base, order_id, token);
        Err("not available on server".to_owned())
    }
}
