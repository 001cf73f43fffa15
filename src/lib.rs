//! # findmyworker-client
//!
//! Leptos + WASM client for the FindMyWorker marketplace order chat.
//!
//! This crate contains the order chat page and component, reactive state
//! models, REST helpers, and the WebSocket driver that runs one chat session
//! per mounted view. Connection logic lives in `state::chat` as a plain state
//! machine so it can be tested natively; `net::chat_socket` binds it to the
//! browser.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered `App`.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
