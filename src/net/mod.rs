//! Network layer for the order chat.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` holds channel constants and close-code policy, `api` the REST
//! calls, and `chat_socket` the browser driver that runs a `ChatSession`.

pub mod api;
pub mod chat_socket;
pub mod error;
pub mod transport;
pub mod types;
