//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render chat surfaces while reading shared state from Leptos
//! context providers.

pub mod order_chat;
