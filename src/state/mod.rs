//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `chat`, `order`) so components depend on
//! small focused models that are testable without a browser.

pub mod auth;
pub mod chat;
pub mod order;
