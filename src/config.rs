//! Client endpoint configuration resolved at build time.
//!
//! The WASM bundle has no process environment at runtime, so overrides are
//! read with `option_env!` when the bundle is compiled:
//!
//! - `FMW_WS_URL`: channel transport base (default `ws://localhost:8000`)
//! - `FMW_API_URL`: REST base (default `http://localhost:8000/api`)

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::net::transport::ReconnectPolicy;

pub const DEFAULT_WS_BASE: &str = "ws://localhost:8000";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub ws_base: String,
    pub api_base: String,
    pub reconnect: ReconnectPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

impl ClientConfig {
    /// Build config from the variables captured at compile time.
    pub fn from_build_env() -> Self {
        Self::from_values(option_env!("FMW_WS_URL"), option_env!("FMW_API_URL"))
    }

    /// Build config from optional overrides; blank values fall back to defaults.
    pub fn from_values(ws_base: Option<&str>, api_base: Option<&str>) -> Self {
        Self {
            ws_base: normalize_base(ws_base, DEFAULT_WS_BASE),
            api_base: normalize_base(api_base, DEFAULT_API_BASE),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

fn normalize_base(raw: Option<&str>, default: &str) -> String {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_owned()
}
