//! Shared auth helpers: stored session lookup and unauthenticated redirect.
//!
//! TRADE-OFFS
//! ==========
//! Storage access is best-effort browser-only behavior; SSR and native builds
//! see an empty session.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

#[cfg(any(test, feature = "hydrate"))]
use crate::net::types::CurrentUser;
use crate::state::auth::{AuthState, should_redirect_unauth};

/// Storage keys checked for the bearer token, in priority order.
#[cfg(any(test, feature = "hydrate"))]
const TOKEN_KEYS: [&str; 2] = ["token", "access_token"];
#[cfg(feature = "hydrate")]
const USER_KEY: &str = "user";

/// First non-blank candidate, in `TOKEN_KEYS` order.
#[cfg(any(test, feature = "hydrate"))]
fn pick_token<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|t| t.trim().to_owned())
        .find(|t| !t.is_empty())
}

#[cfg(any(test, feature = "hydrate"))]
fn parse_stored_user(raw: &str) -> Option<CurrentUser> {
    serde_json::from_str(raw).ok()
}

/// Read the stored session written by the login flow.
pub fn load_stored_session() -> AuthState {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return AuthState::default();
        };
        let token = pick_token(TOKEN_KEYS.iter().map(|key| storage.get_item(key).ok().flatten()));
        let user = storage
            .get_item(USER_KEY)
            .ok()
            .flatten()
            .and_then(|raw| parse_stored_user(&raw));
        AuthState { token, user, loading: false }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        AuthState { loading: true, ..AuthState::default() }
    }
}

/// Redirect to `/login` whenever auth has loaded and no token is present.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&auth.get()) {
            navigate("/login", NavigateOptions::default());
        }
    });
}
