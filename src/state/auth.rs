//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The login flow lives outside this crate and leaves a bearer token plus a
//! cached user record in `localStorage`. The chat reads them, never writes them.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::CurrentUser;

/// Authentication state tracking the bearer token, user, and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<CurrentUser>,
    pub loading: bool,
}

impl AuthState {
    /// Signed-in user's ID, if known.
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }
}

/// Whether the route should bounce to login.
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.token.as_deref().is_none_or(|t| t.trim().is_empty())
}
