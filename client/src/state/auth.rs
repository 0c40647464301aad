//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering.

use crate::net::types::User;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

impl AuthState {
    /// State before `/api/auth/me` has answered.
    #[must_use]
    pub fn pending() -> Self {
        Self { user: None, loading: true }
    }

    #[must_use]
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user), loading: false }
    }
}
