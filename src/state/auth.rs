//! Session identity surface.
//!
//! Authentication itself is an external collaborator; this core only needs
//! who the user is and whether a session exists, so analysis requests can
//! carry the requesting user id.

/// Minimal view of the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    user_id: String,
    username: Option<String>,
    authenticated: bool,
}

impl AuthState {
    /// Creates a signed-out state for a configured user identity.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: None,
            authenticated: false,
        }
    }

    /// Marks the session authenticated under `username`.
    pub fn login(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
        self.authenticated = true;
    }

    /// Clears the session.
    pub fn logout(&mut self) {
        self.username = None;
        self.authenticated = false;
    }

    /// Whether a session is active.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Stable user identity attached to analysis requests.
    ///
    /// Independent of the logged-in display name.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Display name of the active session, when logged in.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}
