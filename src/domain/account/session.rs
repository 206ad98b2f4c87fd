//! The authenticated session held by the client.

use crate::domain::foundation::SessionToken;

/// Credential and identity of the signed-in user.
///
/// Created on login, written and cleared only through the
/// [`SessionStore`](crate::ports::SessionStore) port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub username: String,
}

impl Session {
    pub fn new(token: SessionToken, username: impl Into<String>) -> Self {
        Self {
            token,
            username: username.into(),
        }
    }
}
