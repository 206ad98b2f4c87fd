//! Account client port for the remote account service.
//!
//! Views consume this port; the navigation controller only uses
//! `get_profile` for the startup session check. Implementations exist for
//! HTTP (`ReqwestAccountClient`) and for tests (`MockAccountClient`).
//!
//! # Error contract
//!
//! Every failure carries an HTTP-equivalent status (except transport
//! failures) and the server's message when one was supplied. Only
//! [`AccountError::Unauthorized`] is meaningful to the session lifecycle;
//! every other variant is display-only.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{Password, SessionToken};
use crate::domain::{Profile, ProfilePatch};

/// Username and password submitted by the login and registration forms.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Password,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: Password) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Successful login: the issued token and, when the service sends it, the
/// signed-in profile.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: SessionToken,
    pub profile: Option<Profile>,
}

/// Parameters for listing users on the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListUsersQuery {
    pub limit: u32,
    pub sort_descending_by_score: bool,
}

impl ListUsersQuery {
    /// Top `limit` users, highest score first.
    pub fn top(limit: u32) -> Self {
        Self {
            limit,
            sort_descending_by_score: true,
        }
    }
}

/// Failures reported by the account service or the transport under it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("{}", message_or(.message, "Request rejected by the server"))]
    Validation { status: u16, message: Option<String> },

    #[error("{}", message_or(.message, "User already exists"))]
    Conflict { message: Option<String> },

    #[error("{}", message_or(.message, "Session expired or invalid"))]
    Unauthorized { message: Option<String> },

    #[error("{}", message_or(.message, "Not found"))]
    NotFound { message: Option<String> },

    #[error("{}", message_or(.message, "Server error"))]
    Server { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Network(String),
}

fn message_or<'a>(message: &'a Option<String>, fallback: &'a str) -> &'a str {
    message.as_deref().filter(|m| !m.is_empty()).unwrap_or(fallback)
}

impl AccountError {
    /// Classifies a non-success HTTP status and optional server message.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            400 | 422 => AccountError::Validation { status, message },
            401 => AccountError::Unauthorized { message },
            404 => AccountError::NotFound { message },
            409 => AccountError::Conflict { message },
            _ => AccountError::Server { status, message },
        }
    }

    pub fn unauthorized() -> Self {
        AccountError::Unauthorized { message: None }
    }

    pub fn network(message: impl Into<String>) -> Self {
        AccountError::Network(message.into())
    }

    /// HTTP-equivalent status. `None` when the request never completed.
    pub fn status(&self) -> Option<u16> {
        match self {
            AccountError::Validation { status, .. } | AccountError::Server { status, .. } => {
                Some(*status)
            }
            AccountError::Conflict { .. } => Some(409),
            AccountError::Unauthorized { .. } => Some(401),
            AccountError::NotFound { .. } => Some(404),
            AccountError::Network(_) => None,
        }
    }

    /// The message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AccountError::Validation { message, .. }
            | AccountError::Conflict { message }
            | AccountError::Unauthorized { message }
            | AccountError::NotFound { message }
            | AccountError::Server { message, .. } => message.as_deref(),
            AccountError::Network(_) => None,
        }
    }

    /// Returns true if the session must be discarded.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AccountError::Unauthorized { .. })
    }

    /// Text shown to the user: the server message, else a generic one.
    pub fn display_message(&self) -> String {
        self.to_string()
    }
}

/// Operations offered by the remote account service.
#[async_trait]
pub trait AccountClient: Send + Sync {
    /// Creates an account. Does not sign the user in.
    async fn register(&self, credentials: &Credentials) -> Result<(), AccountError>;

    /// Exchanges credentials for a session token.
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AccountError>;

    /// Fetches a profile. Also used to check that a stored token is still valid.
    async fn get_profile(
        &self,
        username: &str,
        token: &SessionToken,
    ) -> Result<Profile, AccountError>;

    /// Applies a partial update to the user's data and returns the new profile.
    async fn update_data(
        &self,
        username: &str,
        patch: &ProfilePatch,
        token: &SessionToken,
    ) -> Result<Profile, AccountError>;

    /// Lists user profiles for the scoreboard.
    async fn list_users(
        &self,
        query: &ListUsersQuery,
        token: &SessionToken,
    ) -> Result<Vec<Profile>, AccountError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_classifies_codes() {
        assert!(matches!(
            AccountError::from_status(400, None),
            AccountError::Validation { status: 400, .. }
        ));
        assert!(matches!(
            AccountError::from_status(422, None),
            AccountError::Validation { status: 422, .. }
        ));
        assert!(AccountError::from_status(401, None).is_unauthorized());
        assert!(matches!(
            AccountError::from_status(404, None),
            AccountError::NotFound { .. }
        ));
        assert!(matches!(
            AccountError::from_status(409, None),
            AccountError::Conflict { .. }
        ));
        assert!(matches!(
            AccountError::from_status(503, None),
            AccountError::Server { status: 503, .. }
        ));
        assert!(matches!(
            AccountError::from_status(403, None),
            AccountError::Server { status: 403, .. }
        ));
    }

    #[test]
    fn status_round_trips_for_http_errors() {
        for code in [400, 401, 404, 409, 422, 500] {
            assert_eq!(AccountError::from_status(code, None).status(), Some(code));
        }
        assert_eq!(AccountError::network("refused").status(), None);
    }

    #[test]
    fn display_prefers_server_message() {
        let err = AccountError::from_status(409, Some("Username taken".to_string()));
        assert_eq!(err.display_message(), "Username taken");
        assert_eq!(err.server_message(), Some("Username taken"));
    }

    #[test]
    fn display_falls_back_to_generic_message() {
        assert_eq!(
            AccountError::unauthorized().display_message(),
            "Session expired or invalid"
        );
        assert_eq!(
            AccountError::from_status(500, Some(String::new())).display_message(),
            "Server error"
        );
        assert_eq!(
            AccountError::network("connection refused").display_message(),
            "Network error: connection refused"
        );
    }

    #[test]
    fn only_unauthorized_requires_session_clear() {
        assert!(AccountError::unauthorized().is_unauthorized());
        assert!(!AccountError::from_status(404, None).is_unauthorized());
        assert!(!AccountError::from_status(500, None).is_unauthorized());
        assert!(!AccountError::network("timeout").is_unauthorized());
    }

    #[test]
    fn account_client_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn AccountClient) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn AccountClient>>();
    }
}
