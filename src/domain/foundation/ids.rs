//! Strongly-typed credential value objects.

use secrecy::{ExposeSecret, Secret};
use std::fmt;

use super::ValidationError;

/// Opaque bearer credential issued by the account service.
///
/// Wrapped in [`Secret`] so it is redacted from `Debug` output and logs.
#[derive(Clone)]
pub struct SessionToken(Secret<String>);

impl SessionToken {
    /// Creates a token, returning error if empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ValidationError::empty_field("token"));
        }
        Ok(Self(Secret::new(token)))
    }

    /// Exposes the raw token for an outgoing request or for persistence.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for SessionToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SessionToken {}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// Password typed into a login or registration form.
#[derive(Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(Secret::new(password.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.expose().chars().count()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}
