//! Error types for the domain layer.

use thiserror::Error;

/// Errors raised by local input validation.
///
/// These never reach the account service: a view that receives one renders
/// its `Display` text and stops before issuing any request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid username (3-16 characters: letters, digits, '.', '_' or '-')")]
    InvalidUsername { value: String },

    #[error("Invalid password (at least {min} characters)")]
    PasswordTooShort { min: usize, actual: usize },

    #[error("Invalid score (number >= 0)")]
    InvalidScore { input: String },

    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },
}

impl ValidationError {
    /// Creates an invalid username error.
    pub fn invalid_username(value: impl Into<String>) -> Self {
        ValidationError::InvalidUsername {
            value: value.into(),
        }
    }

    /// Creates a password length error.
    pub fn password_too_short(min: usize, actual: usize) -> Self {
        ValidationError::PasswordTooShort { min, actual }
    }

    /// Creates an invalid score error.
    pub fn invalid_score(input: impl Into<String>) -> Self {
        ValidationError::InvalidScore {
            input: input.into(),
        }
    }

    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_username_displays_pattern_hint() {
        let err = ValidationError::invalid_username("ab");
        assert_eq!(
            format!("{}", err),
            "Invalid username (3-16 characters: letters, digits, '.', '_' or '-')"
        );
    }

    #[test]
    fn password_too_short_displays_minimum() {
        let err = ValidationError::password_too_short(4, 3);
        assert_eq!(format!("{}", err), "Invalid password (at least 4 characters)");
    }

    #[test]
    fn invalid_score_displays_correctly() {
        let err = ValidationError::invalid_score("-1");
        assert_eq!(format!("{}", err), "Invalid score (number >= 0)");
    }

    #[test]
    fn empty_field_displays_correctly() {
        let err = ValidationError::empty_field("token");
        assert_eq!(format!("{}", err), "Field 'token' cannot be empty");
    }
}
