//! Synchronous form validation performed before any network call.

use once_cell::sync::Lazy;
use regex::Regex;

use super::foundation::{Password, ValidationError};

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]{3,16}$").expect("username pattern is valid")
});

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Rows requested when the scoreboard limit is blank or unparsable.
pub const DEFAULT_SCOREBOARD_LIMIT: u32 = 20;

/// Upper bound on the scoreboard limit.
pub const MAX_SCOREBOARD_LIMIT: u32 = 100;

/// Trims and checks a username against the account naming rules.
pub fn validate_username(raw: &str) -> Result<String, ValidationError> {
    let username = raw.trim();
    if USERNAME_PATTERN.is_match(username) {
        Ok(username.to_string())
    } else {
        Err(ValidationError::invalid_username(username))
    }
}

pub fn validate_password(password: &Password) -> Result<(), ValidationError> {
    let actual = password.char_len();
    if actual < MIN_PASSWORD_LEN {
        return Err(ValidationError::password_too_short(MIN_PASSWORD_LEN, actual));
    }
    Ok(())
}

/// Parses a score field. Scores are whole numbers and never negative.
pub fn parse_score(raw: &str) -> Result<i64, ValidationError> {
    match raw.trim().parse::<i64>() {
        Ok(score) if score >= 0 => Ok(score),
        _ => Err(ValidationError::invalid_score(raw)),
    }
}

/// Parses the scoreboard limit, falling back to the default and clamping
/// to `1..=MAX_SCOREBOARD_LIMIT`.
pub fn clamp_scoreboard_limit(raw: Option<&str>) -> u32 {
    let parsed = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(i64::from(DEFAULT_SCOREBOARD_LIMIT));

    parsed.clamp(1, i64::from(MAX_SCOREBOARD_LIMIT)) as u32
}
