//! Account profiles as returned by the account service.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A user profile with its free-form data bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub data: ProfileData,
}

/// Profile data. Only `score` is interpreted; other keys are preserved.
///
/// The service stores whatever clients wrote, so `score` accepts any JSON
/// number or numeric string. Anything else reads as no score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub score: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let score = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(score.filter(|s| s.is_finite()))
}

impl Profile {
    /// Creates a profile with just a username and an integer score.
    pub fn with_score(username: impl Into<String>, score: i64) -> Self {
        Self {
            username: Some(username.into()),
            data: ProfileData {
                score: Some(score as f64),
                extra: Map::new(),
            },
        }
    }

    /// The score, treating a missing value as zero.
    pub fn score(&self) -> f64 {
        self.data.score.unwrap_or(0.0)
    }
}

/// Partial data sent by an update; absent fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

impl ProfilePatch {
    pub fn score(score: i64) -> Self {
        Self { score: Some(score) }
    }
}
