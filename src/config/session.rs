//! Session persistence settings

use std::path::PathBuf;

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// File the session is written to when `persist` is on
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Keep the session across restarts
    #[serde(default = "default_persist")]
    pub persist: bool,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.persist && self.store_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyStorePath);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            persist: default_persist(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".score-portal/session.yaml")
}

fn default_persist() -> bool {
    true
}
