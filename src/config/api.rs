//! Account service connection settings

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::account::HttpAccountConfig;

const MAX_TIMEOUT_SECS: u64 = 120;

/// Where the account service lives and how long to wait for it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settings for the HTTP account client.
    pub fn http_config(&self) -> HttpAccountConfig {
        HttpAccountConfig::new(self.base_url.clone()).with_timeout(self.timeout())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = Url::parse(&self.base_url)
            .map_err(|_| ValidationError::InvalidBaseUrl(self.base_url.clone()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout() -> u64 {
    10
}
