use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Remote constraints
pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings service endpoint. Without `base_url` the app runs offline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API root, e.g. `https://example.com/api`
    pub base_url: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(base_url) = &self.base_url
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            return Err(ConfigError::remote(format!(
                "remote.base_url must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        if self.timeout_secs < MIN_TIMEOUT_SECS || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::remote(format!(
                "remote.timeout_secs must be {}-{}, got {}",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS, self.timeout_secs
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
