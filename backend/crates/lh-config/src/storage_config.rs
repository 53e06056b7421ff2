use crate::{ConfigError, ConfigErrorResult};

use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_STORAGE_DIR: &str = "settings";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the local preference files, relative to the config
    /// directory
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: String::from(DEFAULT_STORAGE_DIR),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.dir.is_empty() {
            return Err(ConfigError::storage("storage.dir cannot be empty"));
        }

        if Path::new(&self.dir).is_absolute() || self.dir.contains("..") {
            return Err(ConfigError::storage(
                "storage.dir must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }
}
