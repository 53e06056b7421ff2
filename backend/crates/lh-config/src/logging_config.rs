use crate::{ConfigError, ConfigErrorResult, DEFAULT_LOG_DIRECTORY, DEFAULT_LOG_LEVEL, LogLevel};

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub colored: bool,
    /// Log file name inside `dir`; stdout when unset
    pub file: Option<String>,
    /// Relative to the config directory
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel(DEFAULT_LOG_LEVEL),
            colored: true,
            file: None,
            dir: String::from(DEFAULT_LOG_DIRECTORY),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if Path::new(&self.dir).is_absolute() || self.dir.contains("..") {
            return Err(ConfigError::logging(
                "logging.dir must be relative and cannot contain '..'",
            ));
        }

        if let Some(file) = &self.file
            && (file.is_empty() || file.contains('/') || file.contains('\\'))
        {
            return Err(ConfigError::logging(format!(
                "logging.file must be a plain file name, got '{}'",
                file
            )));
        }

        Ok(())
    }
}
