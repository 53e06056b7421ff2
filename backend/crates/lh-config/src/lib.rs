mod auth_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod notification_config;
mod preferences_config;
mod remote_config;
mod storage_config;

pub use auth_config::AuthConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use notification_config::NotificationConfig;
pub use preferences_config::PreferencesConfig;
pub use remote_config::RemoteConfig;
pub use storage_config::StorageConfig;

const CONFIG_DIR_ENV: &str = "LH_CONFIG_DIR";
const DEFAULT_CONFIG_DIR_NAME: &str = ".lh";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

#[cfg(test)]
mod tests;
