use crate::{
    AuthConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR_NAME, LoggingConfig, NotificationConfig, PreferencesConfig, RemoteConfig,
    StorageConfig,
};

use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub auth: AuthConfig,
    pub remote: RemoteConfig,
    pub storage: StorageConfig,
    pub preferences: PreferencesConfig,
    pub notifications: NotificationConfig,
    pub logging: LoggingConfig,
    /// Directory the configuration was loaded from
    #[serde(skip)]
    pub dir: PathBuf,
}

impl Config {
    /// Load config from the default directory.
    ///
    /// Loading order:
    /// 1. Check for LH_CONFIG_DIR env var, else use ./.lh/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply LH_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        Self::load_from(Self::config_dir()?)
    }

    /// Like [`load`](Self::load), with an explicit config directory
    pub fn load_from(config_dir: impl Into<PathBuf>) -> ConfigErrorResult<Self> {
        let config_dir = config_dir.into();

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.dir = config_dir;
        config.apply_env_overrides();
        Self::warn_legacy_config(&config.dir);

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: LH_CONFIG_DIR env var > ./.lh/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.auth.validate(&self.dir)?;
        self.remote.validate()?;
        self.storage.validate()?;
        self.notifications.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Absolute directory for local preference storage
    pub fn storage_dir(&self) -> PathBuf {
        self.dir.join(&self.storage.dir)
    }

    /// Absolute path of the RS256 public key, if configured
    pub fn jwt_public_key_file(&self) -> Option<PathBuf> {
        self.auth
            .jwt_public_key_path
            .as_ref()
            .map(|key_path| self.dir.join(key_path))
    }

    /// Absolute path of the log file, if logging to a file
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging
            .file
            .as_ref()
            .map(|file| self.dir.join(&self.logging.dir).join(file))
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded from {}:", self.dir.display());
        info!(
            "  auth: {} (dev-fallback: {}, leeway: {}s)",
            self.auth.scheme(),
            if self.auth.allow_dev_fallback {
                "allowed"
            } else {
                "rejected"
            },
            self.auth.leeway_secs
        );
        info!(
            "  remote: {} (timeout {}s)",
            self.remote.base_url.as_deref().unwrap_or("offline"),
            self.remote.timeout_secs
        );
        info!("  storage: {}", self.storage_dir().display());
        info!(
            "  preferences: force_light_theme={}",
            self.preferences.force_light_theme
        );
        info!(
            "  notifications: capacity={}",
            self.notifications.channel_capacity
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn warn_legacy_config(config_dir: &Path) {
        let Some(home) = dirs::home_dir() else {
            return;
        };

        let legacy_dir = home.join(DEFAULT_CONFIG_DIR_NAME);
        if legacy_dir != config_dir && legacy_dir.join(CONFIG_FILE_NAME).exists() {
            warn!(
                "Ignoring {}; configuration is read from {} (set {} to change)",
                legacy_dir.join(CONFIG_FILE_NAME).display(),
                config_dir.display(),
                CONFIG_DIR_ENV
            );
        }
    }

    /// `LH_*` variables win over config.toml
    fn apply_env_overrides(&mut self) {
        override_optional("LH_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);
        override_optional("LH_AUTH_JWT_PUBLIC_KEY_PATH", &mut self.auth.jwt_public_key_path);
        override_flag("LH_AUTH_ALLOW_DEV_FALLBACK", &mut self.auth.allow_dev_fallback);
        override_parsed("LH_AUTH_LEEWAY_SECS", &mut self.auth.leeway_secs);

        override_optional("LH_REMOTE_BASE_URL", &mut self.remote.base_url);
        override_parsed("LH_REMOTE_TIMEOUT_SECS", &mut self.remote.timeout_secs);

        override_parsed("LH_STORAGE_DIR", &mut self.storage.dir);

        override_flag("LH_PREFERENCES_FORCE_LIGHT_THEME", &mut self.preferences.force_light_theme);

        override_parsed(
            "LH_NOTIFICATIONS_CHANNEL_CAPACITY",
            &mut self.notifications.channel_capacity,
        );

        override_parsed("LH_LOG_LEVEL", &mut self.logging.level);
        override_flag("LH_LOG_COLORED", &mut self.logging.colored);
        override_optional("LH_LOG_FILE", &mut self.logging.file);
        override_parsed("LH_LOG_DIR", &mut self.logging.dir);
    }
}

fn env_value(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok()
}

fn override_parsed<T: FromStr>(var_name: &str, target: &mut T) {
    match env_value(var_name).map(|raw| raw.parse::<T>()) {
        Some(Ok(value)) => *target = value,
        Some(Err(_)) => warn!("Ignoring unparseable {}", var_name),
        None => {}
    }
}

/// `true` and `1` enable; any other value disables
fn override_flag(var_name: &str, target: &mut bool) {
    if let Some(raw) = env_value(var_name) {
        *target = matches!(raw.as_str(), "true" | "1");
    }
}

fn override_optional(var_name: &str, target: &mut Option<String>) {
    if let Some(raw) = env_value(var_name) {
        *target = Some(raw);
    }
}
