use crate::{ConfigError, ConfigErrorResult};

use std::path::Path;

use serde::Deserialize;

// Auth constraints
pub const MIN_JWT_SECRET_LENGTH: usize = 32;
pub const MAX_LEEWAY_SECS: u64 = 300;
pub const DEFAULT_LEEWAY_SECS: u64 = 0;
pub const DEFAULT_ALLOW_DEV_FALLBACK: bool = true;

/// Credential verification settings.
///
/// At most one of `jwt_secret` (HS256) and `jwt_public_key_path` (RS256) may
/// be set. With neither, JWTs are accepted without a signature check.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    /// PEM file, relative to the config directory
    pub jwt_public_key_path: Option<String>,
    /// Accept `dev-fallback` credentials
    pub allow_dev_fallback: bool,
    /// Clock skew tolerated on `exp`
    pub leeway_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_public_key_path: None,
            allow_dev_fallback: DEFAULT_ALLOW_DEV_FALLBACK,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self, config_dir: &Path) -> ConfigErrorResult<()> {
        if self.jwt_secret.is_some() && self.jwt_public_key_path.is_some() {
            return Err(ConfigError::auth(
                "auth.jwt_secret and auth.jwt_public_key_path are mutually exclusive",
            ));
        }

        if let Some(secret) = &self.jwt_secret
            && secret.len() < MIN_JWT_SECRET_LENGTH
        {
            return Err(ConfigError::auth(format!(
                "auth.jwt_secret must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        if let Some(key_path) = &self.jwt_public_key_path {
            if Path::new(key_path).is_absolute() {
                return Err(ConfigError::auth(
                    "auth.jwt_public_key_path must be relative to the config directory",
                ));
            }
            if key_path.contains("..") {
                return Err(ConfigError::auth(
                    "auth.jwt_public_key_path cannot contain '..'",
                ));
            }

            let full_path = config_dir.join(key_path);
            if !full_path.exists() {
                return Err(ConfigError::auth(format!(
                    "auth.jwt_public_key_path does not exist: {}",
                    full_path.display()
                )));
            }
        }

        if self.leeway_secs > MAX_LEEWAY_SECS {
            return Err(ConfigError::auth(format!(
                "auth.leeway_secs must be 0-{}, got {}",
                MAX_LEEWAY_SECS, self.leeway_secs
            )));
        }

        Ok(())
    }

    /// Name of the configured signature scheme, for logging
    pub fn scheme(&self) -> &'static str {
        if self.jwt_secret.is_some() {
            "HS256"
        } else if self.jwt_public_key_path.is_some() {
            "RS256"
        } else {
            "unverified"
        }
    }
}
