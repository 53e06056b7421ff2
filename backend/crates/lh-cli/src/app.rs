use crate::{CliError, Commands, Result as CliErrorResult};

use std::str::FromStr;
use std::sync::Arc;

use lh_auth::{IdentityResolver, JwtAlgorithm, JwtVerifier, ResolveOptions};
use lh_config::{Config, ConfigError};
use lh_core::{Clock, Role, SystemClock};
use lh_settings::{
    FileStorage, HttpRemoteSync, NotificationBus, OfflineRemote, PreferenceStore, RemoteSync,
    SyncCoordinator,
};
use log::{debug, info};
use serde_json::{Value, json};

/// Parse a command-line setting value: JSON when it parses, a plain string
/// otherwise
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Everything one `lh` invocation needs, built from validated config
pub struct App {
    resolver: IdentityResolver,
    coordinator: SyncCoordinator,
}

impl App {
    pub fn from_config(config: &Config) -> CliErrorResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> CliErrorResult<Self> {
        let mut resolver = IdentityResolver::new(Arc::clone(&clock))
            .with_dev_fallback(config.auth.allow_dev_fallback)
            .with_leeway_secs(config.auth.leeway_secs);
        if let Some(verifier) = Self::verifier(config)? {
            resolver = resolver.with_verifier(verifier);
        }

        let storage = Arc::new(FileStorage::open(config.storage_dir())?);
        let store = PreferenceStore::new(storage, Arc::clone(&clock))
            .with_light_theme_override(config.preferences.force_light_theme);

        let remote: Arc<dyn RemoteSync> = match &config.remote.base_url {
            Some(base_url) => Arc::new(HttpRemoteSync::new(
                base_url,
                config.remote.timeout(),
                Arc::clone(&clock),
            )?),
            None => {
                info!("No remote.base_url configured; preferences stay local");
                Arc::new(OfflineRemote)
            }
        };

        let bus = NotificationBus::new(config.notifications.channel_capacity);
        let coordinator = SyncCoordinator::new(store, remote, bus, clock)
            .with_leeway_secs(config.auth.leeway_secs);

        Ok(Self {
            resolver,
            coordinator,
        })
    }

    fn verifier(config: &Config) -> CliErrorResult<Option<JwtVerifier>> {
        let algorithm = if let Some(secret) = &config.auth.jwt_secret {
            JwtAlgorithm::HS256 {
                secret: secret.as_bytes().to_vec(),
            }
        } else if let Some(key_file) = config.jwt_public_key_file() {
            let public_key_pem =
                std::fs::read_to_string(&key_file).map_err(|e| CliError::JwtKeyFile {
                    path: key_file.display().to_string(),
                    source: e,
                })?;
            JwtAlgorithm::RS256 { public_key_pem }
        } else {
            return Ok(None);
        };

        let verifier = JwtVerifier::from_algorithm(&algorithm)
            .map_err(|e| ConfigError::auth(format!("Unusable JWT key: {}", e)))?;
        debug!("JWT verification: {}", verifier.algorithm());
        Ok(Some(verifier))
    }

    pub fn coordinator(&self) -> &SyncCoordinator {
        &self.coordinator
    }

    /// Execute one command and return its JSON output
    pub async fn run(&self, command: Commands) -> CliErrorResult<Value> {
        match command {
            Commands::Resolve {
                credential,
                require_role,
            } => {
                let opts = match require_role {
                    Some(role) => ResolveOptions::require(Role::from_str(&role)?),
                    None => ResolveOptions::default(),
                };
                let identity = self.resolver.resolve(Some(&credential), &opts)?;
                Ok(serde_json::to_value(identity)?)
            }
            Commands::Login { credential } => {
                let session = self
                    .resolver
                    .resolve_session(Some(&credential), &ResolveOptions::default())?;
                let document = self.coordinator.establish_identity(session).await?;
                self.describe(&document)
            }
            Commands::Show => {
                let document = self.coordinator.resume().await?;
                self.describe(&document)
            }
            Commands::Set { key, value } => {
                self.coordinator.resume().await?;
                let document = self.coordinator.set_preference(&key, parse_value(&value))?;
                self.describe(&document)
            }
            Commands::Logout => {
                self.coordinator.resume().await?;
                let document = self.coordinator.logout()?;
                self.describe(&document)
            }
        }
    }

    /// Wait for background pushes before the process exits
    pub async fn flush(&self) {
        self.coordinator.flush().await;
    }

    fn describe(&self, document: &lh_core::PreferenceDocument) -> CliErrorResult<Value> {
        let context = self.coordinator.current();
        let user_id = context.user_id();

        Ok(json!({
            "userId": user_id,
            "syncState": user_id.map(|user_id| self.coordinator.state(user_id)),
            "settings": serde_json::to_value(document)?,
        }))
    }
}
