use lh_auth::ResolutionError;
use lh_config::ConfigError;
use lh_core::CoreError;
use lh_settings::{StoreError, SyncError, SyncUnavailable};
use thiserror::Error;

/// Process exit code for authentication failures
pub const EXIT_AUTH_FAILURE: u8 = 2;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read JWT key file {path}: {source}")]
    JwtKeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Authentication failed ({code}): {source}")]
    Auth {
        code: &'static str,
        #[source]
        source: ResolutionError,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] CoreError),

    #[error("Local storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Remote setup error: {0}")]
    Remote(#[from] SyncUnavailable),

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<ResolutionError> for CliError {
    fn from(source: ResolutionError) -> Self {
        CliError::Auth {
            code: source.error_code(),
            source,
        }
    }
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Auth { .. } => EXIT_AUTH_FAILURE,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
