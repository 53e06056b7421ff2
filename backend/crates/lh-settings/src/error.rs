use std::path::PathBuf;

use error_location::ErrorLocation;
use lh_core::CoreError;
use thiserror::Error;

/// Local tier failures. The local tier is the last line of durability, so
/// these are reported to the caller rather than swallowed.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize '{key}': {source} {location}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Local storage unavailable: {message} {location}")]
    Unavailable {
        message: String,
        location: ErrorLocation,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Remote tier could not be used. Recovered locally: logged, never surfaced
/// to the caller of a setting change.
#[derive(Error, Debug)]
pub enum SyncUnavailable {
    #[error("No user id; remote sync skipped {location}")]
    MissingUserId { location: ErrorLocation },

    #[error("No remote configured {location}")]
    Offline { location: ErrorLocation },

    #[error("Remote returned HTTP {status} {location}")]
    Status { status: u16, location: ErrorLocation },

    #[error("Remote request failed: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    #[error("Malformed remote response: {message} {location}")]
    MalformedResponse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Remote rejected request: {message} {location}")]
    Rejected {
        message: String,
        location: ErrorLocation,
    },

    #[error("Remote has no settings stored {location}")]
    Empty { location: ErrorLocation },
}

/// Failures of coordinator operations that the caller must see
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    InvalidSetting(#[from] CoreError),
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
