use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use http::StatusCode;
use lh_core::Role;
use thiserror::Error;

/// Structural problems with a raw credential. Never retried.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Empty credential {location}")]
    Empty { location: ErrorLocation },

    #[error("Malformed simplified token: {message} {location}")]
    MalformedSimplified {
        message: String,
        location: ErrorLocation,
    },

    #[error("Malformed JWT: {message} {location}")]
    MalformedJwt {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unrecognized credential format {location}")]
    UnrecognizedFormat { location: ErrorLocation },
}

impl DecodeError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "EMPTY_CREDENTIAL",
            Self::MalformedSimplified { .. } => "MALFORMED_SIMPLIFIED_TOKEN",
            Self::MalformedJwt { .. } => "MALFORMED_JWT",
            Self::UnrecognizedFormat { .. } => "UNRECOGNIZED_FORMAT",
        }
    }
}

/// Reasons a request could not be authenticated or authorized
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Missing credential {location}")]
    MissingCredential { location: ErrorLocation },

    #[error("Credential decode failed: {source} {location}")]
    Decode {
        #[source]
        source: DecodeError,
        location: ErrorLocation,
    },

    #[error("Invalid signature: {message} {location}")]
    InvalidSignature {
        message: String,
        location: ErrorLocation,
    },

    #[error("Credential expired at {expired_at} {location}")]
    ExpiredCredential {
        expired_at: DateTime<Utc>,
        location: ErrorLocation,
    },

    #[error("Insufficient role: requires {required}, has {actual} {location}")]
    InsufficientRole {
        required: Role,
        actual: Role,
        location: ErrorLocation,
    },

    #[error("Dev-fallback credentials are disabled {location}")]
    DevFallbackDisabled { location: ErrorLocation },
}

impl ResolutionError {
    /// HTTP status a boundary should answer with
    pub fn status_hint(&self) -> StatusCode {
        match self {
            Self::InsufficientRole { .. } => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredential { .. } => "MISSING_CREDENTIAL",
            Self::Decode { source, .. } => source.error_code(),
            Self::InvalidSignature { .. } => "INVALID_SIGNATURE",
            Self::ExpiredCredential { .. } => "EXPIRED_CREDENTIAL",
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            Self::DevFallbackDisabled { .. } => "DEV_FALLBACK_DISABLED",
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolutionError>;
