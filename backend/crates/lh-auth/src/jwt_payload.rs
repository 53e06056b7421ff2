use crate::DecodeError;

use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use lh_core::Role;
use serde::{Deserialize, Serialize};

/// The claims this service reads from a JWT payload.
///
/// Issuers disagree on where the user id lives: ours write `userId`, generic
/// providers write `sub`. Both are accepted, `userId` first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct JwtPayload {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Expiration (seconds since epoch, may be fractional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,
}

impl JwtPayload {
    /// Effective user id: `userId`, falling back to `sub`
    #[track_caller]
    pub fn subject(&self) -> Result<String, DecodeError> {
        self.user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.sub.as_deref().filter(|id| !id.is_empty()))
            .map(String::from)
            .ok_or_else(|| DecodeError::MalformedJwt {
                message: "payload has neither userId nor sub".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Role claim; tokens without one are plain users
    #[track_caller]
    pub fn role(&self) -> Result<Role, DecodeError> {
        match self.role.as_deref() {
            None | Some("") => Ok(Role::User),
            Some(role) => Role::from_str(role).map_err(|_| DecodeError::MalformedJwt {
                message: format!("unknown role '{}'", role),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    #[track_caller]
    pub fn expires_at(&self) -> Result<Option<DateTime<Utc>>, DecodeError> {
        match self.exp {
            None => Ok(None),
            Some(exp) => DateTime::from_timestamp(exp.trunc() as i64, 0)
                .map(Some)
                .ok_or_else(|| DecodeError::MalformedJwt {
                    message: format!("exp out of range: {}", exp),
                    location: ErrorLocation::from(Location::caller()),
                }),
        }
    }
}
