use crate::credential::DEV_FALLBACK_ADMIN;
use crate::{Credential, DecodeError, JwtPayload};

use std::panic::Location;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use error_location::ErrorLocation;
use lh_core::{Identity, Role};

const BEARER: &str = "bearer";
const DEV_FALLBACK: &str = "dev-fallback";
const DEV_FALLBACK_PREFIX: &str = "dev-fallback-";
const SIMPLIFIED_SEPARATOR: char = ':';
const SIMPLIFIED_MIN_PARTS: usize = 3;
const JWT_SEGMENTS: usize = 3;

/// Parses raw credential strings. Performs no I/O and no signature checks.
pub struct TokenCodec;

impl TokenCodec {
    /// Remove any leading `Bearer ` prefix (case-insensitive) and surrounding
    /// whitespace. Applying it twice gives the same result as once.
    pub fn strip_bearer(raw: &str) -> &str {
        let mut rest = raw.trim();
        loop {
            let Some(head) = rest.get(..BEARER.len()) else {
                return rest;
            };
            if !head.eq_ignore_ascii_case(BEARER) {
                return rest;
            }

            let tail = &rest[BEARER.len()..];
            if tail.is_empty() {
                return tail;
            }
            if !tail.starts_with(char::is_whitespace) {
                return rest;
            }
            rest = tail.trim_start();
        }
    }

    /// Classify and decode a credential.
    ///
    /// Priority: simplified (contains `:`), JWT (three `.` segments),
    /// `dev-fallback`, `dev-fallback-<username>`.
    #[track_caller]
    pub fn decode(raw: &str) -> Result<Credential, DecodeError> {
        let token = Self::strip_bearer(raw);

        if token.is_empty() {
            return Err(DecodeError::Empty {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if token.contains(SIMPLIFIED_SEPARATOR) {
            return Self::decode_simplified(token);
        }

        if token.split('.').count() == JWT_SEGMENTS {
            return Self::decode_jwt(token);
        }

        if token == DEV_FALLBACK {
            return Ok(Credential::DevFallback {
                username: DEV_FALLBACK_ADMIN.to_string(),
            });
        }

        if let Some(username) = token.strip_prefix(DEV_FALLBACK_PREFIX)
            && !username.is_empty()
        {
            return Ok(Credential::DevFallback {
                username: username.to_string(),
            });
        }

        Err(DecodeError::UnrecognizedFormat {
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    pub fn decode_identity(raw: &str) -> Result<Identity, DecodeError> {
        Self::decode(raw).map(|credential| credential.identity())
    }

    /// Render the simplified form `<userId>:<username>:<role>`
    pub fn encode_simplified(identity: &Identity) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            identity.user_id,
            identity.username.as_deref().unwrap_or_default(),
            identity.role,
            sep = SIMPLIFIED_SEPARATOR
        )
    }

    #[track_caller]
    fn decode_simplified(token: &str) -> Result<Credential, DecodeError> {
        let malformed = |message: String| DecodeError::MalformedSimplified {
            message,
            location: ErrorLocation::from(Location::caller()),
        };

        let parts: Vec<&str> = token.split(SIMPLIFIED_SEPARATOR).collect();
        if parts.len() < SIMPLIFIED_MIN_PARTS {
            return Err(malformed(format!(
                "expected at least {} ':'-separated parts, got {}",
                SIMPLIFIED_MIN_PARTS,
                parts.len()
            )));
        }

        let user_id = parts[0];
        if user_id.is_empty() {
            return Err(malformed("user id is empty".to_string()));
        }

        let role = Role::from_str(parts[2].trim())
            .map_err(|_| malformed(format!("unknown role '{}'", parts[2])))?;

        let username = Some(parts[1])
            .filter(|name| !name.is_empty())
            .map(String::from);

        Ok(Credential::Simplified {
            user_id: user_id.to_string(),
            username,
            role,
        })
    }

    #[track_caller]
    fn decode_jwt(token: &str) -> Result<Credential, DecodeError> {
        let malformed = |message: String| DecodeError::MalformedJwt {
            message,
            location: ErrorLocation::from(Location::caller()),
        };

        let payload_segment = token
            .split('.')
            .nth(1)
            .ok_or_else(|| malformed("missing payload segment".to_string()))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload_segment.trim_end_matches('='))
            .map_err(|e| malformed(format!("payload is not base64url: {}", e)))?;

        let payload: JwtPayload = serde_json::from_slice(&bytes)
            .map_err(|e| malformed(format!("payload is not a JSON object: {}", e)))?;

        Ok(Credential::Jwt {
            token: token.to_string(),
            user_id: payload.subject()?,
            username: payload.username.clone().filter(|name| !name.is_empty()),
            role: payload.role()?,
            expires_at: payload.expires_at()?,
        })
    }
}
