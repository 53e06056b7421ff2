use chrono::{DateTime, Utc};
use lh_core::{Identity, IssuedVia, Role};

pub const DEV_FALLBACK_ADMIN: &str = "admin";
const DEV_ID_SUFFIX: &str = "-dev-id";

/// A decoded credential, tagged by the encoding it arrived in
#[derive(Debug, Clone, PartialEq)]
pub enum Credential {
    /// `<userId>:<username>:<role>`, trusted by transport
    Simplified {
        user_id: String,
        username: Option<String>,
        role: Role,
    },
    /// Structurally decoded JWT; the signature is checked by the resolver
    Jwt {
        token: String,
        user_id: String,
        username: Option<String>,
        role: Role,
        expires_at: Option<DateTime<Utc>>,
    },
    /// `dev-fallback` / `dev-fallback-<username>`
    DevFallback { username: String },
}

impl Credential {
    pub fn issued_via(&self) -> IssuedVia {
        match self {
            Self::Simplified { .. } => IssuedVia::Simplified,
            Self::Jwt { .. } => IssuedVia::Jwt,
            Self::DevFallback { .. } => IssuedVia::DevFallback,
        }
    }

    pub fn identity(&self) -> Identity {
        match self {
            Self::Simplified {
                user_id,
                username,
                role,
            } => Identity {
                user_id: user_id.clone(),
                username: username.clone(),
                role: *role,
                issued_via: IssuedVia::Simplified,
                expires_at: None,
            },
            Self::Jwt {
                user_id,
                username,
                role,
                expires_at,
                ..
            } => Identity {
                user_id: user_id.clone(),
                username: username.clone(),
                role: *role,
                issued_via: IssuedVia::Jwt,
                expires_at: *expires_at,
            },
            Self::DevFallback { username } => Identity {
                user_id: format!("{}{}", username, DEV_ID_SUFFIX),
                username: Some(username.clone()),
                role: if username == DEV_FALLBACK_ADMIN {
                    Role::Admin
                } else {
                    Role::User
                },
                issued_via: IssuedVia::DevFallback,
                expires_at: None,
            },
        }
    }
}
