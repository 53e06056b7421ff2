use crate::{IssuedVia, Role};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Resolved, typed representation of who is making a request.
///
/// Derived from a credential for the lifetime of one request or session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub username: Option<String>,
    pub role: Role,
    pub issued_via: IssuedVia,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// True when `expires_at` lies before `now - leeway`. Identities without
    /// an expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        self.expires_at
            .map(|expires_at| expires_at + leeway < now)
            .unwrap_or(false)
    }

    pub fn satisfies(&self, required: Role) -> bool {
        self.role.satisfies(required)
    }
}
