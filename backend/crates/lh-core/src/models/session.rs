use crate::Identity;

use serde::{Deserialize, Serialize};

/// A resolved identity together with the bearer credential it came from.
///
/// The credential is kept (without any `Bearer ` prefix) so remote calls can
/// authenticate as the same principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub identity: Identity,
    pub credential: String,
}

impl Session {
    pub fn new(identity: Identity, credential: impl Into<String>) -> Self {
        Self {
            identity,
            credential: credential.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.identity.user_id
    }
}
