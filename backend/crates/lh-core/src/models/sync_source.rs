use crate::SourceTier;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncSource {
    Local,
    Server,
    #[serde(rename = "default")]
    BuiltIn,
    /// Entry written by an older client without the sync envelope
    MigratedLegacy,
}

impl From<SourceTier> for SyncSource {
    fn from(tier: SourceTier) -> Self {
        match tier {
            SourceTier::Local => Self::Local,
            SourceTier::Server => Self::Server,
            SourceTier::BuiltIn => Self::BuiltIn,
        }
    }
}
