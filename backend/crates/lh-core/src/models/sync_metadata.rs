use crate::SyncSource;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Local-tier bookkeeping kept next to each stored document.
/// Only consulted when breaking merge ties; never shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetadata {
    pub last_updated: DateTime<Utc>,
    pub source: SyncSource,
}
